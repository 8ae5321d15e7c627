use super::*;
use crate::scene::entity::Shape;

#[test]
fn origin_is_the_canvas_center_with_y_up() {
    let l = Layout::new(Canvas {
        width: 1920,
        height: 1080,
    });
    assert_eq!(l.pt(0.0, 0.0), Point::new(960.0, 540.0));
    assert_eq!(l.pt(1.0, 1.0), Point::new(1095.0, 405.0));
    assert_eq!(l.len(2.0), 270.0);
    assert_eq!(l.font(40.0), 40.0);
}

#[test]
fn sizes_scale_with_canvas_height() {
    let l = Layout::new(Canvas {
        width: 640,
        height: 360,
    });
    assert!((l.font(30.0) - 10.0).abs() < 1e-9);
    assert!((l.len(8.0) - 360.0).abs() < 1e-9);
}

#[test]
fn register_value_is_addressable() {
    let kit = Kit::new(LessonConfig::default());
    let reg = kit.register("AX", "0xFFFF", "Accumulator", -5.36, 2.5);
    assert!(reg.validate().is_ok());
    assert!(reg.has_text_target(Some("value")));
    assert!(!reg.has_text_target(None));
    // The group is centered on its box.
    let c = kit.pt(-5.36, 2.5);
    assert!((reg.pos.x - c.x).abs() < 1e-6);
    assert!((reg.pos.y - c.y).abs() < 1e-6);
}

#[test]
fn gear_is_valid_svg_art() {
    let kit = Kit::new(LessonConfig::default());
    let gear = kit.gear(Color::rgb(0, 255, 128), 0.0, 0.0);
    let Shape::Svg { markup, .. } = &gear.shape else {
        panic!("gear should be svg");
    };
    assert!(usvg::Tree::from_str(markup, &usvg::Options::default()).is_ok());
}

#[test]
fn brief_halves_holds() {
    let kit = Kit::new(LessonConfig {
        detail: Detail::Brief,
        ..LessonConfig::default()
    });
    assert_eq!(kit.hold(2.0), 1.0);
    assert!(!kit.detailed());
}

#[test]
fn soft_tints_toward_white() {
    assert_eq!(soft(Color::rgb(0, 0, 0)), Color::rgb(128, 128, 128));
}
