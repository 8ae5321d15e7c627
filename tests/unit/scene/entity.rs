use super::*;

#[test]
fn group_children_become_relative_to_bounds_center() {
    let g = EntityDesc::group(vec![
        EntityDesc::rect(100.0, 50.0).at(Point::new(200.0, 100.0)),
        EntityDesc::label("AX", 20.0)
            .at(Point::new(200.0, 100.0))
            .part("value"),
    ]);
    assert_eq!(g.pos, Point::new(200.0, 100.0));
    let Shape::Group { children } = &g.shape else {
        panic!("expected group");
    };
    assert_eq!(children[0].pos, Point::ZERO);
    assert_eq!(g.bounds().center(), Point::new(200.0, 100.0));
    assert_eq!(g.bounds().width(), 100.0);
}

#[test]
fn part_lookup_reaches_nested_children() {
    let inner = EntityDesc::group(vec![EntityDesc::label("0x0000", 18.0).part("value")]);
    let outer = EntityDesc::group(vec![EntityDesc::rect(10.0, 10.0), inner]);
    assert!(outer.find_part("value").is_some());
    assert!(outer.find_part("missing").is_none());
    assert!(outer.has_text_target(Some("value")));
    assert!(!outer.has_text_target(None));
    assert!(EntityDesc::label("x", 10.0).has_text_target(None));
}

#[test]
fn arrow_stores_delta_from_start() {
    let a = EntityDesc::arrow(Point::new(10.0, 10.0), Point::new(110.0, 60.0));
    assert_eq!(a.pos, Point::new(10.0, 10.0));
    let Shape::Arrow { delta, .. } = a.shape else {
        panic!("expected arrow");
    };
    assert_eq!(delta, Vec2::new(100.0, 50.0));
}

#[test]
fn validate_rejects_degenerate_geometry() {
    assert!(EntityDesc::rect(0.0, 10.0).validate().is_err());
    assert!(EntityDesc::label("x", f64::NAN).validate().is_err());
    assert!(
        EntityDesc::arrow(Point::new(1.0, 1.0), Point::new(1.0, 1.0))
            .validate()
            .is_err()
    );
    assert!(EntityDesc::svg("  ", 10.0, 10.0).validate().is_err());
    let bad_child = EntityDesc::group(vec![EntityDesc::dot(-1.0)]);
    assert!(bad_child.validate().is_err());
    assert!(EntityDesc::dot(4.0).validate().is_ok());
}

#[test]
fn builders_only_touch_labels() {
    let l = EntityDesc::label("hi", 12.0).bold().align_start();
    assert!(matches!(
        l.shape,
        Shape::Label {
            bold: true,
            align: TextAlign::Start,
            ..
        }
    ));
    let r = EntityDesc::rect(4.0, 4.0).bold();
    assert_eq!(r, EntityDesc::rect(4.0, 4.0));
}
