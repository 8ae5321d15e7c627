use super::*;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::scene::entity::EntityId;
use crate::timeline::track::{Highlight, TextValue};

const BG: Color = Color::rgb(10, 10, 10);

fn frame<'a>(nodes: Vec<EvaluatedNode<'a>>) -> EvaluatedFrame<'a> {
    EvaluatedFrame {
        frame: FrameIndex(0),
        time_s: 0.0,
        canvas: Canvas {
            width: 64,
            height: 64,
        },
        background: BG,
        nodes,
    }
}

fn node<'a>(desc: &'a EntityDesc, opacity: f64) -> EvaluatedNode<'a> {
    EvaluatedNode {
        id: EntityId(1),
        name: "n",
        desc,
        opacity,
        reveal: 1.0,
        transform: Affine::IDENTITY,
        highlight: Highlight {
            color: Color::WHITE,
            width: 0.0,
        },
        texts: Vec::new(),
    }
}

#[test]
fn empty_frame_is_solid_background() {
    let mut r = CpuRenderer::new(FontBook::empty());
    let out = r.render(&frame(Vec::new())).unwrap();
    assert_eq!((out.width, out.height), (64, 64));
    assert!(out.premultiplied);
    assert!(out.data.chunks_exact(4).all(|px| px == [10, 10, 10, 255]));
}

#[test]
fn filled_box_changes_center_pixels() {
    let desc = EntityDesc::rect(32.0, 32.0)
        .at(Point::new(32.0, 32.0))
        .fill(Color::rgb(255, 0, 0));
    let mut r = CpuRenderer::new(FontBook::empty());
    let out = r.render(&frame(vec![node(&desc, 1.0)])).unwrap();
    assert_eq!(out.pixel(32, 32), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(2, 2), Some([10, 10, 10, 255]));
}

#[test]
fn opacity_blends_toward_background() {
    let desc = EntityDesc::rect(32.0, 32.0)
        .at(Point::new(32.0, 32.0))
        .fill(Color::rgb(255, 255, 255));
    let mut r = CpuRenderer::new(FontBook::empty());
    let out = r.render(&frame(vec![node(&desc, 0.5)])).unwrap();
    let [red, _, _, a] = out.pixel(32, 32).unwrap();
    assert_eq!(a, 255);
    assert!((120..=140).contains(&red), "got {red}");
}

#[test]
fn dot_is_filled_with_its_color() {
    let desc = EntityDesc::dot(8.0)
        .at(Point::new(20.0, 20.0))
        .color(Color::rgb(0, 255, 0));
    let mut r = CpuRenderer::new(FontBook::empty());
    let out = r.render(&frame(vec![node(&desc, 1.0)])).unwrap();
    assert_eq!(out.pixel(20, 20), Some([0, 255, 0, 255]));
    assert_eq!(out.pixel(40, 40), Some([10, 10, 10, 255]));
}

#[test]
fn unrevealed_arrow_draws_nothing() {
    let desc = EntityDesc::arrow(Point::new(4.0, 32.0), Point::new(60.0, 32.0));
    let mut n = node(&desc, 1.0);
    n.reveal = 0.0;
    let mut r = CpuRenderer::new(FontBook::empty());
    let out = r.render(&frame(vec![n])).unwrap();
    assert!(out.data.chunks_exact(4).all(|px| px == [10, 10, 10, 255]));
}

#[test]
fn labels_without_fonts_draw_nothing() {
    let desc = EntityDesc::label("MUL BX", 24.0).at(Point::new(32.0, 32.0));
    let from = TextValue {
        text: "a".into(),
        color: Color::WHITE,
    };
    let to = TextValue {
        text: "b".into(),
        color: Color::WHITE,
    };
    let mut n = node(&desc, 1.0);
    n.texts.push(crate::timeline::eval::EvaluatedText {
        part: "",
        from: &from,
        to: &to,
        progress: 0.5,
    });
    let mut r = CpuRenderer::new(FontBook::empty());
    let out = r.render(&frame(vec![n])).unwrap();
    assert!(out.data.chunks_exact(4).all(|px| px == [10, 10, 10, 255]));
}

#[test]
fn highlight_strokes_outside_the_box() {
    let desc = EntityDesc::rect(20.0, 20.0).at(Point::new(32.0, 32.0));
    let mut n = node(&desc, 1.0);
    n.highlight = Highlight {
        color: Color::rgb(255, 255, 0),
        width: 4.0,
    };
    let mut r = CpuRenderer::new(FontBook::empty());
    let out = r.render(&frame(vec![n])).unwrap();
    // Box edge at x=22, outline at 22 - 8 = 14 on the horizontal center line.
    assert_eq!(out.pixel(14, 32), Some([255, 255, 0, 255]));
}

#[test]
fn pixel_outside_frame_is_none() {
    let mut r = CpuRenderer::new(FontBook::empty());
    let out = r.render(&frame(Vec::new())).unwrap();
    assert!(out.pixel(64, 0).is_none());
    assert!(out.pixel(0, 64).is_none());
}
