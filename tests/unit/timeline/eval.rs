use super::*;
use crate::animation::ease::Ease;
use crate::foundation::core::{Fps, Point};

fn timeline() -> Timeline {
    let mut tl = Timeline::new(
        Canvas {
            width: 100,
            height: 100,
        },
        Fps::new(10, 1).unwrap(),
        Color::rgb(10, 10, 10),
    );
    let mut a = TimelineEntity::new(
        EntityId(1),
        "a",
        EntityDesc::rect(20.0, 20.0).at(Point::new(50.0, 50.0)),
        0.0,
    );
    a.opacity.push(0.0, 1.0, 1.0, Ease::Linear).unwrap();
    a.removed_s = Some(2.0);
    let mut b = TimelineEntity::new(
        EntityId(2),
        "b",
        EntityDesc::dot(5.0).at(Point::new(20.0, 20.0)),
        1.0,
    );
    b.opacity.set(1.0, 1.0).unwrap();
    b.offset
        .push(1.0, 2.0, Vec2::new(10.0, 0.0), Ease::Linear)
        .unwrap();
    tl.entities = vec![a, b];
    tl.duration_s = 3.0;
    tl
}

#[test]
fn out_of_range_frame_is_an_error() {
    let tl = timeline();
    assert_eq!(tl.duration_frames(), 30);
    assert!(Evaluator::eval_frame(&tl, FrameIndex(29)).is_ok());
    assert!(Evaluator::eval_frame(&tl, FrameIndex(30)).is_err());
}

#[test]
fn zero_opacity_entities_are_skipped() {
    let tl = timeline();
    let f = Evaluator::eval_frame(&tl, FrameIndex(0)).unwrap();
    assert!(f.nodes.is_empty());
    let f = Evaluator::eval_frame(&tl, FrameIndex(5)).unwrap();
    assert_eq!(f.nodes.len(), 1);
    assert!((f.nodes[0].opacity - 0.5).abs() < 1e-9);
}

#[test]
fn nodes_follow_creation_order_and_lifetimes() {
    let tl = timeline();
    let f = Evaluator::eval_frame(&tl, FrameIndex(15)).unwrap();
    let names: Vec<&str> = f.nodes.iter().map(|n| n.name).collect();
    assert_eq!(names, vec!["a", "b"]);
    let f = Evaluator::eval_frame(&tl, FrameIndex(25)).unwrap();
    let names: Vec<&str> = f.nodes.iter().map(|n| n.name).collect();
    assert_eq!(names, vec!["b"]);
}

#[test]
fn offset_translates_the_transform() {
    let tl = timeline();
    let f = Evaluator::eval_frame(&tl, FrameIndex(25)).unwrap();
    let p = f.nodes[0].transform * Point::new(20.0, 20.0);
    assert!((p.x - 30.0).abs() < 1e-9);
    assert!((p.y - 20.0).abs() < 1e-9);
}

#[test]
fn evaluation_is_deterministic() {
    let tl = timeline();
    let a = serde_json::to_string(&Evaluator::eval_frame(&tl, FrameIndex(12)).unwrap()).unwrap();
    let b = serde_json::to_string(&Evaluator::eval_frame(&tl, FrameIndex(12)).unwrap()).unwrap();
    assert_eq!(a, b);
}
