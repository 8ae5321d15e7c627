use super::*;
use crate::animation::ease::Ease;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Canvas, Fps, Point};
use crate::scene::entity::{EntityDesc, EntityId};
use crate::timeline::model::TimelineEntity;

/// A box fading in over the first second, then holding for one more.
fn timeline() -> Timeline {
    let mut tl = Timeline::new(
        Canvas {
            width: 32,
            height: 32,
        },
        Fps::new(10, 1).unwrap(),
        Color::rgb(10, 10, 10),
    );
    let mut e = TimelineEntity::new(
        EntityId(1),
        "box",
        EntityDesc::rect(16.0, 16.0)
            .at(Point::new(16.0, 16.0))
            .fill(Color::rgb(255, 0, 0)),
        0.0,
    );
    e.opacity.push(0.0, 1.0, 1.0, Ease::Linear).unwrap();
    tl.entities = vec![e];
    tl.duration_s = 2.0;
    tl
}

fn full_range(tl: &Timeline) -> FrameRange {
    FrameRange::new(FrameIndex(0), FrameIndex(tl.duration_frames())).unwrap()
}

#[test]
fn sequential_render_pushes_every_frame_in_order() {
    let tl = timeline();
    let mut sink = InMemorySink::new();
    let threading = RenderThreading {
        static_frame_elision: false,
        ..RenderThreading::default()
    };
    let stats = render_range(&tl, full_range(&tl), &threading, &FontBook::empty(), &mut sink)
        .unwrap();

    assert_eq!(stats.frames_total, 20);
    assert_eq!(stats.frames_rendered, 20);
    assert!(sink.is_ended());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, (0..20).collect::<Vec<_>>());
    assert_eq!(sink.config().map(|c| (c.width, c.height)), Some((32, 32)));
}

#[test]
fn static_frames_are_elided_but_still_pushed() {
    let tl = timeline();
    let mut sink = InMemorySink::new();
    let stats = render_range(
        &tl,
        full_range(&tl),
        &RenderThreading::default(),
        &FontBook::empty(),
        &mut sink,
    )
    .unwrap();

    // Frames 10..20 all show the fully faded-in box.
    assert_eq!(stats.frames_total, 20);
    assert_eq!(stats.frames_rendered, 11);
    assert_eq!(stats.frames_elided, 9);
    assert_eq!(sink.frames().len(), 20);
    assert_eq!(sink.frames()[12].1, sink.frames()[19].1);
}

#[test]
fn parallel_render_matches_sequential_pixels() {
    let tl = timeline();
    let fonts = FontBook::empty();

    let mut seq = InMemorySink::new();
    render_range(&tl, full_range(&tl), &RenderThreading::default(), &fonts, &mut seq).unwrap();

    let mut par = InMemorySink::new();
    let threading = RenderThreading {
        parallel: true,
        chunk_size: 4,
        threads: Some(2),
        static_frame_elision: true,
    };
    let stats = render_range(&tl, full_range(&tl), &threading, &fonts, &mut par).unwrap();

    assert_eq!(stats.frames_total, 20);
    // Elision is per chunk: [8,12) renders 3 frames, [12,16) and [16,20) one each.
    assert_eq!(stats.frames_rendered, 13);
    assert_eq!(seq.frames(), par.frames());
}

#[test]
fn ranges_outside_the_timeline_are_rejected() {
    let tl = timeline();
    let mut sink = InMemorySink::new();
    let range = FrameRange::new(FrameIndex(10), FrameIndex(21)).unwrap();
    assert!(
        render_range(&tl, range, &RenderThreading::default(), &FontBook::empty(), &mut sink)
            .is_err()
    );
    let empty = FrameRange::new(FrameIndex(3), FrameIndex(3)).unwrap();
    assert!(
        render_range(&tl, empty, &RenderThreading::default(), &FontBook::empty(), &mut sink)
            .is_err()
    );
    assert!(sink.config().is_none());
}

#[test]
fn fingerprint_ignores_time_but_tracks_opacity() {
    let tl = timeline();
    let a = Evaluator::eval_frame(&tl, FrameIndex(12)).unwrap();
    let b = Evaluator::eval_frame(&tl, FrameIndex(15)).unwrap();
    let c = Evaluator::eval_frame(&tl, FrameIndex(5)).unwrap();
    assert_eq!(fingerprint_frame(&a), fingerprint_frame(&b));
    assert_ne!(fingerprint_frame(&a), fingerprint_frame(&c));
}

#[test]
fn zero_threads_is_rejected() {
    assert!(build_thread_pool(Some(0)).is_err());
    assert_eq!(normalized_chunk_size(0), 1);
}

#[test]
fn render_frame_draws_the_background() {
    let tl = timeline();
    let mut renderer = CpuRenderer::new(FontBook::empty());
    let frame = render_frame(&tl, FrameIndex(0), &mut renderer).unwrap();
    assert_eq!(frame.pixel(0, 0), Some([10, 10, 10, 255]));
}

#[test]
fn malformed_timelines_fail_before_the_sink_starts() {
    let mut tl = timeline();
    let range = full_range(&tl);
    tl.duration_s = f64::NAN;
    let mut sink = InMemorySink::new();
    let err = render_range(&tl, range, &RenderThreading::default(), &FontBook::empty(), &mut sink)
        .unwrap_err();
    assert_eq!(err.kind(), crate::foundation::error::FailureKind::Validation);
    assert!(sink.config().is_none());

    let mut renderer = CpuRenderer::new(FontBook::empty());
    assert!(render_frame(&tl, FrameIndex(0), &mut renderer).is_err());
}
