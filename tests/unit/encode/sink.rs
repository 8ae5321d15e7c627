use super::*;

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: vec![0, 0, 0, 255],
        premultiplied: true,
    }
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 1,
        height: 1,
        fps: Fps::new(30, 1).unwrap(),
    }
}

#[test]
fn in_memory_sink_keeps_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(3), &frame()).unwrap();
    sink.push_frame(FrameIndex(4), &frame()).unwrap();
    sink.end().unwrap();
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![3, 4]);
    assert!(sink.is_ended());
    assert_eq!(sink.config(), Some(&cfg()));
}

#[test]
fn out_of_order_frames_are_rejected() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(2), &frame()).unwrap();
    assert!(sink.push_frame(FrameIndex(2), &frame()).is_err());
    assert!(sink.push_frame(FrameIndex(1), &frame()).is_err());
}

#[test]
fn push_before_begin_is_rejected() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame()).is_err());
}

#[test]
fn begin_resets_previous_run() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(5), &frame()).unwrap();
    sink.begin(cfg()).unwrap();
    assert!(sink.frames().is_empty());
    sink.push_frame(FrameIndex(0), &frame()).unwrap();
}
