use super::*;
use crate::foundation::core::Fps;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cyclecast-png-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn frame(rgba: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: rgba.repeat(4),
        premultiplied: true,
    }
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::new(30, 1).unwrap(),
    }
}

#[test]
fn frames_are_written_with_numbered_names() {
    let dir = scratch_dir("numbered");
    let mut sink = PngSink::new(&dir, Color::rgb(0, 0, 0));
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame([255, 0, 0, 255])).unwrap();
    sink.push_frame(FrameIndex(7), &frame([0, 255, 0, 255])).unwrap();
    sink.end().unwrap();

    assert_eq!(
        sink.written(),
        &[dir.join("frame_000000.png"), dir.join("frame_000007.png")]
    );
    let img = image::open(dir.join("frame_000007.png")).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(1, 1).0, [0, 255, 0, 255]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn transparent_frames_are_flattened_over_background() {
    let dir = scratch_dir("flatten");
    let path = dir.join("still.png");
    write_png(&path, &frame([0, 0, 0, 0]), Color::rgb(10, 10, 10)).unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [10, 10, 10, 255]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn out_of_order_frames_are_rejected() {
    let dir = scratch_dir("order");
    let mut sink = PngSink::new(&dir, Color::rgb(0, 0, 0)).with_prefix("f");
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(3), &frame([1, 2, 3, 255])).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &frame([1, 2, 3, 255])).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn short_buffers_are_rejected() {
    let bad = FrameRGBA {
        width: 4,
        height: 4,
        data: vec![0; 4],
        premultiplied: true,
    };
    let err = write_png(Path::new("unused.png"), &bad, Color::rgb(0, 0, 0)).unwrap_err();
    assert!(err.to_string().contains("expected 64"));
}
