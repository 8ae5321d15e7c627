use super::*;

const BG: Color = Color::rgb(10, 20, 30);

#[test]
fn transparent_pixels_become_background() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, BG).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn opaque_pixels_pass_through() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, BG).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn half_transparent_pixels_blend() {
    // 50% white, premultiplied.
    let src = vec![128u8, 128, 128, 128];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, Color::rgb(0, 0, 0)).unwrap();
    assert_eq!(dst, vec![128, 128, 128, 255]);
}

#[test]
fn mismatched_lengths_are_rejected() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_premul_over_bg(&mut dst, &[0u8; 4], BG).is_err());
}

#[test]
fn odd_dimensions_are_rejected_before_spawning() {
    let dir = std::env::temp_dir().join("cyclecast-ffmpeg-odd");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(dir.join("out.mp4")));
    let err = sink
        .begin(SinkConfig {
            width: 3,
            height: 2,
            fps: Fps::new(30, 1).unwrap(),
        })
        .unwrap_err();
    assert!(err.to_string().contains("even"));
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
}
