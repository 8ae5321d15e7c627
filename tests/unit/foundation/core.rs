use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_secs_to_frames_ceil_is_exact_on_whole_frames() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(1.0), 30);
    assert_eq!(fps.secs_to_frames_ceil(1.01), 31);
    assert_eq!(fps.secs_to_frames_ceil(0.0), 0);
    let secs = fps.frames_to_secs(123);
    assert_eq!(fps.secs_to_frames_ceil(secs), 123);
    assert_eq!(fps.secs_to_frames_floor(secs), 123);
    assert_eq!(fps.secs_to_frames_floor(1.99), 59);
}

#[test]
fn color_parses_and_formats_hex() {
    let c = Color::parse_hex("#00bfff").unwrap();
    assert_eq!(c, Color::rgb(0x00, 0xbf, 0xff));
    assert_eq!(c.to_hex(), "#00bfff");

    let c = Color::parse_hex("ff004080").unwrap();
    assert_eq!(c.a, 0x80);
    assert_eq!(c.to_hex(), "#ff004080");

    assert!(Color::parse_hex("#fff").is_err());
    assert!(Color::parse_hex("#gg0000").is_err());
}

#[test]
fn color_serde_uses_hex_strings() {
    let c: Color = serde_json::from_str("\"#0a0a0a\"").unwrap();
    assert_eq!(c, Color::rgb(10, 10, 10));
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#0a0a0a\"");
    assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
}
