use super::*;

#[test]
fn empty_json_yields_defaults() {
    let cfg = LessonConfig::from_json("{}").unwrap();
    assert_eq!(cfg, LessonConfig::default());
    assert_eq!(cfg.canvas.width, 1920);
    assert_eq!(cfg.canvas.height, 1080);
    assert_eq!(cfg.fps, Fps { num: 30, den: 1 });
    assert_eq!(cfg.background.to_hex(), "#0a0a0a");
    assert_eq!((cfg.ax, cfg.bx), (0xFFFF, 0xFFFF));
    assert_eq!(cfg.source, SourceRegister::Bx);
    assert_eq!(cfg.palette.blue.to_hex(), "#00bfff");
}

#[test]
fn partial_json_overrides_fields() {
    let cfg = LessonConfig::from_json(
        r##"{
            "detail": "brief",
            "ax": 36864,
            "bx": 3,
            "source": "CX",
            "palette": { "green": "#11ff22" },
            "cycles": { "mul_max": 140 }
        }"##,
    )
    .unwrap();
    assert_eq!(cfg.detail, Detail::Brief);
    assert_eq!((cfg.ax, cfg.bx), (0x9000, 3));
    assert_eq!(cfg.source, SourceRegister::Cx);
    assert_eq!(cfg.palette.green, Color::rgb(0x11, 0xff, 0x22));
    assert_eq!(cfg.palette.red, Palette::default().red);
    assert_eq!(cfg.cycles.mul_max, 140);
    assert_eq!(cfg.cycles.mul_min, 118);
}

#[test]
fn bad_colors_are_serde_errors() {
    let err = LessonConfig::from_json(r##"{ "background": "#zzzzzz" }"##).unwrap_err();
    assert_eq!(err.kind(), crate::foundation::error::FailureKind::Serde);
}

#[test]
fn odd_canvas_is_rejected() {
    let err =
        LessonConfig::from_json(r#"{ "canvas": { "width": 641, "height": 480 } }"#).unwrap_err();
    assert!(err.to_string().contains("even"));
}

#[test]
fn pace_must_be_in_range() {
    for pace in ["0", "-1", "10.5"] {
        let json = format!(r#"{{ "pace": {pace} }}"#);
        assert!(LessonConfig::from_json(&json).is_err(), "pace {pace}");
    }
    assert!(LessonConfig::from_json(r#"{ "pace": 10 }"#).is_ok());
}

#[test]
fn result_registers_cannot_be_the_source() {
    assert!(LessonConfig::from_json(r#"{ "source": "DX" }"#).is_err());
    assert!(LessonConfig::from_json(r#"{ "source": "AX" }"#).is_err());
}

#[test]
fn zero_fps_is_rejected() {
    assert!(LessonConfig::from_json(r#"{ "fps": { "num": 0, "den": 1 } }"#).is_err());
}

#[test]
fn register_codes_match_the_encoding_table() {
    assert_eq!(SourceRegister::Bx.code(), 3);
    assert_eq!(SourceRegister::Di.code(), 7);
    assert_eq!(SourceRegister::Si.name(), "SI");
}

#[test]
fn missing_file_is_an_error() {
    let err = LessonConfig::from_path(Path::new("/nonexistent/lesson.json")).unwrap_err();
    assert!(err.to_string().contains("lesson config"));
}
