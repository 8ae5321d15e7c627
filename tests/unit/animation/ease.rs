use super::*;

const ALL: [Ease; 8] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::Smooth,
];

#[test]
fn endpoints_are_fixed() {
    for e in ALL {
        assert!((e.apply(0.0) - 0.0).abs() < 1e-12, "{e:?} at 0");
        assert!((e.apply(1.0) - 1.0).abs() < 1e-12, "{e:?} at 1");
    }
}

#[test]
fn input_is_clamped() {
    for e in ALL {
        assert_eq!(e.apply(-3.0), e.apply(0.0));
        assert_eq!(e.apply(7.0), e.apply(1.0));
    }
}

#[test]
fn symmetric_curves_pass_through_midpoint() {
    for e in [Ease::Linear, Ease::InOutQuad, Ease::InOutCubic, Ease::Smooth] {
        assert!((e.apply(0.5) - 0.5).abs() < 1e-12, "{e:?}");
    }
}

#[test]
fn serde_names_are_snake_case() {
    assert_eq!(serde_json::to_string(&Ease::InOutCubic).unwrap(), "\"in_out_cubic\"");
    let e: Ease = serde_json::from_str("\"smooth\"").unwrap();
    assert_eq!(e, Ease::Smooth);
}
