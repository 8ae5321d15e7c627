use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CycleError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CycleError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        CycleError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn stage_failures_surface_stage_and_kind() {
    let e = CycleError::carry_mismatch("Decode", "ir");
    assert_eq!(e.kind(), FailureKind::CarryMismatch);
    assert_eq!(e.stage(), Some("Decode"));
    assert!(e.to_string().contains("'ir'"));

    let e = CycleError::build_failure("Fetch", "bad descriptor");
    assert_eq!(e.kind(), FailureKind::BuildFailure);
    assert_eq!(e.stage(), Some("Fetch"));
    assert_eq!(CycleError::validation("x").stage(), None);
}

#[test]
fn build_errors_are_attributed_to_their_stage() {
    let e = CycleError::validation("width must be > 0").into_build_failure("Registers");
    assert_eq!(e.kind(), FailureKind::BuildFailure);
    assert_eq!(e.stage(), Some("Registers"));

    let e = CycleError::carry_mismatch("", "alu").into_build_failure("Execute");
    assert_eq!(e.kind(), FailureKind::CarryMismatch);
    assert_eq!(e.stage(), Some("Execute"));

    let e = CycleError::carry_mismatch("Other", "alu").into_build_failure("Execute");
    assert_eq!(e.stage(), Some("Other"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CycleError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), FailureKind::Other);
}
