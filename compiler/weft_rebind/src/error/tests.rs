use pretty_assertions::assert_eq;
use weft_diagnostic::Severity;

use super::*;

#[test]
fn test_codes_per_variant() {
    let conflicting = RebindingError::ConflictingBridge {
        bridge: "p.C.f()V".into(),
        first: "p.I.f()V".into(),
        second: "p.J.f()V".into(),
    };
    assert_eq!(conflicting.code(), ErrorCode::E9002);
    assert_eq!(
        RebindingError::MissingDefinition("p.Gone".into()).code(),
        ErrorCode::E9005
    );
    assert_eq!(
        RebindingError::Lens(LensError::EmptyLayer("moves")).code(),
        ErrorCode::E9001
    );
}

#[test]
fn test_to_diagnostic() {
    let error = RebindingError::MissingBridgeHolder {
        original: "p.Y.foo()V".into(),
        target: "p.X.foo()V".into(),
        reason: BridgeReason::Visibility,
    };
    let diagnostic = error.to_diagnostic();

    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.code, ErrorCode::E9003);
    assert_eq!(
        diagnostic.message,
        "no legal holder for a visibility bridge from `p.Y.foo()V` to `p.X.foo()V`"
    );
    assert_eq!(diagnostic.subjects, vec!["p.Y.foo()V", "p.X.foo()V"]);
    assert_eq!(diagnostic.notes.len(), 1);
}

#[test]
fn test_commit_failure_keeps_source() {
    let error = RebindingError::BridgeCommitFailed {
        bridge: "p.C.f()V".into(),
        source: MutationError::DuplicateMethod("p.C.f()V".into()),
    };
    assert_eq!(error.code(), ErrorCode::E9004);
    assert_eq!(
        error.to_string(),
        "failed to add bridge `p.C.f()V`: `p.C.f()V` already declares a member with this signature"
    );
}
