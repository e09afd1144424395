use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_internal_error_defaults() {
    let diag = Diagnostic::internal("lens chain corrupted");
    assert_eq!(diag.code, ErrorCode::E9001);
    assert!(diag.is_error());
    assert_eq!(diag.message, "lens chain corrupted");
}

#[test]
fn test_display_renders_subjects_and_notes() {
    let diag = Diagnostic::error(ErrorCode::E9002)
        .with_message("conflicting bridge")
        .with_subject("p.C.f()V")
        .with_note("first target: p.I.f()V")
        .with_note("second target: p.J.f()V");

    assert_eq!(
        diag.to_string(),
        "error[E9002]: conflicting bridge\n  --> p.C.f()V\n  = note: first target: p.I.f()V\n  = note: second target: p.J.f()V"
    );
}

#[test]
fn test_warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::W1001).with_message("ambiguous");
    assert!(!diag.is_error());
    assert_eq!(diag.severity.to_string(), "warning");
}

#[test]
fn test_severity_follows_code() {
    let warning = Diagnostic::for_code(ErrorCode::W1001);
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.message, "ambiguous member resolution");

    let error = Diagnostic::for_code(ErrorCode::E9003).with_subject("p.A.m()V");
    assert!(error.is_error());
    assert_eq!(error.primary_subject(), Some("p.A.m()V"));
}
