//! Diagnostics about program elements.
//!
//! The rebinding core never sees source text, so a diagnostic names the
//! classes and members involved (`p.X.m()V`) instead of pointing at spans.

use std::fmt;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    /// Aborts the pass.
    Error,
    /// Reported, compilation continues.
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    /// Program elements involved, most relevant first.
    pub subjects: Vec<String>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// A diagnostic whose severity follows from its code.
    pub fn for_code(code: ErrorCode) -> Self {
        let severity = if code.is_warning() {
            Severity::Warning
        } else {
            Severity::Error
        };
        Diagnostic {
            code,
            severity,
            message: code.description().to_owned(),
            subjects: Vec::new(),
            notes: Vec::new(),
        }
    }

    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            severity: Severity::Error,
            ..Self::for_code(code)
        }
    }

    pub fn warning(code: ErrorCode) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Self::for_code(code)
        }
    }

    #[cold]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::error(ErrorCode::E9001).with_message(message)
    }

    /// Replace the default message taken from the code description.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            ..self
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.push(subject.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn primary_subject(&self) -> Option<&str> {
        self.subjects.first().map(String::as_str)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

/// One header line, then one indented line per subject and note:
///
/// ```text
/// error[E9002]: conflicting bridge
///   --> p.C.f()V
///   = note: ...
/// ```
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        self.subjects
            .iter()
            .try_for_each(|subject| write!(f, "\n  --> {subject}"))?;
        self.notes
            .iter()
            .try_for_each(|note| write!(f, "\n  = note: {note}"))
    }
}

#[cfg(test)]
mod tests;
