//! Error codes for weft diagnostics.

use std::fmt;

/// Diagnostic codes. `E9xxx` codes are internal errors that abort the
/// pass; `W1xxx` codes are rebinding warnings.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Internal compiler error
    E9001,
    /// Two different forwarding targets requested for one bridge signature
    E9002,
    /// No legal holder exists for a required bridge
    E9003,
    /// A bridge could not be added to its holder
    E9004,
    /// A class the pass relies on has no definition
    E9005,
    /// Reference resolution was ambiguous; reference left unchanged
    W1001,
}

impl ErrorCode {
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E9001,
        ErrorCode::E9002,
        ErrorCode::E9003,
        ErrorCode::E9004,
        ErrorCode::E9005,
        ErrorCode::W1001,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
            ErrorCode::E9003 => "E9003",
            ErrorCode::E9004 => "E9004",
            ErrorCode::E9005 => "E9005",
            ErrorCode::W1001 => "W1001",
        }
    }

    /// One-line description, for `--explain` style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E9001 => "internal compiler error",
            ErrorCode::E9002 => "conflicting forwarding targets for one bridge",
            ErrorCode::E9003 => "no legal holder for a required bridge",
            ErrorCode::E9004 => "bridge could not be added to its holder",
            ErrorCode::E9005 => "missing class definition",
            ErrorCode::W1001 => "ambiguous member resolution",
        }
    }

    pub fn is_internal_error(&self) -> bool {
        !self.is_warning()
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W1001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
