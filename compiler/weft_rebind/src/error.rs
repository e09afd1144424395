//! Internal-consistency failures of the rebinding pass.
//!
//! None of these are caused by user input: unresolvable references are left
//! alone. Any of them aborts the pass.

use weft_diagnostic::{Diagnostic, ErrorCode};
use weft_hierarchy::MutationError;
use weft_lens::LensError;

use crate::bridge::BridgeReason;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RebindingError {
    #[error("bridge `{bridge}` requested with two forwarding targets: `{first}` and `{second}`")]
    ConflictingBridge {
        bridge: String,
        first: String,
        second: String,
    },
    #[error("no legal holder for a {reason} bridge from `{original}` to `{target}`")]
    MissingBridgeHolder {
        original: String,
        target: String,
        reason: BridgeReason,
    },
    #[error("failed to add bridge `{bridge}`: {source}")]
    BridgeCommitFailed {
        bridge: String,
        #[source]
        source: MutationError,
    },
    #[error("no definition for `{0}`")]
    MissingDefinition(String),
    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),
    #[error(transparent)]
    Lens(#[from] LensError),
}

impl RebindingError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RebindingError::ConflictingBridge { .. } => ErrorCode::E9002,
            RebindingError::MissingBridgeHolder { .. } => ErrorCode::E9003,
            RebindingError::BridgeCommitFailed { .. } => ErrorCode::E9004,
            RebindingError::MissingDefinition(_) => ErrorCode::E9005,
            RebindingError::WorkerPool(_) | RebindingError::Lens(_) => ErrorCode::E9001,
        }
    }

    /// Render as a fatal diagnostic for the surrounding compiler.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            RebindingError::ConflictingBridge {
                bridge,
                first,
                second,
            } => diagnostic
                .with_subject(bridge.clone())
                .with_subject(first.clone())
                .with_subject(second.clone()),
            RebindingError::MissingBridgeHolder {
                original, target, ..
            } => diagnostic
                .with_subject(original.clone())
                .with_subject(target.clone()),
            RebindingError::BridgeCommitFailed { bridge, .. } => {
                diagnostic.with_subject(bridge.clone())
            }
            RebindingError::MissingDefinition(ty) => diagnostic.with_subject(ty.clone()),
            RebindingError::WorkerPool(_) | RebindingError::Lens(_) => diagnostic,
        }
        .with_note("member rebinding aborted; this is a bug in the compiler")
    }
}

#[cfg(test)]
mod tests;
