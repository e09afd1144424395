//! Diagnostics for the weft optimizer core.
//!
//! The rebinding core has no user-facing errors of its own: unresolvable
//! references are left alone, and everything else that goes wrong is an
//! internal-consistency failure of the compiler. Those failures are reported
//! as a [`Diagnostic`] carrying an E9xxx [`ErrorCode`] so the surrounding
//! compiler can render them like any other error and abort.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
