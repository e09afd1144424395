//! Invoke kinds.

use std::fmt;

/// The dispatch mechanism of a call site.
///
/// Resolution rules differ per kind, so rebinding tables are partitioned by
/// it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum InvokeKind {
    Virtual,
    Interface,
    Super,
    Static,
    /// Private methods and constructors.
    Direct,
}

impl InvokeKind {
    pub const ALL: [InvokeKind; 5] = [
        InvokeKind::Virtual,
        InvokeKind::Interface,
        InvokeKind::Super,
        InvokeKind::Static,
        InvokeKind::Direct,
    ];

    /// Dense index, for per-kind tables.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            InvokeKind::Virtual => 0,
            InvokeKind::Interface => 1,
            InvokeKind::Super => 2,
            InvokeKind::Static => 3,
            InvokeKind::Direct => 4,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            InvokeKind::Virtual => "virtual",
            InvokeKind::Interface => "interface",
            InvokeKind::Super => "super",
            InvokeKind::Static => "static",
            InvokeKind::Direct => "direct",
        }
    }

    /// Virtual and interface invokes dispatch on the receiver's runtime type.
    #[inline]
    pub const fn is_dynamic(self) -> bool {
        matches!(self, InvokeKind::Virtual | InvokeKind::Interface)
    }
}

impl fmt::Display for InvokeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
