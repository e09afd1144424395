//! Lookup results threaded through the layers of a chain.

use weft_ir::{FieldRef, InvokeKind, MethodRef};

/// What a method reference at a call site means after some layers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodLookupResult {
    /// The reference to emit at the call site.
    pub reference: MethodRef,
    /// The declaration the call site binds to, once a rebinding layer has
    /// decided it.
    pub rebound_reference: Option<MethodRef>,
    pub kind: InvokeKind,
}

impl MethodLookupResult {
    pub fn unchanged(reference: MethodRef, kind: InvokeKind) -> Self {
        MethodLookupResult {
            reference,
            rebound_reference: None,
            kind,
        }
    }
}

/// What a field reference means after some layers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldLookupResult {
    /// The reference to emit at the access site.
    pub reference: FieldRef,
    /// The resolved declaration. Present once any rebinding layer has run.
    pub rebound_reference: Option<FieldRef>,
}

impl FieldLookupResult {
    pub fn unchanged(reference: FieldRef) -> Self {
        FieldLookupResult {
            reference,
            rebound_reference: None,
        }
    }

    /// The rebound reference, or the reference itself if no rebinding layer
    /// annotated it.
    #[inline]
    pub fn rebound_or_reference(&self) -> FieldRef {
        self.rebound_reference.unwrap_or(self.reference)
    }
}
