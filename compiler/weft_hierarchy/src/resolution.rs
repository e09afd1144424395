//! Resolution results.
//!
//! Produced by a [`ResolutionOracle`](crate::ResolutionOracle) and consumed,
//! never mutated, by the rebinding planner.

use smallvec::SmallVec;
use weft_ir::{AccessFlags, FieldRef, MethodRef, TypeId};

use crate::ClassOrigin;

/// A uniquely resolved method declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ResolvedMethod {
    /// The holder resolution started from.
    pub initial_holder: TypeId,
    /// The declaration; its holder is the defining class.
    pub method: MethodRef,
    pub flags: AccessFlags,
    /// Flags of the defining class.
    pub holder_flags: AccessFlags,
    /// Origin of the defining class.
    pub origin: ClassOrigin,
}

impl ResolvedMethod {
    #[inline]
    pub fn holder(&self) -> TypeId {
        self.method.holder
    }

    #[inline]
    pub fn is_program_owned(&self) -> bool {
        self.origin == ClassOrigin::Program
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.flags.is_abstract()
    }

    #[inline]
    pub fn is_library(&self) -> bool {
        self.origin == ClassOrigin::Library
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum MethodResolution {
    Single(ResolvedMethod),
    /// Several maximally-specific non-abstract candidates.
    Ambiguous(SmallVec<[MethodRef; 2]>),
    NotFound,
}

impl MethodResolution {
    pub fn single(&self) -> Option<&ResolvedMethod> {
        match self {
            MethodResolution::Single(resolved) => Some(resolved),
            MethodResolution::Ambiguous(_) | MethodResolution::NotFound => None,
        }
    }

    pub fn single_target(&self) -> Option<MethodRef> {
        self.single().map(|resolved| resolved.method)
    }

    pub fn is_failure(&self) -> bool {
        self.single().is_none()
    }
}

/// A resolved field declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ResolvedField {
    /// The holder resolution started from.
    pub initial_holder: TypeId,
    pub field: FieldRef,
    pub flags: AccessFlags,
    pub origin: ClassOrigin,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FieldResolution {
    Single(ResolvedField),
    NotFound,
}

impl FieldResolution {
    pub fn single(&self) -> Option<&ResolvedField> {
        match self {
            FieldResolution::Single(resolved) => Some(resolved),
            FieldResolution::NotFound => None,
        }
    }
}
