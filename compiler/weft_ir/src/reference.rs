//! Holder-qualified member references.
//!
//! All references are symbolic: equality is structural over interned parts,
//! and nothing here implies the referenced member exists.

use std::fmt;

use crate::Name;

/// A JVM type, identified by its interned descriptor (`Lp/X;`, `[I`, `I`).
///
/// Descriptor queries (array-ness, package) live on `ItemFactory`, which
/// owns the interner.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TypeId(Name);

impl TypeId {
    #[inline]
    pub const fn from_descriptor(descriptor: Name) -> Self {
        TypeId(descriptor)
    }

    /// The interned descriptor.
    #[inline]
    pub const fn descriptor(self) -> Name {
        self.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId(s{}#{})", self.0.shard(), self.0.slot())
    }
}

/// A method reference: holder, name and method descriptor (`(I)V`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodRef {
    pub holder: TypeId,
    pub name: Name,
    pub descriptor: Name,
}

impl MethodRef {
    pub const fn new(holder: TypeId, name: Name, descriptor: Name) -> Self {
        MethodRef {
            holder,
            name,
            descriptor,
        }
    }

    /// The same signature on another holder.
    #[must_use]
    #[inline]
    pub const fn with_holder(self, holder: TypeId) -> Self {
        MethodRef { holder, ..self }
    }

    /// Name and descriptor match, holder ignored.
    #[inline]
    pub fn same_signature(&self, other: &MethodRef) -> bool {
        self.name == other.name && self.descriptor == other.descriptor
    }
}

/// A field reference: holder, name and field type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldRef {
    pub holder: TypeId,
    pub name: Name,
    pub ty: TypeId,
}

impl FieldRef {
    pub const fn new(holder: TypeId, name: Name, ty: TypeId) -> Self {
        FieldRef { holder, name, ty }
    }

    #[must_use]
    #[inline]
    pub const fn with_holder(self, holder: TypeId) -> Self {
        FieldRef { holder, ..self }
    }

    #[inline]
    pub fn same_signature(&self, other: &FieldRef) -> bool {
        self.name == other.name && self.ty == other.ty
    }
}

#[cfg(test)]
mod tests;
