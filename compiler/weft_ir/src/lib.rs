//! Weft IR - symbolic program references.
//!
//! This crate contains the value types every other weft crate speaks in:
//! - `Name` for interned strings (identifiers, descriptors)
//! - `TypeId` for JVM types, keyed by their interned descriptor
//! - `MethodRef` / `FieldRef` for holder-qualified member references
//! - `InvokeKind` for the dispatch mechanism of a call site
//! - `AccessFlags` for class and member modifiers
//! - `ItemFactory` for creating references and answering descriptor queries
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: descriptors and names are `Name(u32)`, so member
//!   references are small `Copy` values with O(1) structural equality.
//! - **References are symbolic**: a `MethodRef` does not imply that the
//!   member exists or resolves.
//! - **Determinism by text**: interned indices depend on interning order,
//!   which is not stable under concurrent interning. Anything that must be
//!   reproducible sorts by the factory's textual sort keys instead.

mod factory;
mod flags;
mod interner;
mod invoke;
mod name;
mod reference;

pub use factory::ItemFactory;
pub use flags::AccessFlags;
pub use interner::{InternError, SharedInterner, StringInterner};
pub use invoke::InvokeKind;
pub use name::Name;
pub use reference::{FieldRef, MethodRef, TypeId};

/// Compile-time assertion that a type has a specific size.
///
/// Used to keep member references small; they are copied into every table.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod size_asserts {
    use super::{FieldRef, MethodRef, Name, TypeId};
    crate::static_assert_size!(Name, 4);
    crate::static_assert_size!(TypeId, 4);
    crate::static_assert_size!(MethodRef, 12);
    crate::static_assert_size!(FieldRef, 12);
}
