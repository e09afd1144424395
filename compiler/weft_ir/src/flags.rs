//! Class and member access flags.
//!
//! Bit values follow the class-file encoding so flags read from a parser can
//! be passed through unchanged.

use bitflags::bitflags;

bitflags! {
    /// Modifiers of a class, method or field.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct AccessFlags: u32 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        /// Methods only.
        const BRIDGE = 0x0040;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
    }
}

impl AccessFlags {
    const VISIBILITY: AccessFlags = AccessFlags::PUBLIC
        .union(AccessFlags::PRIVATE)
        .union(AccessFlags::PROTECTED);

    #[inline]
    pub fn is_public(self) -> bool {
        self.contains(AccessFlags::PUBLIC)
    }

    #[inline]
    pub fn is_private(self) -> bool {
        self.contains(AccessFlags::PRIVATE)
    }

    #[inline]
    pub fn is_protected(self) -> bool {
        self.contains(AccessFlags::PROTECTED)
    }

    #[inline]
    pub fn is_static(self) -> bool {
        self.contains(AccessFlags::STATIC)
    }

    #[inline]
    pub fn is_interface(self) -> bool {
        self.contains(AccessFlags::INTERFACE)
    }

    #[inline]
    pub fn is_abstract(self) -> bool {
        self.contains(AccessFlags::ABSTRACT)
    }

    /// Flags for a forwarding bridge synthesized from `self`: same
    /// visibility and staticness, concrete, marked synthetic bridge.
    #[must_use]
    pub fn for_forwarding_bridge(self) -> AccessFlags {
        (self & (Self::VISIBILITY | AccessFlags::STATIC))
            | AccessFlags::SYNTHETIC
            | AccessFlags::BRIDGE
    }
}
