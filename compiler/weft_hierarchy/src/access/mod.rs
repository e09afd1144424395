//! Access constraints between a calling context and a target.

use weft_ir::{AccessFlags, TypeId};

use crate::ResolutionOracle;

/// How widely a class or member may be accessed, relative to a context.
///
/// Ordered from most to least restrictive; `Never` means the context cannot
/// access the target at all.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum AccessConstraint {
    Never,
    SameClass,
    Package,
    Subclass,
    Always,
}

impl AccessConstraint {
    /// Constraint for accessing something with `flags` declared on
    /// `target_holder`, from code in `context`.
    ///
    /// Pass the class flags of `target_holder` to get the class constraint,
    /// or a member's flags to get the member constraint.
    pub fn derive<O>(
        oracle: &O,
        context: TypeId,
        target_holder: TypeId,
        flags: AccessFlags,
    ) -> AccessConstraint
    where
        O: ResolutionOracle + ?Sized,
    {
        let factory = oracle.factory();
        if flags.is_public() {
            return AccessConstraint::Always;
        }
        if flags.is_private() {
            return if context == target_holder {
                AccessConstraint::SameClass
            } else {
                AccessConstraint::Never
            };
        }
        if factory.same_package(context, target_holder) {
            return AccessConstraint::Package;
        }
        if flags.is_protected() && oracle.is_subtype(context, target_holder) {
            return AccessConstraint::Subclass;
        }
        AccessConstraint::Never
    }

    #[inline]
    pub fn is_possible(self) -> bool {
        self != AccessConstraint::Never
    }
}
