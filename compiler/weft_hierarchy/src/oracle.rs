//! The resolution-oracle interface the rebinding core is written against.

use weft_ir::{AccessFlags, FieldRef, ItemFactory, MethodRef, TypeId};

use crate::{AccessConstraint, ClassDef, FieldResolution, MethodDef, MethodResolution};

/// Read-only view of the program's class hierarchy with JVM resolution.
///
/// `Sync` because the scan and planning phases query it from every worker.
pub trait ResolutionOracle: Sync {
    fn factory(&self) -> &ItemFactory;

    fn definition_for(&self, ty: TypeId) -> Option<&ClassDef>;

    /// Program classes in a stable order.
    fn program_classes(&self) -> Vec<&ClassDef>;

    /// Class method resolution of `method` starting at `holder`.
    fn resolve_on_class(&self, holder: TypeId, method: &MethodRef) -> MethodResolution;

    /// Interface method resolution of `method` starting at `holder`.
    fn resolve_on_interface(&self, holder: TypeId, method: &MethodRef) -> MethodResolution;

    /// Resolution when the holder kind is not known a priori: class or
    /// interface resolution depending on the definition of `method.holder`.
    fn resolve_unconstrained(&self, method: &MethodRef) -> MethodResolution {
        let factory = self.factory();
        if factory.is_array(method.holder) {
            return self.resolve_on_class(factory.object_type(), method);
        }
        match self.definition_for(method.holder) {
            Some(def) if def.is_interface() => self.resolve_on_interface(method.holder, method),
            Some(_) => self.resolve_on_class(method.holder, method),
            None => MethodResolution::NotFound,
        }
    }

    fn resolve_field(&self, field: &FieldRef) -> FieldResolution;

    /// Reflexive subtype test over superclass and interface edges.
    fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool;

    fn is_program_owned(&self, ty: TypeId) -> bool {
        self.definition_for(ty).is_some_and(ClassDef::is_program)
    }

    fn is_interface(&self, ty: TypeId) -> bool {
        self.definition_for(ty).is_some_and(ClassDef::is_interface)
    }

    /// Whether a member of `holder` with `flags` may be accessed from code
    /// in `context`. Both the holder class and the member must be
    /// accessible.
    fn accessible_from(&self, holder: TypeId, flags: AccessFlags, context: TypeId) -> bool {
        let Some(holder_def) = self.definition_for(holder) else {
            return false;
        };
        AccessConstraint::derive(self, context, holder, holder_def.flags).is_possible()
            && AccessConstraint::derive(self, context, holder, flags).is_possible()
    }
}

/// Mutation hook used once per pass, single-threaded, to commit bridges.
pub trait ProgramMutator {
    fn add_method(&mut self, holder: TypeId, method: MethodDef) -> Result<(), MutationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    #[error("no definition for holder `{0}`")]
    MissingHolder(String),
    #[error("`{0}` is not a program class")]
    NotProgramClass(String),
    #[error("`{0}` already declares a member with this signature")]
    DuplicateMethod(String),
}
