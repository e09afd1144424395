//! Class hierarchy and member resolution.
//!
//! The rebinding core depends on the [`ResolutionOracle`] interface only.
//! [`ClassHierarchy`] is the in-memory implementation used by tests and by
//! embedders that do not bring their own class index; it follows the JVM
//! resolution rules:
//!
//! - **Class method resolution** (JVMS 5.4.3.3): the class, its superclass
//!   chain, then the maximally-specific superinterface methods.
//! - **Interface method resolution** (JVMS 5.4.3.4): the interface, public
//!   instance methods of `java.lang.Object`, then the maximally-specific
//!   superinterface methods.
//! - **Field resolution** (JVMS 5.4.3.2): declared field, superinterfaces,
//!   then superclass.
//!
//! Array holders resolve against `java.lang.Object`.

mod access;
mod builder;
mod definition;
mod hierarchy;
mod oracle;
mod resolution;

pub use access::AccessConstraint;
pub use builder::{ClassBuilder, ClassHierarchyBuilder};
pub use definition::{Access, ClassDef, ClassOrigin, Code, FieldDef, ForwardingBody, MethodBody, MethodDef};
pub use hierarchy::ClassHierarchy;
pub use oracle::{MutationError, ProgramMutator, ResolutionOracle};
pub use resolution::{FieldResolution, MethodResolution, ResolvedField, ResolvedMethod};
