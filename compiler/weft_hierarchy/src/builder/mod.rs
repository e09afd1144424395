//! Fluent construction of class hierarchies.
//!
//! Used by tests and by embedders that assemble a program from an external
//! class index:
//!
//! ```ignore
//! let mut builder = ClassHierarchyBuilder::new(ItemFactory::new());
//! builder.interface("p.I").method("foo", "()V", AccessFlags::PUBLIC | AccessFlags::ABSTRACT).finish();
//! builder.class("p.A").implements("p.I").finish();
//! let hierarchy = builder.build();
//! ```

use weft_ir::{AccessFlags, ItemFactory, TypeId};

use crate::{Access, ClassDef, ClassHierarchy, ClassOrigin, Code, FieldDef, MethodBody, MethodDef};

/// Builds a [`ClassHierarchy`] with `java.lang.Object` predefined as a
/// public library class.
pub struct ClassHierarchyBuilder {
    hierarchy: ClassHierarchy,
}

impl ClassHierarchyBuilder {
    pub fn new(factory: ItemFactory) -> Self {
        let object = factory.object_type();
        let mut class = ClassDef::new(object, ClassOrigin::Library, AccessFlags::PUBLIC);
        for (name, descriptor, flags) in [
            ("<init>", "()V", AccessFlags::PUBLIC),
            ("equals", "(Ljava/lang/Object;)Z", AccessFlags::PUBLIC),
            ("hashCode", "()I", AccessFlags::PUBLIC),
            ("toString", "()Ljava/lang/String;", AccessFlags::PUBLIC),
            (
                "getClass",
                "()Ljava/lang/Class;",
                AccessFlags::PUBLIC | AccessFlags::FINAL,
            ),
            ("clone", "()Ljava/lang/Object;", AccessFlags::PROTECTED),
        ] {
            let reference = factory.create_method(object, name, descriptor);
            class
                .methods
                .push(MethodDef::new(reference, flags, MethodBody::None));
        }
        let mut hierarchy = ClassHierarchy::new(factory);
        hierarchy.insert(class);
        ClassHierarchyBuilder { hierarchy }
    }

    pub fn factory(&self) -> &ItemFactory {
        crate::ResolutionOracle::factory(&self.hierarchy)
    }

    /// Start a program class extending `java.lang.Object`.
    pub fn class(&mut self, java_name: &str) -> ClassBuilder<'_> {
        let ty = self.factory().class_type(java_name);
        let object = self.factory().object_type();
        let mut class = ClassDef::new(ty, ClassOrigin::Program, AccessFlags::empty());
        class.super_type = Some(object);
        ClassBuilder { owner: self, class }
    }

    /// Start a program interface.
    pub fn interface(&mut self, java_name: &str) -> ClassBuilder<'_> {
        let ty = self.factory().class_type(java_name);
        let flags = AccessFlags::INTERFACE | AccessFlags::ABSTRACT;
        let class = ClassDef::new(ty, ClassOrigin::Program, flags);
        ClassBuilder { owner: self, class }
    }

    pub fn build(self) -> ClassHierarchy {
        self.hierarchy
    }
}

/// A class under construction. Nothing is recorded until [`finish`].
///
/// [`finish`]: ClassBuilder::finish
#[must_use = "a class is only added to the hierarchy by `finish`"]
pub struct ClassBuilder<'b> {
    owner: &'b mut ClassHierarchyBuilder,
    class: ClassDef,
}

impl ClassBuilder<'_> {
    pub fn program(mut self) -> Self {
        self.class.origin = ClassOrigin::Program;
        self
    }

    pub fn library(mut self) -> Self {
        self.class.origin = ClassOrigin::Library;
        self
    }

    pub fn classpath(mut self) -> Self {
        self.class.origin = ClassOrigin::Classpath;
        self
    }

    pub fn public(mut self) -> Self {
        self.class.flags |= AccessFlags::PUBLIC;
        self
    }

    pub fn extends(mut self, java_name: &str) -> Self {
        self.class.super_type = Some(self.owner.factory().class_type(java_name));
        self
    }

    pub fn implements(mut self, java_name: &str) -> Self {
        let iface = self.owner.factory().class_type(java_name);
        self.class.interfaces.push(iface);
        self
    }

    /// Declare a method without member accesses. Abstract methods get no
    /// body.
    pub fn method(self, name: &str, descriptor: &str, flags: AccessFlags) -> Self {
        let body = if flags.is_abstract() {
            MethodBody::None
        } else {
            MethodBody::Code(Code::default())
        };
        self.declare(name, descriptor, flags, body)
    }

    /// Declare a method whose code performs `accesses` in order.
    pub fn code_method(
        self,
        name: &str,
        descriptor: &str,
        flags: AccessFlags,
        accesses: Vec<Access>,
    ) -> Self {
        self.declare(name, descriptor, flags, MethodBody::Code(Code { accesses }))
    }

    /// Declare a fully formed method; its holder is replaced by this class.
    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.class.methods.push(MethodDef {
            reference: method.reference.with_holder(self.class.ty),
            ..method
        });
        self
    }

    pub fn field(mut self, name: &str, ty_descriptor: &str, flags: AccessFlags) -> Self {
        let factory = self.owner.factory();
        let ty = factory.create_type(ty_descriptor);
        let reference = factory.create_field(self.class.ty, name, ty);
        self.class.fields.push(FieldDef { reference, flags });
        self
    }

    /// Record the class and return its type.
    pub fn finish(self) -> TypeId {
        let ty = self.class.ty;
        self.owner.hierarchy.insert(self.class);
        ty
    }

    fn declare(mut self, name: &str, descriptor: &str, flags: AccessFlags, body: MethodBody) -> Self {
        let reference = self
            .owner
            .factory()
            .create_method(self.class.ty, name, descriptor);
        self.class.methods.push(MethodDef::new(reference, flags, body));
        self
    }
}

#[cfg(test)]
mod tests;
