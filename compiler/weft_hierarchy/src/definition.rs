//! Class, method and field definitions.

use weft_ir::{AccessFlags, FieldRef, InvokeKind, MethodRef, TypeId};

/// Who controls a class.
///
/// Only program classes may be rewritten or receive bridges; classpath and
/// library classes are fixed at runtime.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ClassOrigin {
    Program,
    Classpath,
    Library,
}

/// One member access inside a method body.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Access {
    Invoke { kind: InvokeKind, method: MethodRef },
    FieldRead { field: FieldRef, is_static: bool },
    FieldWrite { field: FieldRef, is_static: bool },
}

/// Method code, reduced to the member accesses it performs in program order.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Code {
    pub accesses: Vec<Access>,
}

/// Body of a synthesized forwarding method: pass every argument to
/// `target` and return its result.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ForwardingBody {
    pub target: MethodRef,
    pub kind: InvokeKind,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum MethodBody {
    /// Abstract, native, or library method without visible code.
    None,
    Code(Code),
    Forward(ForwardingBody),
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MethodDef {
    pub reference: MethodRef,
    pub flags: AccessFlags,
    pub body: MethodBody,
    /// Whether this method overrides a library method, if known. Later
    /// passes gate API-level decisions on it.
    pub library_override: Option<bool>,
}

impl MethodDef {
    pub fn new(reference: MethodRef, flags: AccessFlags, body: MethodBody) -> Self {
        MethodDef {
            reference,
            flags,
            body,
            library_override: None,
        }
    }

    /// A synthetic bridge on `holder` that forwards to `self`.
    ///
    /// The bridge keeps `self`'s visibility, drops `abstract` and `final`,
    /// and inherits the library-override classification.
    pub fn to_forwarding_method(&self, holder: TypeId, kind: InvokeKind) -> MethodDef {
        MethodDef {
            reference: self.reference.with_holder(holder),
            flags: self.flags.for_forwarding_bridge(),
            body: MethodBody::Forward(ForwardingBody {
                target: self.reference,
                kind,
            }),
            library_override: self.library_override,
        }
    }

    pub fn code(&self) -> Option<&Code> {
        match &self.body {
            MethodBody::Code(code) => Some(code),
            MethodBody::None | MethodBody::Forward(_) => None,
        }
    }

    pub fn is_abstract(&self) -> bool {
        self.flags.is_abstract()
    }

    /// Static or private: never selected by virtual dispatch.
    pub fn is_non_virtual(&self) -> bool {
        self.flags.is_static() || self.flags.is_private()
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FieldDef {
    pub reference: FieldRef,
    pub flags: AccessFlags,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ClassDef {
    pub ty: TypeId,
    pub super_type: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    pub flags: AccessFlags,
    pub origin: ClassOrigin,
    pub methods: Vec<MethodDef>,
    pub fields: Vec<FieldDef>,
}

impl ClassDef {
    pub fn new(ty: TypeId, origin: ClassOrigin, flags: AccessFlags) -> Self {
        ClassDef {
            ty,
            super_type: None,
            interfaces: Vec::new(),
            flags,
            origin,
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        self.flags.is_interface()
    }

    #[inline]
    pub fn is_program(&self) -> bool {
        self.origin == ClassOrigin::Program
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.flags.is_public()
    }

    /// The declared method with `method`'s name and descriptor, whatever
    /// holder `method` names.
    pub fn lookup_method(&self, method: &MethodRef) -> Option<&MethodDef> {
        self.methods
            .iter()
            .find(|m| m.reference.same_signature(method))
    }

    pub fn lookup_field(&self, field: &FieldRef) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.reference.same_signature(field))
    }

    /// Direct supertypes: superclass first, then interfaces in declaration
    /// order.
    pub fn supertypes(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.super_type.into_iter().chain(self.interfaces.iter().copied())
    }
}
