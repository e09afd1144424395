//! Reference factory and descriptor queries.
//!
//! `ItemFactory` is the only place that turns text into `TypeId`/`MethodRef`/
//! `FieldRef` and back. Every crate that needs a package name, an array test
//! or a reproducible sort key goes through it.

use crate::{FieldRef, MethodRef, Name, SharedInterner, StringInterner, TypeId};

/// Creates references and answers descriptor queries.
///
/// Cloning is cheap: the interner is shared.
#[derive(Clone)]
pub struct ItemFactory {
    interner: SharedInterner,
    object_type: TypeId,
}

impl ItemFactory {
    pub fn new() -> Self {
        Self::with_interner(SharedInterner::new())
    }

    pub fn with_interner(interner: SharedInterner) -> Self {
        let object_type = TypeId::from_descriptor(interner.intern("Ljava/lang/Object;"));
        ItemFactory {
            interner,
            object_type,
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn shared_interner(&self) -> &SharedInterner {
        &self.interner
    }

    #[inline]
    pub fn object_type(&self) -> TypeId {
        self.object_type
    }

    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Type from a raw descriptor such as `Lp/X;` or `[I`.
    pub fn create_type(&self, descriptor: &str) -> TypeId {
        TypeId::from_descriptor(self.interner.intern(descriptor))
    }

    /// Class type from a Java name such as `p.X` or `p.Outer$Inner`.
    pub fn class_type(&self, java_name: &str) -> TypeId {
        let mut descriptor = String::with_capacity(java_name.len() + 2);
        descriptor.push('L');
        descriptor.extend(java_name.chars().map(|c| if c == '.' { '/' } else { c }));
        descriptor.push(';');
        self.create_type(&descriptor)
    }

    /// One-dimension array of `element`.
    pub fn array_type(&self, element: TypeId) -> TypeId {
        let mut descriptor = String::from("[");
        descriptor.push_str(self.descriptor(element));
        self.create_type(&descriptor)
    }

    pub fn create_method(&self, holder: TypeId, name: &str, descriptor: &str) -> MethodRef {
        MethodRef::new(holder, self.intern(name), self.intern(descriptor))
    }

    pub fn create_field(&self, holder: TypeId, name: &str, ty: TypeId) -> FieldRef {
        FieldRef::new(holder, self.intern(name), ty)
    }

    /// The descriptor text of a type.
    #[inline]
    pub fn descriptor(&self, ty: TypeId) -> &'static str {
        self.interner.lookup(ty.descriptor())
    }

    #[inline]
    pub fn name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    pub fn is_array(&self, ty: TypeId) -> bool {
        self.descriptor(ty).starts_with('[')
    }

    pub fn is_class_type(&self, ty: TypeId) -> bool {
        self.descriptor(ty).starts_with('L')
    }

    /// Package part of a class descriptor in internal form (`p/q` for
    /// `Lp/q/X;`, empty for the default package and for non-class types).
    pub fn package_descriptor(&self, ty: TypeId) -> &'static str {
        let descriptor = self.descriptor(ty);
        if !descriptor.starts_with('L') {
            return "";
        }
        match descriptor.rfind('/') {
            Some(slash) => &descriptor[1..slash],
            None => "",
        }
    }

    pub fn same_package(&self, a: TypeId, b: TypeId) -> bool {
        self.package_descriptor(a) == self.package_descriptor(b)
    }

    /// Source-level name: `p.X` for classes, `p.X[]` for arrays.
    pub fn java_name(&self, ty: TypeId) -> String {
        java_name_of(self.descriptor(ty))
    }

    /// Reproducible ordering key for a method (`Lp/X;->m(I)V`).
    pub fn method_sort_key(&self, method: &MethodRef) -> String {
        format!(
            "{}->{}{}",
            self.descriptor(method.holder),
            self.name(method.name),
            self.name(method.descriptor)
        )
    }

    /// Reproducible ordering key for a field (`Lp/X;->f:I`).
    pub fn field_sort_key(&self, field: &FieldRef) -> String {
        format!(
            "{}->{}:{}",
            self.descriptor(field.holder),
            self.name(field.name),
            self.descriptor(field.ty)
        )
    }

    /// Human-readable method (`p.X.m(I)V`), for logs and diagnostics.
    pub fn display_method(&self, method: &MethodRef) -> String {
        format!(
            "{}.{}{}",
            self.java_name(method.holder),
            self.name(method.name),
            self.name(method.descriptor)
        )
    }

    /// Human-readable field (`p.X.f`).
    pub fn display_field(&self, field: &FieldRef) -> String {
        format!("{}.{}", self.java_name(field.holder), self.name(field.name))
    }
}

impl Default for ItemFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn java_name_of(descriptor: &str) -> String {
    if let Some(element) = descriptor.strip_prefix('[') {
        return format!("{}[]", java_name_of(element));
    }
    if let Some(class) = descriptor
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
    {
        return class.replace('/', ".");
    }
    let primitive = match descriptor {
        "V" => "void",
        "Z" => "boolean",
        "B" => "byte",
        "C" => "char",
        "S" => "short",
        "I" => "int",
        "J" => "long",
        "F" => "float",
        "D" => "double",
        other => other,
    };
    primitive.to_owned()
}
