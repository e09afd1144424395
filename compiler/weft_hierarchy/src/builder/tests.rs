use pretty_assertions::assert_eq;
use weft_ir::{AccessFlags, InvokeKind, ItemFactory};

use super::*;
use crate::ResolutionOracle;

#[test]
fn test_object_is_predefined() {
    let hierarchy = ClassHierarchyBuilder::new(ItemFactory::new()).build();
    let factory = hierarchy.factory();
    let object = hierarchy.definition_for(factory.object_type());

    assert!(object.is_some_and(|c| c.origin == ClassOrigin::Library && c.is_public()));
    let equals = factory.create_method(factory.object_type(), "equals", "(Ljava/lang/Object;)Z");
    assert!(object.is_some_and(|c| c.lookup_method(&equals).is_some()));
    assert_eq!(hierarchy.len(), 1);
}

#[test]
fn test_class_defaults() {
    let mut builder = ClassHierarchyBuilder::new(ItemFactory::new());
    let a = builder.class("p.A").finish();
    let i = builder.interface("p.I").finish();
    let hierarchy = builder.build();
    let object = hierarchy.factory().object_type();

    let a_def = hierarchy.definition_for(a);
    assert_eq!(a_def.and_then(|c| c.super_type), Some(object));
    assert!(a_def.is_some_and(|c| c.is_program() && !c.is_interface() && !c.is_public()));

    let i_def = hierarchy.definition_for(i);
    assert_eq!(i_def.and_then(|c| c.super_type), None);
    assert!(i_def.is_some_and(ClassDef::is_interface));
}

#[test]
fn test_members_and_origins() {
    let mut builder = ClassHierarchyBuilder::new(ItemFactory::new());
    let target = builder.factory().class_type("p.T");
    let callee = builder.factory().create_method(target, "run", "()V");
    let a = builder
        .class("p.A")
        .classpath()
        .public()
        .extends("p.T")
        .implements("p.I")
        .method("m", "()V", AccessFlags::PUBLIC | AccessFlags::ABSTRACT)
        .code_method(
            "n",
            "()V",
            AccessFlags::PUBLIC,
            vec![Access::Invoke {
                kind: InvokeKind::Virtual,
                method: callee,
            }],
        )
        .field("count", "I", AccessFlags::PRIVATE)
        .finish();
    let hierarchy = builder.build();
    let factory = hierarchy.factory();

    let Some(def) = hierarchy.definition_for(a) else {
        panic!("p.A was not recorded");
    };
    assert_eq!(def.origin, ClassOrigin::Classpath);
    assert_eq!(def.super_type, Some(target));
    assert_eq!(def.interfaces, vec![factory.class_type("p.I")]);
    assert_eq!(def.methods.len(), 2);
    assert_eq!(def.methods[0].body, MethodBody::None);
    assert_eq!(def.methods[1].code().map(|c| c.accesses.len()), Some(1));
    assert_eq!(factory.field_sort_key(&def.fields[0].reference), "Lp/A;->count:I");
}

#[test]
fn test_with_method_rehomes_reference() {
    let mut builder = ClassHierarchyBuilder::new(ItemFactory::new());
    let elsewhere = builder.factory().class_type("p.Elsewhere");
    let reference = builder.factory().create_method(elsewhere, "m", "()V");
    let mut method = MethodDef::new(reference, AccessFlags::PUBLIC, MethodBody::None);
    method.library_override = Some(true);
    let a = builder.class("p.A").with_method(method).finish();
    let hierarchy = builder.build();

    let def = hierarchy.definition_for(a).and_then(|c| c.methods.first());
    assert_eq!(def.map(|m| m.reference.holder), Some(a));
    assert_eq!(def.and_then(|m| m.library_override), Some(true));
}
