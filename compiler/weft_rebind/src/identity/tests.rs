use pretty_assertions::assert_eq;
use weft_hierarchy::{Access, ClassHierarchyBuilder};
use weft_ir::{AccessFlags, InvokeKind, ItemFactory};

use super::*;

#[test]
fn test_identity_lens_maps_every_resolvable_field() {
    let mut builder = ClassHierarchyBuilder::new(ItemFactory::new());
    let factory = builder.factory().clone();
    let a = builder
        .class("p.A")
        .field("f", "I", AccessFlags::PUBLIC)
        .field("hidden", "I", AccessFlags::PRIVATE)
        .finish();
    let b = builder.class("p.B").extends("p.A").method("m", "()V", AccessFlags::PUBLIC).finish();
    let int = factory.create_type("I");
    let b_f = factory.create_field(b, "f", int);
    let b_hidden = factory.create_field(b, "hidden", int);
    let b_missing = factory.create_field(b, "missing", int);
    let b_m = factory.create_method(b, "m", "()V");
    builder
        .class("q.Main")
        .code_method(
            "run",
            "()V",
            AccessFlags::PUBLIC,
            vec![
                Access::FieldRead { field: b_f, is_static: false },
                Access::FieldRead { field: b_hidden, is_static: false },
                Access::FieldWrite { field: b_missing, is_static: false },
                Access::Invoke { kind: InvokeKind::Virtual, method: b_m },
            ],
        )
        .finish();
    let hierarchy = builder.build();

    let mut chain = LensChain::new();
    let lens = run_identity_rebinding(&hierarchy, &mut chain, &RebindingOptions::single_threaded());
    assert_eq!(lens.ok(), Some(chain.head()));

    // Accessibility is not checked here.
    assert_eq!(chain.lookup_field(b_f).rebound_or_reference(), b_f.with_holder(a));
    assert_eq!(chain.lookup_field(b_hidden).rebound_or_reference(), b_hidden.with_holder(a));
    assert_eq!(chain.lookup_field(b_missing).rebound_or_reference(), b_missing);
    assert_eq!(chain.lookup_field(b_f).reference, b_f);

    let method = chain.lookup_method(b_m, None, InvokeKind::Virtual);
    assert_eq!(method.reference, b_m);
    assert_eq!(method.kind, InvokeKind::Virtual);
}

#[test]
fn test_identity_lens_on_empty_program() {
    let hierarchy = ClassHierarchyBuilder::new(ItemFactory::new()).build();
    let mut chain = LensChain::new();
    let accesses = AccessCollection::collect(&hierarchy);

    let lens = build_identity_lens(&hierarchy, &mut chain, &accesses);
    assert!(lens.is_ok());
    assert_eq!(chain.len(), 2);
    assert!(!chain.is_identity());
}
