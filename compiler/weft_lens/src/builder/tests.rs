use pretty_assertions::assert_eq;
use weft_ir::ItemFactory;

use super::*;
use crate::{LayerKind, LensChain};

struct Refs {
    a_m: MethodRef,
    b_m: MethodRef,
    c_m: MethodRef,
    b_f: FieldRef,
    a_f: FieldRef,
    c_f: FieldRef,
}

fn refs(factory: &ItemFactory) -> Refs {
    let a = factory.class_type("p.A");
    let b = factory.class_type("p.B");
    let c = factory.class_type("p.C");
    let int = factory.create_type("I");
    Refs {
        a_m: factory.create_method(a, "m", "()V"),
        b_m: factory.create_method(b, "m", "()V"),
        c_m: factory.create_method(c, "m", "()V"),
        b_f: factory.create_field(b, "f", int),
        a_f: factory.create_field(a, "f", int),
        c_f: factory.create_field(c, "f", int),
    }
}

#[test]
fn test_identity_mappings_are_dropped() {
    let factory = ItemFactory::new();
    let r = refs(&factory);
    let chain = LensChain::new();

    let mut builder = chain.begin_layer();
    builder
        .map_method(r.a_m, r.a_m, InvokeKind::Virtual)
        .map_field(r.a_f, r.a_f);
    assert!(builder.is_empty());
    assert_eq!(
        builder.finish().err(),
        Some(LensError::EmptyLayer("member-rebinding"))
    );
}

#[test]
fn test_kind_change_alone_is_recorded() {
    let factory = ItemFactory::new();
    let r = refs(&factory);
    let chain = LensChain::new();

    let mut builder = chain.begin_layer();
    builder.map_method_retyped(r.a_m, InvokeKind::Interface, r.a_m, InvokeKind::Virtual);
    let Ok(layer) = builder.finish() else {
        panic!("layer with a retyped entry must finish");
    };
    let LayerKind::MemberRebinding(rebinding) = layer.kind() else {
        panic!("expected a member-rebinding layer");
    };
    assert_eq!(
        rebinding.method_entry(InvokeKind::Interface, &r.a_m).map(|e| e.kind),
        Some(InvokeKind::Virtual)
    );
    assert_eq!(rebinding.method_entry(InvokeKind::Virtual, &r.a_m), None);
}

#[test]
fn test_repeated_mapping_is_idempotent() {
    let factory = ItemFactory::new();
    let r = refs(&factory);
    let chain = LensChain::new();

    let mut builder = chain.begin_layer();
    builder
        .map_method(r.b_m, r.a_m, InvokeKind::Virtual)
        .map_method(r.b_m, r.a_m, InvokeKind::Virtual)
        .map_field(r.b_f, r.a_f)
        .map_field(r.b_f, r.a_f);
    assert!(builder.finish().is_ok());
}

#[test]
fn test_conflicting_mappings_fail() {
    let factory = ItemFactory::new();
    let r = refs(&factory);
    let chain = LensChain::new();

    let mut methods = chain.begin_layer();
    methods
        .map_method(r.b_m, r.a_m, InvokeKind::Virtual)
        .map_method(r.b_m, r.c_m, InvokeKind::Virtual);
    assert_eq!(
        methods.finish().err(),
        Some(LensError::ConflictingMethodMapping {
            from: r.b_m,
            kind: InvokeKind::Virtual,
        })
    );

    let mut fields = chain.begin_field_rebinding_layer();
    fields.map_field(r.b_f, r.a_f).map_field(r.b_f, r.c_f);
    assert_eq!(
        fields.finish().err(),
        Some(LensError::ConflictingFieldMapping { from: r.b_f })
    );
}

#[test]
fn test_same_reference_may_map_per_kind() {
    let factory = ItemFactory::new();
    let r = refs(&factory);
    let chain = LensChain::new();

    let mut builder = chain.begin_layer();
    builder
        .map_method(r.b_m, r.a_m, InvokeKind::Virtual)
        .map_method(r.b_m, r.c_m, InvokeKind::Super);
    assert!(builder.finish().is_ok());
}

#[test]
fn test_field_rebinding_layer_may_be_empty() {
    let chain = LensChain::new();
    let layer = chain.begin_field_rebinding_layer().finish();
    assert!(matches!(
        layer.as_ref().map(LensLayer::kind),
        Ok(LayerKind::FieldRebindingOnly(inner)) if inner.is_empty()
    ));
}

#[test]
fn test_moves_layer_rejects_empty() {
    let chain = LensChain::new();
    assert_eq!(
        chain.begin_moves_layer().finish().err(),
        Some(LensError::EmptyLayer("moves"))
    );
}

#[test]
fn test_bridges_take_holder() {
    let factory = ItemFactory::new();
    let r = refs(&factory);
    let chain = LensChain::new();

    let mut builder = chain.begin_layer();
    builder.add_bridge(r.c_m.holder, r.a_m);
    let Ok(layer) = builder.finish() else {
        panic!("a layer with a bridge is not empty");
    };
    let LayerKind::MemberRebinding(rebinding) = layer.kind() else {
        panic!("expected a member-rebinding layer");
    };
    assert_eq!(rebinding.bridges(), &[r.c_m]);
}
