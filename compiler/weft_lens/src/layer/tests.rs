use pretty_assertions::assert_eq;
use weft_ir::ItemFactory;

use super::*;
use crate::LensChain;

#[test]
fn test_rebinding_layer_only_matches_its_kind() {
    let factory = ItemFactory::new();
    let a = factory.class_type("p.A");
    let b = factory.class_type("p.B");
    let a_m = factory.create_method(a, "m", "()V");
    let b_m = factory.create_method(b, "m", "()V");

    let mut builder = LensChain::new().begin_layer();
    builder.map_method(b_m, a_m, InvokeKind::Virtual);
    let Ok(layer) = builder.finish() else {
        panic!("non-empty layer must finish");
    };

    let virtual_hit = layer.describe_method(MethodLookupResult::unchanged(b_m, InvokeKind::Virtual));
    assert_eq!(
        virtual_hit,
        MethodLookupResult {
            reference: a_m,
            rebound_reference: Some(a_m),
            kind: InvokeKind::Virtual,
        }
    );

    let super_miss = MethodLookupResult::unchanged(b_m, InvokeKind::Super);
    assert_eq!(layer.describe_method(super_miss), super_miss);
}

#[test]
fn test_rebinding_layer_annotates_every_field() {
    let factory = ItemFactory::new();
    let a = factory.class_type("p.A");
    let b = factory.class_type("p.B");
    let int = factory.create_type("I");
    let a_f = factory.create_field(a, "f", int);
    let b_f = factory.create_field(b, "f", int);
    let other = factory.create_field(b, "g", int);

    let mut builder = LensChain::new().begin_layer();
    builder.map_field(b_f, a_f);
    let Ok(layer) = builder.finish() else {
        panic!("non-empty layer must finish");
    };

    let mapped = layer.describe_field(FieldLookupResult::unchanged(b_f));
    assert_eq!(mapped.reference, b_f);
    assert_eq!(mapped.rebound_reference, Some(a_f));

    let unmapped = layer.describe_field(FieldLookupResult::unchanged(other));
    assert_eq!(unmapped.rebound_reference, Some(other));
}

#[test]
fn test_moves_carry_holder_of_non_rebound_reference() {
    let factory = ItemFactory::new();
    let a = factory.class_type("p.A");
    let b = factory.class_type("p.B");
    let a2 = factory.class_type("r.A2");
    let b2 = factory.class_type("r.B2");
    let a_m = factory.create_method(a, "m", "()V");
    let b_m = factory.create_method(b, "m", "()V");
    let a2_m = factory.create_method(a2, "m", "()V");

    let mut moves = LensChain::new().begin_moves_layer();
    moves.move_type(a, a2).move_type(b, b2).move_method(a_m, a2_m);
    let Ok(layer) = moves.finish() else {
        panic!("non-empty moves layer must finish");
    };

    let previous = MethodLookupResult {
        reference: b_m,
        rebound_reference: Some(a_m),
        kind: InvokeKind::Virtual,
    };
    let described = layer.describe_method(previous);
    assert_eq!(described.rebound_reference, Some(a2_m));
    assert_eq!(described.reference, a2_m.with_holder(b2));
    assert_eq!(layer.previous_method_signature(a2_m), a_m);
    assert_eq!(layer.next_method_signature(a_m), a2_m);
}

#[test]
fn test_display_is_sorted_text() {
    let factory = ItemFactory::new();
    let a = factory.class_type("p.A");
    let b = factory.class_type("p.B");
    let c = factory.class_type("p.C");
    let a_m = factory.create_method(a, "m", "()V");
    let b_m = factory.create_method(b, "m", "()V");
    let c_m = factory.create_method(c, "m", "()V");

    let mut builder = LensChain::new().begin_layer();
    builder
        .map_method(c_m, a_m, InvokeKind::Virtual)
        .map_method_retyped(b_m, InvokeKind::Interface, a_m, InvokeKind::Virtual)
        .add_bridge(b, a_m);
    let Ok(layer) = builder.finish() else {
        panic!("non-empty layer must finish");
    };

    assert_eq!(
        layer.display(&factory),
        "[member-rebinding]\n  \
         bridge p.B.m()V\n  \
         interface p.B.m()V -> p.A.m()V as virtual\n  \
         virtual p.C.m()V -> p.A.m()V\n"
    );
}
