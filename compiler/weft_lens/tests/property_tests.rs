//! Property-based tests for the lens chain.
//!
//! References are drawn from small pools of classes and member names so
//! that generated mappings collide often.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use weft_ir::{FieldRef, InvokeKind, ItemFactory, MethodRef};
use weft_lens::{LayerKind, LensChain};

// -- Strategies --

fn kind_strategy() -> impl Strategy<Value = InvokeKind> {
    prop::sample::select(InvokeKind::ALL.to_vec())
}

/// (class index, member index) pairs, interpreted against a factory.
fn member_strategy() -> impl Strategy<Value = (u8, u8)> {
    (0u8..5, 0u8..3)
}

fn method(factory: &ItemFactory, (class, member): (u8, u8)) -> MethodRef {
    let holder = factory.class_type(&format!("p.C{class}"));
    factory.create_method(holder, &format!("m{member}"), "()V")
}

fn field(factory: &ItemFactory, (class, member): (u8, u8)) -> FieldRef {
    let holder = factory.class_type(&format!("p.C{class}"));
    let int = factory.create_type("I");
    factory.create_field(holder, &format!("f{member}"), int)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// No stored entry maps a reference to itself under the same kind, and
    /// every lookup of a stored key returns the stored target.
    #[test]
    fn rebinding_layer_is_compact(
        mappings in prop::collection::vec((member_strategy(), member_strategy(), kind_strategy()), 1..24)
    ) {
        let factory = ItemFactory::new();
        let mut chain = LensChain::new();
        let mut builder = chain.begin_layer();
        let mut expected = std::collections::HashMap::new();
        for (from, to, kind) in &mappings {
            let from = method(&factory, *from);
            let to = method(&factory, *to);
            // Keep the first target per key so the builder sees no conflicts.
            if expected.contains_key(&(from, *kind)) {
                continue;
            }
            expected.insert((from, *kind), to);
            builder.map_method(from, to, *kind);
        }

        if builder.is_empty() {
            prop_assert!(expected.iter().all(|((from, _), to)| from == to));
            return Ok(());
        }
        let layer = builder.finish().expect("conflict-free layer");
        let LayerKind::MemberRebinding(rebinding) = layer.kind() else {
            panic!("expected a member-rebinding layer");
        };
        for kind in InvokeKind::ALL {
            for (from, entry) in rebinding.method_entries(kind) {
                prop_assert!(*from != entry.target || entry.kind != kind);
            }
        }
        chain.push(layer).expect("fresh layer links");

        for ((from, kind), to) in &expected {
            let result = chain.lookup_method(*from, None, *kind);
            prop_assert_eq!(result.reference, *to);
            prop_assert_eq!(result.kind, *kind);
        }
    }

    /// Once a rebinding layer is linked, every field lookup carries a
    /// rebound reference.
    #[test]
    fn field_lookup_is_total(
        mapped in prop::collection::vec((member_strategy(), member_strategy()), 0..12),
        queried in prop::collection::vec(member_strategy(), 1..12),
    ) {
        let factory = ItemFactory::new();
        let mut chain = LensChain::new();
        let mut builder = chain.begin_field_rebinding_layer();
        let mut seen = std::collections::HashSet::new();
        for (from, to) in &mapped {
            let from = field(&factory, *from);
            if seen.insert(from) {
                builder.map_field(from, field(&factory, *to));
            }
        }
        chain.push(builder.finish().expect("conflict-free layer")).expect("fresh layer links");

        for query in queried {
            let query = field(&factory, query);
            let result = chain.lookup_field(query);
            prop_assert!(result.rebound_reference.is_some());
            prop_assert_eq!(result.reference, query);
        }
    }

    /// Moving definitions one-to-one and walking back recovers the originals.
    #[test]
    fn moves_walk_back_to_originals(
        classes in prop::collection::vec(0u8..5, 1..5),
        target_package in "[a-z]{1,4}",
    ) {
        let factory = ItemFactory::new();
        let mut chain = LensChain::new();
        let mut moves = chain.begin_moves_layer();
        let mut originals = Vec::new();
        for class in classes {
            let original = method(&factory, (class, 0));
            if originals.contains(&original) {
                continue;
            }
            let holder = factory.class_type(&format!("{target_package}.Moved{class}"));
            moves.move_method(original, original.with_holder(holder));
            originals.push(original);
        }
        chain.push(moves.finish().expect("non-empty moves")).expect("fresh layer links");

        for original in originals {
            let renamed = chain.renamed_method_signature(original, None);
            prop_assert_ne!(renamed, original);
            prop_assert_eq!(chain.original_method_signature(renamed), original);
        }
    }
}
