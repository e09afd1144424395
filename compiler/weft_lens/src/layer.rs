//! Lens layers: the closed set of rewrite variants.
//!
//! Each variant implements only its own delta. The chain threads a lookup
//! result through the layers and each layer describes how it changes that
//! result; a layer without an entry returns its input unchanged.

use std::fmt::Write as _;

use rustc_hash::FxHashMap;
use weft_ir::{FieldRef, InvokeKind, ItemFactory, MethodRef, TypeId};

use crate::{FieldLookupResult, LensId, MethodLookupResult};

/// Where a rebinding layer sends one call-site reference.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct RebindingEntry {
    pub target: MethodRef,
    /// Invoke kind to emit; differs from the keyed kind when the target
    /// moved between a class and an interface.
    pub kind: InvokeKind,
}

/// Method retargeting keyed by invoke kind, plus field annotations.
#[derive(Clone, Debug, Default)]
pub struct MemberRebindingLayer {
    pub(crate) methods: [FxHashMap<MethodRef, RebindingEntry>; InvokeKind::ALL.len()],
    pub(crate) fields: FxHashMap<FieldRef, FieldRef>,
    pub(crate) bridges: Vec<MethodRef>,
}

impl MemberRebindingLayer {
    pub fn method_entry(&self, kind: InvokeKind, from: &MethodRef) -> Option<&RebindingEntry> {
        self.methods[kind.index()].get(from)
    }

    /// All entries recorded for `kind`, in no particular order.
    pub fn method_entries(
        &self,
        kind: InvokeKind,
    ) -> impl Iterator<Item = (&MethodRef, &RebindingEntry)> + '_ {
        self.methods[kind.index()].iter()
    }

    pub fn rebound_field(&self, field: &FieldRef) -> Option<FieldRef> {
        self.fields.get(field).copied()
    }

    pub fn field_entries(&self) -> impl Iterator<Item = (&FieldRef, &FieldRef)> + '_ {
        self.fields.iter()
    }

    /// Bridges synthesized while building this layer, in commit order.
    pub fn bridges(&self) -> &[MethodRef] {
        &self.bridges
    }

    pub fn method_entry_count(&self) -> usize {
        self.methods.iter().map(FxHashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.method_entry_count() == 0 && self.fields.is_empty() && self.bridges.is_empty()
    }

    fn describe_method(&self, previous: MethodLookupResult) -> MethodLookupResult {
        match self.method_entry(previous.kind, &previous.reference) {
            Some(entry) => MethodLookupResult {
                reference: entry.target,
                rebound_reference: Some(entry.target),
                kind: entry.kind,
            },
            None => previous,
        }
    }
}

/// Field annotations only. Never collapsed away even when empty: its
/// presence guarantees that every field lookup carries a rebound reference.
#[derive(Clone, Debug, Default)]
pub struct FieldRebindingLayer {
    pub(crate) fields: FxHashMap<FieldRef, FieldRef>,
}

impl FieldRebindingLayer {
    pub fn rebound_field(&self, field: &FieldRef) -> Option<FieldRef> {
        self.fields.get(field).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Definitions moved or renamed by a pass.
///
/// Forward maps may be many-to-one (several members merged into one); the
/// inverse maps keep one representative original per target.
#[derive(Clone, Debug, Default)]
pub struct MovesLayer {
    pub(crate) types: FxHashMap<TypeId, TypeId>,
    pub(crate) methods: FxHashMap<MethodRef, MethodRef>,
    pub(crate) method_representatives: FxHashMap<MethodRef, MethodRef>,
    pub(crate) fields: FxHashMap<FieldRef, FieldRef>,
    pub(crate) field_representatives: FxHashMap<FieldRef, FieldRef>,
}

impl MovesLayer {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.methods.is_empty() && self.fields.is_empty()
    }

    fn lookup_type(&self, ty: TypeId) -> TypeId {
        self.types.get(&ty).copied().unwrap_or(ty)
    }

    fn next_method(&self, method: MethodRef) -> MethodRef {
        self.methods.get(&method).copied().unwrap_or(method)
    }

    fn next_field(&self, field: FieldRef) -> FieldRef {
        self.fields.get(&field).copied().unwrap_or(field)
    }

    // Rewrite the rebound reference, then carry the non-rebound holder
    // along with any type move.
    fn describe_method(&self, previous: MethodLookupResult) -> MethodLookupResult {
        match previous.rebound_reference {
            Some(rebound) => {
                let rewritten = self.next_method(rebound);
                let reference = if previous.reference == rebound {
                    rewritten
                } else {
                    rewritten.with_holder(self.lookup_type(previous.reference.holder))
                };
                MethodLookupResult {
                    reference,
                    rebound_reference: Some(rewritten),
                    kind: previous.kind,
                }
            }
            None => MethodLookupResult {
                reference: self.next_method(previous.reference),
                ..previous
            },
        }
    }

    fn describe_field(&self, previous: FieldLookupResult) -> FieldLookupResult {
        match previous.rebound_reference {
            Some(rebound) => {
                let rewritten = self.next_field(rebound);
                let reference = if previous.reference == rebound {
                    rewritten
                } else {
                    rewritten.with_holder(self.lookup_type(previous.reference.holder))
                };
                FieldLookupResult {
                    reference,
                    rebound_reference: Some(rewritten),
                }
            }
            None => FieldLookupResult {
                reference: self.next_field(previous.reference),
                rebound_reference: None,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub enum LayerKind {
    Identity,
    MemberRebinding(MemberRebindingLayer),
    FieldRebindingOnly(FieldRebindingLayer),
    Moves(MovesLayer),
}

impl LayerKind {
    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Identity => "identity",
            LayerKind::MemberRebinding(_) => "member-rebinding",
            LayerKind::FieldRebindingOnly(_) => "field-rebinding-only",
            LayerKind::Moves(_) => "moves",
        }
    }
}

/// One frozen layer. Only the identity root has no predecessor.
#[derive(Clone, Debug)]
pub struct LensLayer {
    pub(crate) previous: Option<LensId>,
    pub(crate) kind: LayerKind,
}

impl LensLayer {
    pub(crate) fn identity_root() -> Self {
        LensLayer {
            previous: None,
            kind: LayerKind::Identity,
        }
    }

    #[inline]
    pub fn previous(&self) -> Option<LensId> {
        self.previous
    }

    #[inline]
    pub fn kind(&self) -> &LayerKind {
        &self.kind
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        matches!(self.kind, LayerKind::Identity)
    }

    /// Whether method lookups through this layer ignore the calling
    /// context. True for every built-in variant.
    pub fn is_context_free_for_methods(&self) -> bool {
        match self.kind {
            LayerKind::Identity
            | LayerKind::MemberRebinding(_)
            | LayerKind::FieldRebindingOnly(_)
            | LayerKind::Moves(_) => true,
        }
    }

    pub(crate) fn describe_method(&self, previous: MethodLookupResult) -> MethodLookupResult {
        match &self.kind {
            LayerKind::Identity | LayerKind::FieldRebindingOnly(_) => previous,
            LayerKind::MemberRebinding(layer) => layer.describe_method(previous),
            LayerKind::Moves(layer) => layer.describe_method(previous),
        }
    }

    pub(crate) fn describe_field(&self, previous: FieldLookupResult) -> FieldLookupResult {
        let annotate = |rebound: Option<FieldRef>| FieldLookupResult {
            reference: previous.reference,
            rebound_reference: Some(
                rebound
                    .or(previous.rebound_reference)
                    .unwrap_or(previous.reference),
            ),
        };
        match &self.kind {
            LayerKind::Identity => previous,
            LayerKind::MemberRebinding(layer) => annotate(layer.rebound_field(&previous.reference)),
            LayerKind::FieldRebindingOnly(layer) => {
                annotate(layer.rebound_field(&previous.reference))
            }
            LayerKind::Moves(layer) => layer.describe_field(previous),
        }
    }

    pub(crate) fn describe_type(&self, ty: TypeId) -> TypeId {
        match &self.kind {
            LayerKind::Moves(layer) => layer.lookup_type(ty),
            LayerKind::Identity | LayerKind::MemberRebinding(_) | LayerKind::FieldRebindingOnly(_) => {
                ty
            }
        }
    }

    /// The signature this layer's input had for a definition now named
    /// `method`.
    pub(crate) fn previous_method_signature(&self, method: MethodRef) -> MethodRef {
        match &self.kind {
            LayerKind::Moves(layer) => layer
                .method_representatives
                .get(&method)
                .copied()
                .unwrap_or(method),
            LayerKind::Identity | LayerKind::MemberRebinding(_) | LayerKind::FieldRebindingOnly(_) => {
                method
            }
        }
    }

    pub(crate) fn next_method_signature(&self, method: MethodRef) -> MethodRef {
        match &self.kind {
            LayerKind::Moves(layer) => layer.next_method(method),
            LayerKind::Identity | LayerKind::MemberRebinding(_) | LayerKind::FieldRebindingOnly(_) => {
                method
            }
        }
    }

    pub(crate) fn previous_field_signature(&self, field: FieldRef) -> FieldRef {
        match &self.kind {
            LayerKind::Moves(layer) => layer
                .field_representatives
                .get(&field)
                .copied()
                .unwrap_or(field),
            LayerKind::Identity | LayerKind::MemberRebinding(_) | LayerKind::FieldRebindingOnly(_) => {
                field
            }
        }
    }

    /// Human-readable dump of this layer's own delta, sorted by text so the
    /// output is stable.
    pub fn display(&self, factory: &ItemFactory) -> String {
        let mut lines: Vec<String> = Vec::new();
        match &self.kind {
            LayerKind::Identity => {}
            LayerKind::MemberRebinding(layer) => {
                for kind in InvokeKind::ALL {
                    for (from, entry) in layer.method_entries(kind) {
                        let retyped = if entry.kind == kind {
                            String::new()
                        } else {
                            format!(" as {}", entry.kind)
                        };
                        lines.push(format!(
                            "{kind} {} -> {}{retyped}",
                            factory.display_method(from),
                            factory.display_method(&entry.target)
                        ));
                    }
                }
                push_field_lines(&mut lines, factory, layer.field_entries());
                for bridge in layer.bridges() {
                    lines.push(format!("bridge {}", factory.display_method(bridge)));
                }
            }
            LayerKind::FieldRebindingOnly(layer) => {
                push_field_lines(&mut lines, factory, layer.fields.iter());
            }
            LayerKind::Moves(layer) => {
                for (from, to) in &layer.types {
                    lines.push(format!(
                        "type {} -> {}",
                        factory.java_name(*from),
                        factory.java_name(*to)
                    ));
                }
                for (from, to) in &layer.methods {
                    lines.push(format!(
                        "method {} -> {}",
                        factory.display_method(from),
                        factory.display_method(to)
                    ));
                }
                push_field_lines(&mut lines, factory, layer.fields.iter());
            }
        }
        lines.sort();

        let mut out = String::new();
        let _ = writeln!(out, "[{}]", self.kind.name());
        for line in lines {
            let _ = writeln!(out, "  {line}");
        }
        out
    }
}

fn push_field_lines<'a>(
    lines: &mut Vec<String>,
    factory: &ItemFactory,
    entries: impl Iterator<Item = (&'a FieldRef, &'a FieldRef)>,
) {
    for (from, to) in entries {
        lines.push(format!(
            "field {} -> {}",
            factory.display_field(from),
            factory.display_field(to)
        ));
    }
}

#[cfg(test)]
mod tests;
