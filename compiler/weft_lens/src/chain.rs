//! The append-only lens arena.

use std::fmt;

use smallvec::SmallVec;
use weft_ir::{FieldRef, InvokeKind, ItemFactory, MethodRef, TypeId};

use crate::{
    FieldLookupResult, FieldRebindingBuilder, LayerBuilder, LensError, LensLayer,
    MethodLookupResult, MovesBuilder,
};

/// Index of a layer in a [`LensChain`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct LensId(u32);

impl LensId {
    /// The identity root every chain starts with.
    pub const IDENTITY: LensId = LensId(0);

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for LensId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LensId({})", self.0)
    }
}

/// Layers applied by one query, oldest first.
type LayerPath = SmallVec<[LensId; 8]>;

/// Every lens of one compilation, oldest first.
///
/// Layer `n` is only ever linked on top of the head that existed when its
/// builder was started, so the chain is always a simple path from the head
/// back to the identity root.
#[derive(Clone, Debug)]
pub struct LensChain {
    layers: Vec<LensLayer>,
}

impl LensChain {
    pub fn new() -> Self {
        LensChain {
            layers: vec![LensLayer::identity_root()],
        }
    }

    #[inline]
    pub fn head(&self) -> LensId {
        // The root is never removed, so `len() >= 1`.
        LensId((self.layers.len() - 1) as u32)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false: the identity root is part of every chain.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer(&self, id: LensId) -> Option<&LensLayer> {
        self.layers.get(id.index())
    }

    pub fn head_layer(&self) -> &LensLayer {
        &self.layers[self.head().index()]
    }

    pub fn begin_layer(&self) -> LayerBuilder {
        LayerBuilder::new(self.head())
    }

    pub fn begin_field_rebinding_layer(&self) -> FieldRebindingBuilder {
        FieldRebindingBuilder::new(self.head())
    }

    pub fn begin_moves_layer(&self) -> MovesBuilder {
        MovesBuilder::new(self.head())
    }

    /// Link a finished layer as the new head.
    pub fn push(&mut self, layer: LensLayer) -> Result<LensId, LensError> {
        let head = self.head();
        match layer.previous {
            Some(built_on) if built_on == head => {}
            built_on => {
                return Err(LensError::StaleLayer {
                    built_on: built_on.unwrap_or(LensId::IDENTITY),
                    head,
                })
            }
        }
        let kind = layer.kind.name();
        self.layers.push(layer);
        let id = self.head();
        tracing::debug!(lens = ?id, kind, "linked lens layer");
        Ok(id)
    }

    /// True while nothing but the identity root has been linked.
    pub fn is_identity(&self) -> bool {
        self.head_layer().is_identity()
    }

    pub fn is_context_free_for_methods(&self) -> bool {
        self.layers.iter().all(LensLayer::is_context_free_for_methods)
    }

    /// Layers newer than `applied`, oldest first. With `None` every layer
    /// applies.
    fn path_after(&self, applied: Option<LensId>) -> LayerPath {
        let mut path = LayerPath::new();
        let mut current = Some(self.head());
        while let Some(id) = current {
            if Some(id) == applied {
                break;
            }
            path.push(id);
            current = self.layers[id.index()].previous;
        }
        path.reverse();
        path
    }

    fn newest_first(&self) -> impl Iterator<Item = &LensLayer> + '_ {
        let mut current = Some(self.head());
        std::iter::from_fn(move || {
            let id = current?;
            let layer = &self.layers[id.index()];
            current = layer.previous;
            Some(layer)
        })
    }

    pub fn lookup_method(
        &self,
        method: MethodRef,
        context: Option<MethodRef>,
        kind: InvokeKind,
    ) -> MethodLookupResult {
        self.lookup_method_from(method, context, kind, None)
    }

    /// Method lookup for code that has already been rewritten up to and
    /// including `applied`, so no mapping is applied twice.
    pub fn lookup_method_from(
        &self,
        method: MethodRef,
        context: Option<MethodRef>,
        kind: InvokeKind,
        applied: Option<LensId>,
    ) -> MethodLookupResult {
        let mut result = MethodLookupResult::unchanged(method, kind);
        for id in self.path_after(applied) {
            result = self.layers[id.index()].describe_method(result);
        }
        tracing::trace!(
            ?method,
            ?context,
            %kind,
            reference = ?result.reference,
            new_kind = %result.kind,
            "method lookup"
        );
        result
    }

    pub fn lookup_field(&self, field: FieldRef) -> FieldLookupResult {
        self.lookup_field_from(field, None)
    }

    pub fn lookup_field_from(&self, field: FieldRef, applied: Option<LensId>) -> FieldLookupResult {
        self.path_after(applied)
            .into_iter()
            .fold(FieldLookupResult::unchanged(field), |result, id| {
                self.layers[id.index()].describe_field(result)
            })
    }

    pub fn lookup_type(&self, ty: TypeId) -> TypeId {
        self.path_after(None)
            .into_iter()
            .fold(ty, |ty, id| self.layers[id.index()].describe_type(ty))
    }

    /// The signature `method` had in the program as it was read.
    pub fn original_method_signature(&self, method: MethodRef) -> MethodRef {
        self.newest_first()
            .fold(method, |method, layer| layer.previous_method_signature(method))
    }

    pub fn original_field_signature(&self, field: FieldRef) -> FieldRef {
        self.newest_first()
            .fold(field, |field, layer| layer.previous_field_signature(field))
    }

    /// Forward definition mapping: where the definition `original` lives
    /// now, skipping layers up to and including `applied`.
    pub fn renamed_method_signature(&self, original: MethodRef, applied: Option<LensId>) -> MethodRef {
        self.path_after(applied)
            .into_iter()
            .fold(original, |method, id| {
                self.layers[id.index()].next_method_signature(method)
            })
    }

    /// Every layer's delta, newest first.
    pub fn display(&self, factory: &ItemFactory) -> String {
        self.newest_first()
            .map(|layer| layer.display(factory))
            .collect()
    }
}

impl Default for LensChain {
    fn default() -> Self {
        Self::new()
    }
}
