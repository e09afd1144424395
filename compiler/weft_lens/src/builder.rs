//! Construction of new layers.
//!
//! A builder captures the chain head it was started from; the finished
//! layer can only be linked on top of that same head.

use rustc_hash::FxHashMap;
use weft_ir::{FieldRef, InvokeKind, MethodRef, TypeId};

use crate::layer::{FieldRebindingLayer, LayerKind, LensLayer, MemberRebindingLayer, MovesLayer};
use crate::LensId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LensError {
    #[error("a {0} layer must change at least one mapping")]
    EmptyLayer(&'static str),
    #[error("{kind} invoke of {from:?} mapped to two different targets")]
    ConflictingMethodMapping { from: MethodRef, kind: InvokeKind },
    #[error("field {from:?} mapped to two different rebound fields")]
    ConflictingFieldMapping { from: FieldRef },
    #[error("layer was built on {built_on:?} but the chain head is {head:?}")]
    StaleLayer { built_on: LensId, head: LensId },
}

/// Builds a [`MemberRebindingLayer`].
pub struct LayerBuilder {
    previous: LensId,
    layer: MemberRebindingLayer,
    conflict: Option<LensError>,
}

impl LayerBuilder {
    pub(crate) fn new(previous: LensId) -> Self {
        LayerBuilder {
            previous,
            layer: MemberRebindingLayer::default(),
            conflict: None,
        }
    }

    /// Rebind `kind` invokes of `from` to `to`, keeping the invoke kind.
    pub fn map_method(&mut self, from: MethodRef, to: MethodRef, kind: InvokeKind) -> &mut Self {
        self.map_method_retyped(from, kind, to, kind)
    }

    /// Rebind `kind` invokes of `from` to `to` emitted as `new_kind`.
    ///
    /// Identity mappings are dropped: absence already means identity.
    pub fn map_method_retyped(
        &mut self,
        from: MethodRef,
        kind: InvokeKind,
        to: MethodRef,
        new_kind: InvokeKind,
    ) -> &mut Self {
        if from == to && kind == new_kind {
            return self;
        }
        let entry = crate::RebindingEntry {
            target: to,
            kind: new_kind,
        };
        let table = &mut self.layer.methods[kind.index()];
        match table.get(&from) {
            Some(existing) if *existing != entry => {
                self.conflict
                    .get_or_insert(LensError::ConflictingMethodMapping { from, kind });
            }
            Some(_) => {}
            None => {
                table.insert(from, entry);
            }
        }
        self
    }

    /// Record that `non_rebound` resolves to the declaration `rebound`.
    pub fn map_field(&mut self, non_rebound: FieldRef, rebound: FieldRef) -> &mut Self {
        if non_rebound == rebound {
            return self;
        }
        if let Err(conflict) = insert_field(&mut self.layer.fields, non_rebound, rebound) {
            self.conflict.get_or_insert(conflict);
        }
        self
    }

    /// Record a bridge synthesized on `holder` for this layer.
    pub fn add_bridge(&mut self, holder: TypeId, bridge: MethodRef) -> &mut Self {
        self.layer.bridges.push(bridge.with_holder(holder));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.layer.is_empty()
    }

    pub fn finish(self) -> Result<LensLayer, LensError> {
        if let Some(conflict) = self.conflict {
            return Err(conflict);
        }
        if self.layer.is_empty() {
            return Err(LensError::EmptyLayer("member-rebinding"));
        }
        tracing::debug!(
            methods = self.layer.method_entry_count(),
            fields = self.layer.fields.len(),
            bridges = self.layer.bridges.len(),
            "finished member-rebinding layer"
        );
        Ok(LensLayer {
            previous: Some(self.previous),
            kind: LayerKind::MemberRebinding(self.layer),
        })
    }
}

/// Builds a [`FieldRebindingLayer`]. An empty result is valid.
pub struct FieldRebindingBuilder {
    previous: LensId,
    layer: FieldRebindingLayer,
    conflict: Option<LensError>,
}

impl FieldRebindingBuilder {
    pub(crate) fn new(previous: LensId) -> Self {
        FieldRebindingBuilder {
            previous,
            layer: FieldRebindingLayer::default(),
            conflict: None,
        }
    }

    pub fn map_field(&mut self, non_rebound: FieldRef, rebound: FieldRef) -> &mut Self {
        if non_rebound == rebound {
            return self;
        }
        if let Err(conflict) = insert_field(&mut self.layer.fields, non_rebound, rebound) {
            self.conflict.get_or_insert(conflict);
        }
        self
    }

    pub fn finish(self) -> Result<LensLayer, LensError> {
        if let Some(conflict) = self.conflict {
            return Err(conflict);
        }
        Ok(LensLayer {
            previous: Some(self.previous),
            kind: LayerKind::FieldRebindingOnly(self.layer),
        })
    }
}

/// Builds a [`MovesLayer`].
pub struct MovesBuilder {
    previous: LensId,
    layer: MovesLayer,
}

impl MovesBuilder {
    pub(crate) fn new(previous: LensId) -> Self {
        MovesBuilder {
            previous,
            layer: MovesLayer::default(),
        }
    }

    pub fn move_type(&mut self, from: TypeId, to: TypeId) -> &mut Self {
        if from != to {
            self.layer.types.insert(from, to);
        }
        self
    }

    /// Move the definition `from` to `to`. The first original moved to a
    /// given target becomes its representative.
    pub fn move_method(&mut self, from: MethodRef, to: MethodRef) -> &mut Self {
        if from != to {
            self.layer.methods.insert(from, to);
            self.layer.method_representatives.entry(to).or_insert(from);
        }
        self
    }

    pub fn move_field(&mut self, from: FieldRef, to: FieldRef) -> &mut Self {
        if from != to {
            self.layer.fields.insert(from, to);
            self.layer.field_representatives.entry(to).or_insert(from);
        }
        self
    }

    pub fn finish(self) -> Result<LensLayer, LensError> {
        if self.layer.is_empty() {
            return Err(LensError::EmptyLayer("moves"));
        }
        Ok(LensLayer {
            previous: Some(self.previous),
            kind: LayerKind::Moves(self.layer),
        })
    }
}

fn insert_field(
    fields: &mut FxHashMap<FieldRef, FieldRef>,
    non_rebound: FieldRef,
    rebound: FieldRef,
) -> Result<(), LensError> {
    match fields.get(&non_rebound) {
        Some(existing) if *existing != rebound => Err(LensError::ConflictingFieldMapping {
            from: non_rebound,
        }),
        Some(_) => Ok(()),
        None => {
            fields.insert(non_rebound, rebound);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
