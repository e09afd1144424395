//! Weft lens chain.
//!
//! A lens records how one pass rewrote member references. Lenses stack: the
//! [`LensChain`] is an append-only arena whose layer 0 is the identity root
//! and whose every later layer points back at the layer that was the head
//! when it was built. Layers are frozen once linked, so downstream passes
//! query the chain concurrently without locking.
//!
//! # Queries
//!
//! - `lookup_method` / `lookup_field` map a reference as it appears in code
//!   to what it means now, applying layers oldest to newest.
//! - `original_method_signature` / `original_field_signature` map a
//!   definition back to the program as it was read, newest to oldest.
//! - `renamed_method_signature` maps an original definition forward.
//!
//! # Layer variants
//!
//! The set of variants is closed ([`LayerKind`]):
//! - `Identity`: the root, changes nothing.
//! - `MemberRebinding`: per-invoke-kind method retargeting plus field
//!   rebound-reference annotations.
//! - `FieldRebindingOnly`: field annotations only, legitimately empty.
//! - `Moves`: definitions moved or renamed by a later pass.

mod builder;
mod chain;
mod layer;
mod lookup;

pub use builder::{FieldRebindingBuilder, LayerBuilder, LensError, MovesBuilder};
pub use chain::{LensChain, LensId};
pub use layer::{
    FieldRebindingLayer, LayerKind, LensLayer, MemberRebindingLayer, MovesLayer, RebindingEntry,
};
pub use lookup::{FieldLookupResult, MethodLookupResult};
