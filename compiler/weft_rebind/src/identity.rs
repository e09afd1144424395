//! Field-only rebinding lens for pipelines that skip member rebinding.
//!
//! Later passes still expect every field reference to carry its resolved
//! declaration, so every resolvable field is mapped without the
//! accessibility filter the full pass applies. Method references pass
//! through unchanged.

use rayon::prelude::*;
use weft_hierarchy::ResolutionOracle;
use weft_ir::FieldRef;
use weft_lens::{LensChain, LensId};

use crate::scan::AccessCollection;
use crate::{with_worker_pool, RebindingError, RebindingOptions};

/// Scan the program and push a field-rebinding layer onto `chain`.
pub fn run_identity_rebinding<O>(
    oracle: &O,
    chain: &mut LensChain,
    options: &RebindingOptions,
) -> Result<LensId, RebindingError>
where
    O: ResolutionOracle + ?Sized,
{
    let accesses = with_worker_pool(options, || AccessCollection::collect(oracle))?;
    build_identity_lens(oracle, chain, &accesses)
}

/// Push a field-rebinding layer built from already-collected accesses.
pub fn build_identity_lens<O>(
    oracle: &O,
    chain: &mut LensChain,
    accesses: &AccessCollection,
) -> Result<LensId, RebindingError>
where
    O: ResolutionOracle + ?Sized,
{
    let resolved: Vec<(FieldRef, FieldRef)> = accesses
        .fields()
        .par_iter()
        .filter_map(|access| {
            let resolved = oracle.resolve_field(&access.field);
            resolved.single().map(|resolved| (access.field, resolved.field))
        })
        .collect();

    let mut builder = chain.begin_field_rebinding_layer();
    for (field, rebound) in &resolved {
        builder.map_field(*field, *rebound);
    }
    let lens = chain.push(builder.finish()?)?;
    tracing::debug!(fields = resolved.len(), ?lens, "built identity rebinding lens");
    Ok(lens)
}

#[cfg(test)]
mod tests;
