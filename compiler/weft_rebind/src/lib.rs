//! Member rebinding.
//!
//! Retargets every method and field reference in program code to the
//! declaration JVM resolution would select, so later passes see the most
//! precise symbolic reference. The result is recorded as a new layer on the
//! [`LensChain`] instead of rewriting code in place.
//!
//! # Phases
//!
//! 1. **Scan** ([`AccessCollection`]): parallel over method bodies.
//! 2. **Plan** ([`MemberRebindingAnalysis`]): parallel over references,
//!    read-only against the program. Bridges are requested, not added.
//! 3. **Commit** ([`BridgeRequests::commit`]): single-threaded, sorted.
//! 4. **Link**: the planned mappings and committed bridges become one
//!    lens layer.
//!
//! Output does not depend on the worker count or scheduling.
//!
//! # Tracing
//!
//! Set `RUST_LOG=weft_rebind=debug` and call [`init_tracing`] to see phase
//! summaries; `trace` shows every rebinding and bridge.

mod bridge;
mod error;
mod identity;
mod options;
mod planner;
mod scan;

use std::sync::Once;

use weft_diagnostic::Diagnostic;
use weft_hierarchy::{ProgramMutator, ResolutionOracle};
use weft_ir::MethodRef;
use weft_lens::{LensChain, LensId};

pub use bridge::{
    find_holder_for_interface_bridge, find_holder_for_visibility_bridge, BridgeReason,
    BridgeRequest, BridgeRequests,
};
pub use error::RebindingError;
pub use identity::{build_identity_lens, run_identity_rebinding};
pub use options::RebindingOptions;
pub use planner::{MemberRebindingAnalysis, MethodRebinding, RebindingPlan};
pub use scan::{AccessCollection, FieldAccesses, MethodAccesses};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing from `RUST_LOG`. Does nothing when it is unset, and
/// only the first call has any effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Counters for one rebinding pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RebindingStats {
    pub scanned_methods: usize,
    pub method_references: usize,
    pub field_references: usize,
    pub method_rebindings: usize,
    pub field_rebindings: usize,
    pub bridges: usize,
    pub ambiguous: usize,
}

/// Result of [`run_member_rebinding`].
#[derive(Clone, Debug)]
pub struct RebindingOutcome {
    /// The layer this pass linked. Always present: a pass with nothing to
    /// rebind still links a field-rebinding layer so field lookups stay
    /// total.
    pub lens: LensId,
    /// Bridges added to the program, in commit order.
    pub bridges: Vec<MethodRef>,
    /// Ambiguous references that were left unchanged.
    pub warnings: Vec<Diagnostic>,
    pub stats: RebindingStats,
}

/// Run the member-rebinding pass over `program` and link its lens on top of
/// `chain`.
///
/// `program` is only read while planning; bridges are added afterwards, one
/// holder at a time. On error nothing is linked, though bridges committed
/// before the failure remain in the program.
pub fn run_member_rebinding<H>(
    program: &mut H,
    chain: &mut LensChain,
    options: &RebindingOptions,
) -> Result<RebindingOutcome, RebindingError>
where
    H: ResolutionOracle + ProgramMutator,
{
    let oracle: &H = program;
    let planning_chain: &LensChain = chain;
    let (accesses, plan) = with_worker_pool(options, || {
        let accesses = AccessCollection::collect(oracle);
        let plan = MemberRebindingAnalysis::new(oracle, planning_chain, options).plan(&accesses);
        (accesses, plan)
    })?;
    let plan = plan?;

    let factory = program.factory().clone();
    let bridges = plan.bridges.commit(program, &factory)?;

    let mut builder = chain.begin_layer();
    for rebinding in &plan.methods {
        builder.map_method_retyped(rebinding.from, rebinding.kind, rebinding.to, rebinding.new_kind);
    }
    for (field, rebound) in &plan.fields {
        builder.map_field(*field, *rebound);
    }
    for bridge in &bridges {
        builder.add_bridge(bridge.holder, *bridge);
    }
    let layer = if builder.is_empty() {
        chain.begin_field_rebinding_layer().finish()?
    } else {
        builder.finish()?
    };
    let lens = chain.push(layer)?;

    let stats = RebindingStats {
        scanned_methods: accesses.scanned_methods(),
        method_references: accesses.methods().len(),
        field_references: accesses.fields().len(),
        method_rebindings: plan.methods.len(),
        field_rebindings: plan.fields.len(),
        bridges: bridges.len(),
        ambiguous: plan.warnings.len(),
    };
    tracing::debug!(?lens, ?stats, "member rebinding finished");

    Ok(RebindingOutcome {
        lens,
        bridges,
        warnings: plan.warnings,
        stats,
    })
}

/// Run `op` on a dedicated pool when a thread count is configured,
/// otherwise on the global rayon pool.
fn with_worker_pool<R, F>(options: &RebindingOptions, op: F) -> Result<R, RebindingError>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    if options.num_threads == 0 {
        return Ok(op());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.num_threads)
        .thread_name(|index| format!("weft-rebind-{index}"))
        .build()
        .map_err(|error| RebindingError::WorkerPool(error.to_string()))?;
    Ok(pool.install(op))
}
