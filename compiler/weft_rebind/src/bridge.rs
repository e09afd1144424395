//! Bridge holders and the deterministic bridge commit.
//!
//! Planning runs in parallel and only *requests* bridges. Requests are
//! grouped per holder in a concurrent map; after the join barrier they are
//! sorted by signature text and added to the program one holder at a time,
//! so member order in the output does not depend on scheduling.

use std::fmt;

use dashmap::DashMap;
use weft_hierarchy::{ClassDef, MethodBody, MethodDef, ProgramMutator, ResolutionOracle};
use weft_ir::{ItemFactory, MethodRef, TypeId};

use crate::RebindingError;

/// Why a bridge is needed instead of a direct rebind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BridgeReason {
    /// A super call would skip to a non-immediate superinterface.
    InterfaceIndirection,
    /// The declaring class is not accessible from some caller.
    Visibility,
}

impl fmt::Display for BridgeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeReason::InterfaceIndirection => write!(f, "interface-indirection"),
            BridgeReason::Visibility => write!(f, "visibility"),
        }
    }
}

/// A forwarding method to add to a program class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeRequest {
    pub holder: TypeId,
    pub bridge: MethodDef,
    pub reason: BridgeReason,
}

impl BridgeRequest {
    pub fn forwarding_target(&self) -> Option<MethodRef> {
        match &self.bridge.body {
            MethodBody::Forward(forward) => Some(forward.target),
            MethodBody::None | MethodBody::Code(_) => None,
        }
    }
}

/// Bridge requests collected concurrently during planning.
#[derive(Default)]
pub struct BridgeRequests {
    by_holder: DashMap<TypeId, Vec<BridgeRequest>>,
}

impl BridgeRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self, request: BridgeRequest) {
        self.by_holder
            .entry(request.holder)
            .or_default()
            .push(request);
    }

    pub fn is_empty(&self) -> bool {
        self.by_holder.is_empty()
    }

    /// Sort, deduplicate and add every requested bridge.
    ///
    /// Holders are visited in descriptor order and bridges within a holder
    /// in signature order. Identical requests collapse into one bridge; two
    /// requests for one signature with different targets are a conflict.
    pub fn commit<M>(
        self,
        mutator: &mut M,
        factory: &ItemFactory,
    ) -> Result<Vec<MethodRef>, RebindingError>
    where
        M: ProgramMutator + ?Sized,
    {
        let mut holders: Vec<(TypeId, Vec<BridgeRequest>)> = self.by_holder.into_iter().collect();
        holders.sort_by_cached_key(|(holder, _)| factory.descriptor(*holder));

        let mut committed = Vec::new();
        for (holder, requests) in holders {
            for request in sorted_unique(factory, requests)? {
                let reference = request.bridge.reference;
                tracing::trace!(
                    bridge = %factory.display_method(&reference),
                    reason = %request.reason,
                    "committing bridge"
                );
                mutator.add_method(holder, request.bridge).map_err(|source| {
                    RebindingError::BridgeCommitFailed {
                        bridge: factory.display_method(&reference),
                        source,
                    }
                })?;
                committed.push(reference);
            }
        }
        tracing::debug!(bridges = committed.len(), "committed bridges");
        Ok(committed)
    }
}

fn sorted_unique(
    factory: &ItemFactory,
    mut requests: Vec<BridgeRequest>,
) -> Result<Vec<BridgeRequest>, RebindingError> {
    let target_key = |request: &BridgeRequest| {
        request
            .forwarding_target()
            .map(|target| factory.method_sort_key(&target))
            .unwrap_or_default()
    };
    requests.sort_by_cached_key(|request| {
        (factory.method_sort_key(&request.bridge.reference), target_key(request))
    });

    let mut unique: Vec<BridgeRequest> = Vec::with_capacity(requests.len());
    for request in requests {
        match unique.last() {
            Some(previous) if previous.bridge.reference == request.bridge.reference => {
                if previous.forwarding_target() != request.forwarding_target() {
                    return Err(RebindingError::ConflictingBridge {
                        bridge: factory.display_method(&request.bridge.reference),
                        first: display_target(factory, previous),
                        second: display_target(factory, &request),
                    });
                }
            }
            _ => unique.push(request),
        }
    }
    Ok(unique)
}

fn display_target(factory: &ItemFactory, request: &BridgeRequest) -> String {
    request
        .forwarding_target()
        .map(|target| factory.display_method(&target))
        .unwrap_or_default()
}

/// Holder for a bridge that lets a super call reach `iface`'s method.
///
/// An interface caller holds the bridge itself. A class caller holds it on
/// the uppermost program superclass that still implements `iface`.
pub fn find_holder_for_interface_bridge<O>(oracle: &O, class: &ClassDef, iface: TypeId) -> TypeId
where
    O: ResolutionOracle + ?Sized,
{
    let mut current = class;
    if current.is_interface() {
        return current.ty;
    }
    while let Some(super_type) = current.super_type {
        match oracle.definition_for(super_type) {
            Some(super_class) if super_class.is_program() && oracle.is_subtype(super_type, iface) => {
                current = super_class;
            }
            _ => break,
        }
    }
    current.ty
}

/// Holder for a bridge that makes `target`'s member reachable from every
/// caller of a reference on `original`.
///
/// Walks from `original` toward `target` along supertypes that are still
/// subtypes of `target`, preferring the superclass, and returns the
/// uppermost class on that path that is public or in `package`. `None`
/// means no program class qualifies.
pub fn find_holder_for_visibility_bridge<O>(
    oracle: &O,
    original: &ClassDef,
    target: TypeId,
    package: Option<&str>,
) -> Option<TypeId>
where
    O: ResolutionOracle + ?Sized,
{
    if original.ty == target || !original.is_program() {
        return None;
    }
    let upward = match original.super_type {
        Some(super_type) if oracle.is_subtype(super_type, target) => oracle
            .definition_for(super_type)
            .and_then(|super_class| find_holder_for_visibility_bridge(oracle, super_class, target, package)),
        _ => original
            .interfaces
            .iter()
            .filter(|iface| oracle.is_subtype(**iface, target))
            .filter_map(|iface| oracle.definition_for(*iface))
            .find_map(|iface| find_holder_for_visibility_bridge(oracle, iface, target, package)),
    };
    if upward.is_some() {
        return upward;
    }
    let factory = oracle.factory();
    if original.is_public() || package == Some(factory.package_descriptor(original.ty)) {
        return Some(original.ty);
    }
    None
}

#[cfg(test)]
mod tests;
