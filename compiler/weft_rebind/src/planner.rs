//! Member rebinding analysis.
//!
//! For every scanned reference, decide which declaration it should name:
//!
//! 1. Resolve it with the rules of its invoke kind (class resolution for
//!    virtual, interface resolution for interface, unconstrained for super,
//!    static and direct).
//! 2. If a super call would skip to an indirect superinterface, or if some
//!    caller cannot see the declaring class, route through a bridge.
//! 3. Never rebind into non-program code below the first library class on
//!    the path from the original holder.
//! 4. Map the result through the current lens chain.
//!
//! Planning only reads the program. Bridges are requested, not added, so
//! references are planned in parallel.

use rayon::prelude::*;
use weft_diagnostic::{Diagnostic, ErrorCode};
use weft_hierarchy::{
    AccessConstraint, ClassDef, FieldResolution, MethodBody, MethodDef, MethodResolution, ResolutionOracle,
    ResolvedField, ResolvedMethod,
};
use weft_ir::{AccessFlags, FieldRef, InvokeKind, MethodRef, TypeId};
use weft_lens::LensChain;

use crate::bridge::{
    find_holder_for_interface_bridge, find_holder_for_visibility_bridge, BridgeReason,
    BridgeRequest, BridgeRequests,
};
use crate::scan::{AccessCollection, FieldAccesses, MethodAccesses};
use crate::{RebindingError, RebindingOptions};

/// One planned method rebinding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodRebinding {
    pub from: MethodRef,
    pub kind: InvokeKind,
    pub to: MethodRef,
    pub new_kind: InvokeKind,
}

/// Everything the analysis decided, ready to commit.
pub struct RebindingPlan {
    /// Sorted by invoke kind, then by reference text.
    pub methods: Vec<MethodRebinding>,
    /// Non-rebound field to rebound field, sorted by reference text.
    pub fields: Vec<(FieldRef, FieldRef)>,
    pub bridges: BridgeRequests,
    pub warnings: Vec<Diagnostic>,
}

enum MethodOutcome {
    Unchanged,
    Rebind(MethodRebinding),
    Ambiguous(Diagnostic),
}

/// A declaration a reference may be rebound to: either an existing method
/// or a bridge that has been requested but not yet added.
#[derive(Clone, Debug)]
struct Target {
    def: MethodDef,
    holder_flags: AccessFlags,
    program_owned: bool,
}

impl Target {
    fn reference(&self) -> MethodRef {
        self.def.reference
    }

    fn holder(&self) -> TypeId {
        self.def.reference.holder
    }
}

pub struct MemberRebindingAnalysis<'a, O: ?Sized> {
    oracle: &'a O,
    chain: &'a LensChain,
    options: &'a RebindingOptions,
    bridges: BridgeRequests,
}

impl<'a, O> MemberRebindingAnalysis<'a, O>
where
    O: ResolutionOracle + ?Sized,
{
    pub fn new(oracle: &'a O, chain: &'a LensChain, options: &'a RebindingOptions) -> Self {
        MemberRebindingAnalysis {
            oracle,
            chain,
            options,
            bridges: BridgeRequests::new(),
        }
    }

    /// Plan every access in `accesses`. The first internal error, in
    /// reference order, aborts the plan.
    pub fn plan(self, accesses: &AccessCollection) -> Result<RebindingPlan, RebindingError> {
        let method_outcomes: Vec<Result<MethodOutcome, RebindingError>> = accesses
            .methods()
            .par_iter()
            .map(|access| self.plan_method(access))
            .collect();
        let field_outcomes: Vec<Result<Option<(FieldRef, FieldRef)>, RebindingError>> = accesses
            .fields()
            .par_iter()
            .map(|access| self.plan_field(access))
            .collect();

        let mut methods = Vec::new();
        let mut warnings = Vec::new();
        for outcome in method_outcomes {
            match outcome? {
                MethodOutcome::Unchanged => {}
                MethodOutcome::Rebind(rebinding) => methods.push(rebinding),
                MethodOutcome::Ambiguous(warning) => warnings.push(warning),
            }
        }
        let mut fields = Vec::new();
        for outcome in field_outcomes {
            fields.extend(outcome?);
        }

        tracing::debug!(
            methods = methods.len(),
            fields = fields.len(),
            ambiguous = warnings.len(),
            "planned member rebinding"
        );
        Ok(RebindingPlan {
            methods,
            fields,
            bridges: self.bridges,
            warnings,
        })
    }

    fn plan_method(&self, access: &MethodAccesses) -> Result<MethodOutcome, RebindingError> {
        let factory = self.oracle.factory();
        let method = access.method;
        let kind = access.kind;

        if !factory.is_class_type(method.holder) {
            // Array members live on Object.
            if kind == InvokeKind::Static && factory.is_array(method.holder) {
                return Ok(self.rebinding(method, kind, method.with_holder(factory.object_type())));
            }
            return Ok(MethodOutcome::Unchanged);
        }
        let Some(original_class) = self.oracle.definition_for(method.holder) else {
            return Ok(MethodOutcome::Unchanged);
        };
        if !original_class.is_program() {
            return Ok(MethodOutcome::Unchanged);
        }

        let resolved = match self.resolve(method, kind) {
            MethodResolution::Single(resolved) => resolved,
            MethodResolution::Ambiguous(candidates) => {
                return Ok(MethodOutcome::Ambiguous(self.ambiguity_warning(
                    method,
                    kind,
                    &candidates,
                )));
            }
            MethodResolution::NotFound => {
                tracing::trace!(
                    method = %factory.display_method(&method),
                    %kind,
                    "unresolved reference left unchanged"
                );
                return Ok(MethodOutcome::Unchanged);
            }
        };
        if resolved.method == method {
            return Ok(MethodOutcome::Unchanged);
        }

        if kind == InvokeKind::Super && self.options.super_invoke_defect && !resolved.is_program_owned()
        {
            return Ok(match self.first_library_class(method.holder) {
                Some(boundary) => self.rebinding(method, kind, method.with_holder(boundary)),
                None => MethodOutcome::Unchanged,
            });
        }

        let mut target = self.target_for(&resolved)?;
        if self.needs_interface_bridge(original_class, &target, kind) {
            let holder = find_holder_for_interface_bridge(self.oracle, original_class, target.holder());
            target = self.bridge_to(holder, target, BridgeReason::InterfaceIndirection)?;
        }
        if access
            .contexts
            .iter()
            .any(|context| self.may_need_visibility_bridge(context.holder, &target))
        {
            target = self.visibility_bridge_if_needed(method, original_class, resolved.holder(), target)?;
        }

        let valid = self.valid_target_for(&target, method)?;
        Ok(self.rebinding(method, kind, valid))
    }

    fn resolve(&self, method: MethodRef, kind: InvokeKind) -> MethodResolution {
        match kind {
            InvokeKind::Virtual => self.oracle.resolve_on_class(method.holder, &method),
            InvokeKind::Interface => self.oracle.resolve_on_interface(method.holder, &method),
            InvokeKind::Super | InvokeKind::Static | InvokeKind::Direct => {
                self.oracle.resolve_unconstrained(&method)
            }
        }
    }

    /// Map `to` through the chain and fix up the invoke kind. Identity
    /// results are dropped.
    fn rebinding(&self, from: MethodRef, kind: InvokeKind, to: MethodRef) -> MethodOutcome {
        let to = self.chain.lookup_method(to, None, kind).reference;
        let new_kind = self.map_invoke_kind(to, from, kind);
        if to == from && new_kind == kind {
            return MethodOutcome::Unchanged;
        }
        if tracing::enabled!(tracing::Level::TRACE) {
            let factory = self.oracle.factory();
            tracing::trace!(
                from = %factory.display_method(&from),
                to = %factory.display_method(&to),
                %kind,
                %new_kind,
                "rebinding"
            );
        }
        MethodOutcome::Rebind(MethodRebinding {
            from,
            kind,
            to,
            new_kind,
        })
    }

    /// Virtual and interface invokes follow the holder kind of the new
    /// target. An invoke that was wrong for its original holder stays
    /// wrong, so the original `IncompatibleClassChangeError` is kept.
    fn map_invoke_kind(&self, new_method: MethodRef, original: MethodRef, kind: InvokeKind) -> InvokeKind {
        if !kind.is_dynamic() {
            return kind;
        }
        let Some(new_class) = self.oracle.definition_for(new_method.holder) else {
            return kind;
        };
        let as_expected = |is_interface: bool| {
            if is_interface {
                InvokeKind::Interface
            } else {
                InvokeKind::Virtual
            }
        };
        if let Some(original_class) = self.oracle.definition_for(original.holder) {
            if original_class.is_interface() != (kind == InvokeKind::Interface) {
                return as_expected(!new_class.is_interface());
            }
        }
        as_expected(new_class.is_interface())
    }

    fn target_for(&self, resolved: &ResolvedMethod) -> Result<Target, RebindingError> {
        let def = self
            .oracle
            .definition_for(resolved.holder())
            .and_then(|class| class.lookup_method(&resolved.method))
            .ok_or_else(|| self.missing(resolved.holder()))?;
        Ok(Target {
            def: def.clone(),
            holder_flags: resolved.holder_flags,
            program_owned: resolved.is_program_owned(),
        })
    }

    fn needs_interface_bridge(&self, original_class: &ClassDef, target: &Target, kind: InvokeKind) -> bool {
        self.options.generating_class_files
            && kind == InvokeKind::Super
            && target.holder() != original_class.ty
            && target.holder_flags.is_interface()
    }

    /// The declaring class is inaccessible from `context` while the member
    /// itself would be.
    fn may_need_visibility_bridge(&self, context: TypeId, target: &Target) -> bool {
        let holder = target.holder();
        let class_visibility = AccessConstraint::derive(self.oracle, context, holder, target.holder_flags);
        let member_visibility = AccessConstraint::derive(self.oracle, context, holder, target.def.flags);
        !class_visibility.is_possible() && member_visibility.is_possible()
    }

    fn visibility_bridge_if_needed(
        &self,
        method: MethodRef,
        original_class: &ClassDef,
        resolved_holder: TypeId,
        target: Target,
    ) -> Result<Target, RebindingError> {
        let factory = self.oracle.factory();
        // A public original may be referenced from anywhere; otherwise only
        // from its own package.
        let package = (!original_class.is_public()).then(|| factory.package_descriptor(method.holder));
        if package.is_some() && package == Some(factory.package_descriptor(resolved_holder)) {
            return Ok(target);
        }
        let holder = find_holder_for_visibility_bridge(self.oracle, original_class, resolved_holder, package)
            .ok_or_else(|| RebindingError::MissingBridgeHolder {
                original: factory.display_method(&method),
                target: factory.display_method(&target.reference()),
                reason: BridgeReason::Visibility,
            })?;
        self.bridge_to(holder, target, BridgeReason::Visibility)
    }

    /// Request a bridge on `holder` forwarding to `target`, unless `holder`
    /// already declares the signature. An existing member is the new
    /// target only if calling it reaches `target`; any other member with
    /// the signature is a second target for the bridge.
    fn bridge_to(&self, holder: TypeId, target: Target, reason: BridgeReason) -> Result<Target, RebindingError> {
        let holder_class = self
            .oracle
            .definition_for(holder)
            .ok_or_else(|| self.missing(holder))?;
        if let Some(existing) = holder_class.lookup_method(&target.reference()) {
            if !Self::reaches(existing, &target) {
                let factory = self.oracle.factory();
                return Err(RebindingError::ConflictingBridge {
                    bridge: factory.display_method(&existing.reference),
                    first: factory.display_method(&target.reference()),
                    second: factory.display_method(&existing.reference),
                });
            }
            return Ok(Target {
                def: existing.clone(),
                holder_flags: holder_class.flags,
                program_owned: holder_class.is_program(),
            });
        }

        let forward_kind = if target.def.flags.is_static() {
            InvokeKind::Static
        } else {
            InvokeKind::Super
        };
        let bridge = target.def.to_forwarding_method(holder, forward_kind);
        tracing::trace!(
            bridge = %self.oracle.factory().display_method(&bridge.reference),
            target = %self.oracle.factory().display_method(&target.reference()),
            %reason,
            "requesting bridge"
        );
        self.bridges.request(BridgeRequest {
            holder,
            bridge: bridge.clone(),
            reason,
        });
        Ok(Target {
            def: bridge,
            holder_flags: holder_class.flags,
            program_owned: holder_class.is_program(),
        })
    }

    /// A forwarder to `target`, or an overridable member dispatching the
    /// same way.
    fn reaches(existing: &MethodDef, target: &Target) -> bool {
        match &existing.body {
            MethodBody::Forward(forward) => forward.target == target.reference(),
            MethodBody::Code(_) | MethodBody::None => {
                !existing.flags.is_private() && existing.flags.is_static() == target.def.flags.is_static()
            }
        }
    }

    /// Never rebind below the first library class: program classes above it
    /// may be merged or moved by later passes.
    fn valid_target_for(&self, target: &Target, original: MethodRef) -> Result<MethodRef, RebindingError> {
        if target.program_owned {
            return Ok(target.reference());
        }
        let holder_class = self
            .oracle
            .definition_for(target.holder())
            .ok_or_else(|| self.missing(target.holder()))?;
        let boundary = if holder_class.is_interface() {
            self.first_library_class_for_interface_target(original.holder, &|class: &ClassDef| {
                class.lookup_method(&original).is_some()
            })
        } else {
            self.first_library_class(original.holder)
        };
        Ok(boundary.map_or(original, |holder| original.with_holder(holder)))
    }

    /// First non-program class on the superclass chain starting at `bottom`.
    fn first_library_class(&self, bottom: TypeId) -> Option<TypeId> {
        let mut class = self.oracle.definition_for(bottom)?;
        while class.is_program() {
            class = self.oracle.definition_for(class.super_type?)?;
        }
        Some(class.ty)
    }

    /// Search supertypes of `current` (superclass first, then interfaces)
    /// for a class that `declares` the member, returning the lowest
    /// non-program type on the path to it.
    fn first_library_class_for_interface_target(
        &self,
        current: TypeId,
        declares: &dyn Fn(&ClassDef) -> bool,
    ) -> Option<TypeId> {
        let class = self.oracle.definition_for(current)?;
        if declares(class) {
            return Some(current);
        }
        let found = class
            .supertypes()
            .find_map(|super_type| self.first_library_class_for_interface_target(super_type, declares))?;
        Some(if class.is_program() { found } else { current })
    }

    fn plan_field(&self, access: &FieldAccesses) -> Result<Option<(FieldRef, FieldRef)>, RebindingError> {
        let field = access.field;
        let resolved = match self.oracle.resolve_field(&field) {
            FieldResolution::Single(resolved) => resolved,
            FieldResolution::NotFound => return Ok(None),
        };
        if resolved.field == field {
            return Ok(None);
        }
        let accessible = access.contexts.iter().all(|context| {
            self.oracle
                .accessible_from(resolved.field.holder, resolved.flags, context.holder)
        });
        if !accessible {
            tracing::trace!(
                field = %self.oracle.factory().display_field(&field),
                "resolved field not accessible from every context"
            );
            return Ok(None);
        }
        let valid = self.valid_field_target(&resolved, field)?;
        let rebound = self.chain.lookup_field(valid).reference;
        Ok((rebound != field).then_some((field, rebound)))
    }

    fn valid_field_target(&self, resolved: &ResolvedField, original: FieldRef) -> Result<FieldRef, RebindingError> {
        let holder = resolved.field.holder;
        let holder_class = self
            .oracle
            .definition_for(holder)
            .ok_or_else(|| self.missing(holder))?;
        if holder_class.is_program() {
            return Ok(resolved.field);
        }
        let boundary = if holder_class.is_interface() {
            self.first_library_class_for_interface_target(original.holder, &|class: &ClassDef| {
                class.lookup_field(&original).is_some()
            })
        } else {
            self.first_library_class(original.holder)
        };
        Ok(boundary.map_or(original, |holder| original.with_holder(holder)))
    }

    fn ambiguity_warning(&self, method: MethodRef, kind: InvokeKind, candidates: &[MethodRef]) -> Diagnostic {
        let factory = self.oracle.factory();
        let shown = factory.display_method(&method);
        tracing::warn!(method = %shown, %kind, candidates = candidates.len(), "ambiguous resolution");
        candidates.iter().fold(
            Diagnostic::warning(ErrorCode::W1001)
                .with_message(format!("{kind} invoke of `{shown}` has several maximally-specific targets; left unchanged"))
                .with_subject(shown),
            |diagnostic, candidate| diagnostic.with_subject(factory.display_method(candidate)),
        )
    }

    fn missing(&self, ty: TypeId) -> RebindingError {
        RebindingError::MissingDefinition(self.oracle.factory().java_name(ty))
    }
}
