//! In-memory class hierarchy with JVM resolution semantics.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use weft_ir::{FieldRef, ItemFactory, MethodRef, TypeId};

use crate::{
    ClassDef, FieldDef, FieldResolution, MethodDef, MethodResolution, MutationError, ProgramMutator,
    ResolutionOracle, ResolvedField, ResolvedMethod,
};

/// All class definitions of one compilation, keyed by type.
#[derive(Clone)]
pub struct ClassHierarchy {
    factory: ItemFactory,
    classes: FxHashMap<TypeId, ClassDef>,
}

impl ClassHierarchy {
    pub fn new(factory: ItemFactory) -> Self {
        ClassHierarchy {
            factory,
            classes: FxHashMap::default(),
        }
    }

    /// Add or replace a class definition.
    pub fn insert(&mut self, class: ClassDef) {
        self.classes.insert(class.ty, class);
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn resolved(initial_holder: TypeId, class: &ClassDef, method: &MethodDef) -> ResolvedMethod {
        ResolvedMethod {
            initial_holder,
            method: method.reference,
            flags: method.flags,
            holder_flags: class.flags,
            origin: class.origin,
        }
    }

    /// Walk the superclass chain starting at `start` (inclusive) looking for
    /// a declaration of `method`'s signature.
    fn lookup_in_class_chain(
        &self,
        start: TypeId,
        method: &MethodRef,
    ) -> Option<(&ClassDef, &MethodDef)> {
        let mut current = Some(start);
        while let Some(ty) = current {
            let class = self.classes.get(&ty)?;
            if let Some(found) = class.lookup_method(method) {
                return Some((class, found));
            }
            current = class.super_type;
        }
        None
    }

    /// All interfaces reachable from `start`, breadth first, in declaration
    /// order. `start` itself is included when it is an interface.
    fn reachable_interfaces(&self, start: TypeId) -> Vec<TypeId> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        let mut queue = std::collections::VecDeque::from([start]);
        while let Some(ty) = queue.pop_front() {
            if !seen.insert(ty) {
                continue;
            }
            let Some(class) = self.classes.get(&ty) else {
                continue;
            };
            if class.is_interface() {
                order.push(ty);
            }
            queue.extend(class.supertypes());
        }
        order
    }

    /// Maximally-specific superinterface methods (JVMS 5.4.3.3 step 3).
    fn resolve_in_superinterfaces(
        &self,
        initial_holder: TypeId,
        method: &MethodRef,
    ) -> MethodResolution {
        let candidates: Vec<(&ClassDef, &MethodDef)> = self
            .reachable_interfaces(initial_holder)
            .into_iter()
            .filter_map(|iface| {
                let class = self.classes.get(&iface)?;
                let found = class.lookup_method(method)?;
                (!found.is_non_virtual()).then_some((class, found))
            })
            .collect();

        let maximally_specific: Vec<(&ClassDef, &MethodDef)> = candidates
            .iter()
            .filter(|(class, _)| {
                !candidates
                    .iter()
                    .any(|(other, _)| other.ty != class.ty && self.is_subtype(other.ty, class.ty))
            })
            .copied()
            .collect();

        let mut concrete = maximally_specific.iter().filter(|(_, m)| !m.is_abstract());
        match (concrete.next(), concrete.next()) {
            (Some(&(class, found)), None) => {
                MethodResolution::Single(Self::resolved(initial_holder, class, found))
            }
            (Some(_), Some(_)) => MethodResolution::Ambiguous(
                maximally_specific
                    .iter()
                    .filter(|(_, m)| !m.is_abstract())
                    .map(|(_, m)| m.reference)
                    .collect::<SmallVec<_>>(),
            ),
            // Only abstract candidates: any of them will do.
            (None, _) => match maximally_specific.first() {
                Some(&(class, found)) => {
                    MethodResolution::Single(Self::resolved(initial_holder, class, found))
                }
                None => MethodResolution::NotFound,
            },
        }
    }

    fn resolve_field_from(
        &self,
        ty: TypeId,
        field: &FieldRef,
        seen: &mut FxHashSet<TypeId>,
    ) -> Option<(&ClassDef, &FieldDef)> {
        if !seen.insert(ty) {
            return None;
        }
        let class = self.classes.get(&ty)?;
        if let Some(found) = class.lookup_field(field) {
            return Some((class, found));
        }
        for &iface in &class.interfaces {
            if let Some(found) = self.resolve_field_from(iface, field, seen) {
                return Some(found);
            }
        }
        let super_type = class.super_type?;
        self.resolve_field_from(super_type, field, seen)
    }
}

impl ResolutionOracle for ClassHierarchy {
    fn factory(&self) -> &ItemFactory {
        &self.factory
    }

    fn definition_for(&self, ty: TypeId) -> Option<&ClassDef> {
        self.classes.get(&ty)
    }

    fn program_classes(&self) -> Vec<&ClassDef> {
        let mut classes: Vec<&ClassDef> = self.classes.values().filter(|c| c.is_program()).collect();
        classes.sort_by_cached_key(|c| self.factory.descriptor(c.ty));
        classes
    }

    fn resolve_on_class(&self, holder: TypeId, method: &MethodRef) -> MethodResolution {
        let holder = if self.factory.is_array(holder) {
            self.factory.object_type()
        } else {
            holder
        };
        match self.classes.get(&holder) {
            Some(class) if !class.is_interface() => {}
            // Missing class, or class resolution on an interface
            // (IncompatibleClassChangeError at runtime).
            _ => return MethodResolution::NotFound,
        }
        if let Some((class, found)) = self.lookup_in_class_chain(holder, method) {
            return MethodResolution::Single(Self::resolved(holder, class, found));
        }
        self.resolve_in_superinterfaces(holder, method)
    }

    fn resolve_on_interface(&self, holder: TypeId, method: &MethodRef) -> MethodResolution {
        let Some(class) = self.classes.get(&holder) else {
            return MethodResolution::NotFound;
        };
        if !class.is_interface() {
            return MethodResolution::NotFound;
        }
        if let Some(found) = class.lookup_method(method) {
            return MethodResolution::Single(Self::resolved(holder, class, found));
        }
        let object = self.factory.object_type();
        if let Some(object_class) = self.classes.get(&object) {
            if let Some(found) = object_class.lookup_method(method) {
                if found.flags.is_public() && !found.flags.is_static() {
                    return MethodResolution::Single(Self::resolved(holder, object_class, found));
                }
            }
        }
        self.resolve_in_superinterfaces(holder, method)
    }

    fn resolve_field(&self, field: &FieldRef) -> FieldResolution {
        let mut seen = FxHashSet::default();
        match self.resolve_field_from(field.holder, field, &mut seen) {
            Some((class, found)) => FieldResolution::Single(ResolvedField {
                initial_holder: field.holder,
                field: found.reference,
                flags: found.flags,
                origin: class.origin,
            }),
            None => FieldResolution::NotFound,
        }
    }

    fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup {
            return true;
        }
        if sup == self.factory.object_type() {
            return self.classes.contains_key(&sub) || self.factory.is_array(sub);
        }
        let mut seen = FxHashSet::default();
        let mut stack = vec![sub];
        while let Some(ty) = stack.pop() {
            if ty == sup {
                return true;
            }
            if !seen.insert(ty) {
                continue;
            }
            if let Some(class) = self.classes.get(&ty) {
                stack.extend(class.supertypes());
            }
        }
        false
    }
}

impl ProgramMutator for ClassHierarchy {
    fn add_method(&mut self, holder: TypeId, method: MethodDef) -> Result<(), MutationError> {
        let shown = self.factory.display_method(&method.reference);
        let class = self
            .classes
            .get_mut(&holder)
            .ok_or_else(|| MutationError::MissingHolder(self.factory.java_name(holder)))?;
        if !class.is_program() {
            return Err(MutationError::NotProgramClass(self.factory.java_name(holder)));
        }
        if class.lookup_method(&method.reference).is_some() {
            return Err(MutationError::DuplicateMethod(shown));
        }
        tracing::trace!(method = %shown, "adding method to program class");
        class.methods.push(MethodDef {
            reference: method.reference.with_holder(holder),
            ..method
        });
        Ok(())
    }
}
