//! Access scan: which references are used, how, and from where.
//!
//! Method bodies are visited in parallel. Workers only insert into
//! concurrent maps keyed by reference; the maps are frozen into sorted
//! tables once every worker has finished.

use dashmap::DashMap;
use rayon::prelude::*;
use weft_hierarchy::{Access, ResolutionOracle};
use weft_ir::{FieldRef, InvokeKind, ItemFactory, MethodRef};

/// A method reference used with one invoke kind, and the methods that use
/// it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodAccesses {
    pub kind: InvokeKind,
    pub method: MethodRef,
    /// Calling methods, sorted and deduplicated.
    pub contexts: Vec<MethodRef>,
}

/// A field reference and the methods that read or write it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldAccesses {
    pub field: FieldRef,
    pub contexts: Vec<MethodRef>,
}

/// Every member access in the program, sorted by reference text.
#[derive(Clone, Debug, Default)]
pub struct AccessCollection {
    methods: Vec<MethodAccesses>,
    fields: Vec<FieldAccesses>,
    scanned_methods: usize,
}

impl AccessCollection {
    /// Scan every program method with code.
    pub fn collect<O>(oracle: &O) -> Self
    where
        O: ResolutionOracle + ?Sized,
    {
        let bodies: Vec<(MethodRef, &[Access])> = oracle
            .program_classes()
            .into_iter()
            .flat_map(|class| class.methods.iter())
            .filter_map(|method| {
                method
                    .code()
                    .map(|code| (method.reference, code.accesses.as_slice()))
            })
            .collect();

        let accumulator = Accumulator::default();
        bodies.par_iter().for_each(|(context, accesses)| {
            for access in *accesses {
                accumulator.record(*context, access);
            }
        });

        let collection = accumulator.freeze(oracle.factory(), bodies.len());
        tracing::debug!(
            scanned_methods = collection.scanned_methods,
            method_references = collection.methods.len(),
            field_references = collection.fields.len(),
            "collected member accesses"
        );
        collection
    }

    /// Build from already-known access sites, in any order.
    pub fn from_sites(
        factory: &ItemFactory,
        sites: impl IntoIterator<Item = (MethodRef, Access)>,
    ) -> Self {
        let accumulator = Accumulator::default();
        let mut contexts = rustc_hash::FxHashSet::default();
        for (context, access) in sites {
            contexts.insert(context);
            accumulator.record(context, &access);
        }
        accumulator.freeze(factory, contexts.len())
    }

    pub fn methods(&self) -> &[MethodAccesses] {
        &self.methods
    }

    pub fn fields(&self) -> &[FieldAccesses] {
        &self.fields
    }

    pub fn scanned_methods(&self) -> usize {
        self.scanned_methods
    }
}

#[derive(Default)]
struct Accumulator {
    invokes: [DashMap<MethodRef, Vec<MethodRef>>; InvokeKind::ALL.len()],
    fields: DashMap<FieldRef, Vec<MethodRef>>,
}

impl Accumulator {
    fn record(&self, context: MethodRef, access: &Access) {
        match *access {
            Access::Invoke { kind, method } => {
                self.invokes[kind.index()]
                    .entry(method)
                    .or_default()
                    .push(context);
            }
            Access::FieldRead { field, .. } | Access::FieldWrite { field, .. } => {
                self.fields.entry(field).or_default().push(context);
            }
        }
    }

    /// Sort everything by text; worker interleaving must not show.
    fn freeze(self, factory: &ItemFactory, scanned_methods: usize) -> AccessCollection {
        let sort_contexts = |mut contexts: Vec<MethodRef>| {
            contexts.sort_by_cached_key(|m| factory.method_sort_key(m));
            contexts.dedup();
            contexts
        };

        let mut methods: Vec<MethodAccesses> = Vec::new();
        for (kind, table) in InvokeKind::ALL.into_iter().zip(self.invokes) {
            methods.extend(table.into_iter().map(|(method, contexts)| MethodAccesses {
                kind,
                method,
                contexts: sort_contexts(contexts),
            }));
        }
        methods.sort_by_cached_key(|access| (access.kind, factory.method_sort_key(&access.method)));

        let mut fields: Vec<FieldAccesses> = self
            .fields
            .into_iter()
            .map(|(field, contexts)| FieldAccesses {
                field,
                contexts: sort_contexts(contexts),
            })
            .collect();
        fields.sort_by_cached_key(|access| factory.field_sort_key(&access.field));

        AccessCollection {
            methods,
            fields,
            scanned_methods,
        }
    }
}
