//! Concurrent interner for member names and type descriptors.
//!
//! Workers of the access scan intern descriptors at the same time. Strings
//! are spread over [`Name::SHARDS`] independently locked tables; a hit only
//! needs a shared lock. A miss takes an upgradable lock, so two workers
//! interning the same new string cannot both insert it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use rustc_hash::FxHashMap;

use crate::Name;

/// JVM names that every run needs; interning them first keeps their
/// handles identical across runs.
const PRELUDE: &[&str] = &[
    "Ljava/lang/Object;",
    "Ljava/lang/String;",
    "Ljava/lang/Class;",
    "Ljava/lang/Cloneable;",
    "Ljava/io/Serializable;",
    "<init>",
    "<clinit>",
    "clone",
    "equals",
    "hashCode",
    "toString",
    "getClass",
    "()V",
    "()I",
    "()Ljava/lang/Object;",
    "()Ljava/lang/String;",
    "()Ljava/lang/Class;",
    "(Ljava/lang/Object;)Z",
    "V",
    "Z",
    "B",
    "C",
    "S",
    "I",
    "J",
    "F",
    "D",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    #[error("interner shard {shard} is full ({slots} slots)")]
    ShardFull { shard: usize, slots: usize },
}

#[derive(Default)]
struct Table {
    slots: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl Table {
    fn insert(&mut self, s: &str, shard: usize) -> Result<u32, InternError> {
        let slot = u32::try_from(self.strings.len())
            .ok()
            .filter(|slot| *slot <= Name::MAX_SLOT)
            .ok_or(InternError::ShardFull {
                shard,
                slots: self.strings.len(),
            })?;
        // Strings live as long as the process so lookups can return
        // `&'static str`.
        let stored: &'static str = Box::leak(Box::from(s));
        self.strings.push(stored);
        self.slots.insert(stored, slot);
        Ok(slot)
    }
}

pub struct StringInterner {
    tables: [RwLock<Table>; Name::SHARDS],
    count: AtomicUsize,
}

impl StringInterner {
    pub fn new() -> Self {
        let interner = StringInterner {
            tables: std::array::from_fn(|_| RwLock::new(Table::default())),
            count: AtomicUsize::new(0),
        };
        // Slot 0 of shard 0 is reserved for "".
        {
            let mut first = interner.tables[0].write();
            first.strings.push("");
            first.slots.insert("", 0);
        }
        interner.count.store(1, Ordering::Relaxed);
        for s in PRELUDE {
            interner.intern(s);
        }
        interner
    }

    /// Descriptors share long `Ljava/...` prefixes, so the shard choice
    /// looks at both ends of the string and at its length.
    fn shard_of(s: &str) -> usize {
        let bytes = s.as_bytes();
        let head = bytes.iter().take(4);
        let tail = bytes.iter().rev().take(4);
        let hash = head
            .chain(tail)
            .fold(bytes.len(), |hash, &byte| hash.wrapping_mul(31).wrapping_add(usize::from(byte)));
        hash % Name::SHARDS
    }

    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if s.is_empty() {
            return Ok(Name::EMPTY);
        }
        let shard = Self::shard_of(s);
        let table = &self.tables[shard];
        if let Some(&slot) = table.read().slots.get(s) {
            return Ok(Name::from_parts(shard, slot));
        }

        let guard = table.upgradable_read();
        if let Some(&slot) = guard.slots.get(s) {
            return Ok(Name::from_parts(shard, slot));
        }
        let slot = RwLockUpgradableReadGuard::upgrade(guard).insert(s, shard)?;
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(Name::from_parts(shard, slot))
    }

    /// # Panics
    /// When a shard runs out of slots.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|error| panic!("{error}"))
    }

    pub fn lookup(&self, name: Name) -> &'static str {
        self.tables[name.shard()].read().strings[name.slot()]
    }

    /// Interned strings, the empty string included.
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Reference-counted interner shared by every factory of one compilation.
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &StringInterner {
        &self.0
    }
}
