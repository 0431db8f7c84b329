//! Per-type field layout cache.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use replica_types::{FieldSlot, RecordType};
use tracing::trace;

/// Hit and miss counters of a [`FieldCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Field layouts keyed by record type identity.
///
/// Holding the type keeps its address from being reused by another type while
/// the entry exists. Entries are derived data and can be dropped at any time.
#[derive(Debug, Default)]
pub struct FieldCache {
    layouts: HashMap<TypeKey, Rc<[FieldSlot]>>,
    stats: CacheStats,
}

impl FieldCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the full layout of `record_type`, computing it on first use.
    pub fn layout_of(&mut self, record_type: &Rc<RecordType>) -> Rc<[FieldSlot]> {
        let key = TypeKey(Rc::clone(record_type));
        if let Some(layout) = self.layouts.get(&key) {
            self.stats.hits += 1;
            return Rc::clone(layout);
        }

        self.stats.misses += 1;
        let layout: Rc<[FieldSlot]> = record_type.layout().into();
        trace!(
            record_type = %record_type.name(),
            fields = layout.len(),
            "Cached field layout"
        );
        self.layouts.insert(key, Rc::clone(&layout));
        layout
    }

    #[must_use]
    pub fn contains(&self, record_type: &Rc<RecordType>) -> bool {
        self.layouts.contains_key(&TypeKey(Rc::clone(record_type)))
    }

    /// Number of cached types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drops every layout. Counters are kept.
    pub fn clear(&mut self) {
        self.layouts.clear();
    }
}

#[derive(Debug)]
struct TypeKey(Rc<RecordType>);

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}
