//! Sequence, set and map containers.
//!
//! Each container remembers its concrete kind so a copy can be rebuilt as the
//! same kind rather than some other container in the same category.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::{IndexMap, IndexSet};

use crate::Value;

/// Concrete kind of a [`Collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Growable array.
    List,
    /// Ring buffer with cheap pushes at both ends.
    Deque,
    /// Unordered set.
    HashSet,
    /// Set that iterates in insertion order.
    IndexSet,
}

/// An ordered or unordered container of values.
#[derive(Debug, Clone)]
pub enum Collection {
    List(Vec<Value>),
    Deque(VecDeque<Value>),
    HashSet(HashSet<Value>),
    IndexSet(IndexSet<Value>),
}

impl Collection {
    /// Creates an empty container of the given kind.
    #[must_use]
    pub fn new(kind: CollectionKind) -> Self {
        match kind {
            CollectionKind::List => Self::List(Vec::new()),
            CollectionKind::Deque => Self::Deque(VecDeque::new()),
            CollectionKind::HashSet => Self::HashSet(HashSet::new()),
            CollectionKind::IndexSet => Self::IndexSet(IndexSet::new()),
        }
    }

    /// Creates a container of the given kind holding `values`.
    pub fn from_values(kind: CollectionKind, values: impl IntoIterator<Item = Value>) -> Self {
        let mut collection = Self::new(kind);
        for value in values {
            collection.push(value);
        }
        collection
    }

    #[must_use]
    pub fn kind(&self) -> CollectionKind {
        match self {
            Self::List(_) => CollectionKind::List,
            Self::Deque(_) => CollectionKind::Deque,
            Self::HashSet(_) => CollectionKind::HashSet,
            Self::IndexSet(_) => CollectionKind::IndexSet,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::List(v) => v.len(),
            Self::Deque(v) => v.len(),
            Self::HashSet(s) => s.len(),
            Self::IndexSet(s) => s.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends to sequences or inserts into sets.
    ///
    /// Returns false if a set already held an equal value.
    pub fn push(&mut self, value: Value) -> bool {
        match self {
            Self::List(v) => {
                v.push(value);
                true
            }
            Self::Deque(v) => {
                v.push_back(value);
                true
            }
            Self::HashSet(s) => s.insert(value),
            Self::IndexSet(s) => s.insert(value),
        }
    }

    /// Positional access; `None` for unordered sets.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        match self {
            Self::List(v) => v.get(index),
            Self::Deque(v) => v.get(index),
            Self::HashSet(_) => None,
            Self::IndexSet(s) => s.get_index(index),
        }
    }

    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        match self {
            Self::List(v) => v.contains(value),
            Self::Deque(v) => v.contains(value),
            Self::HashSet(s) => s.contains(value),
            Self::IndexSet(s) => s.contains(value),
        }
    }

    /// Iterates in the container's own order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match self {
            Self::List(v) => Box::new(v.iter()),
            Self::Deque(v) => Box::new(v.iter()),
            Self::HashSet(s) => Box::new(s.iter()),
            Self::IndexSet(s) => Box::new(s.iter()),
        }
    }
}

/// Concrete kind of a [`Mapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingKind {
    /// Unordered map.
    HashMap,
    /// Map that iterates in insertion order.
    IndexMap,
}

/// A key-value container.
#[derive(Debug, Clone)]
pub enum Mapping {
    HashMap(HashMap<Value, Value>),
    IndexMap(IndexMap<Value, Value>),
}

impl Mapping {
    /// Creates an empty map of the given kind.
    #[must_use]
    pub fn new(kind: MappingKind) -> Self {
        match kind {
            MappingKind::HashMap => Self::HashMap(HashMap::new()),
            MappingKind::IndexMap => Self::IndexMap(IndexMap::new()),
        }
    }

    /// Creates a map of the given kind holding `entries`. Later duplicates win.
    pub fn from_entries(
        kind: MappingKind,
        entries: impl IntoIterator<Item = (Value, Value)>,
    ) -> Self {
        let mut mapping = Self::new(kind);
        for (key, value) in entries {
            mapping.insert(key, value);
        }
        mapping
    }

    #[must_use]
    pub fn kind(&self) -> MappingKind {
        match self {
            Self::HashMap(_) => MappingKind::HashMap,
            Self::IndexMap(_) => MappingKind::IndexMap,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::HashMap(m) => m.len(),
            Self::IndexMap(m) => m.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts an entry, returning the value it replaced.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        match self {
            Self::HashMap(m) => m.insert(key, value),
            Self::IndexMap(m) => m.insert(key, value),
        }
    }

    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        match self {
            Self::HashMap(m) => m.get(key),
            Self::IndexMap(m) => m.get(key),
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    /// Iterates entries in the map's own order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (&Value, &Value)> + '_> {
        match self {
            Self::HashMap(m) => Box::new(m.iter()),
            Self::IndexMap(m) => Box::new(m.iter()),
        }
    }
}
