//! The recursive copy.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use replica_types::{Array, Collection, FieldSlot, Mapping, Record, RecordType, Shared, Value};
use tracing::{debug, trace};

use crate::cache::FieldCache;
use crate::config::{CopyOptions, FinalFieldPolicy};
use crate::error::{CopyError, CopyResult};

/// Deep-copies object graphs under a fixed set of options.
///
/// The copier owns its [`FieldCache`], so layouts computed for one call are
/// reused by the next. It is not `Send`; give each thread its own copier.
#[derive(Debug, Default)]
pub struct DeepCopier {
    options: CopyOptions,
    cache: FieldCache,
}

impl DeepCopier {
    #[must_use]
    pub fn new(options: CopyOptions) -> Self {
        Self::with_cache(options, FieldCache::new())
    }

    /// Creates a copier that starts from an existing cache.
    #[must_use]
    pub fn with_cache(options: CopyOptions, cache: FieldCache) -> Self {
        Self { options, cache }
    }

    #[must_use]
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    #[must_use]
    pub fn cache(&self) -> &FieldCache {
        &self.cache
    }

    /// Gives up the copier, keeping its cache.
    #[must_use]
    pub fn into_cache(self) -> FieldCache {
        self.cache
    }

    /// Produces an independent copy of `original`.
    ///
    /// Scalars are returned as is. Everything else is rebuilt with the same
    /// concrete kind or record type. `original` is never modified.
    pub fn copy(&mut self, original: &Value) -> CopyResult<Value> {
        let mut pass = CopyPass {
            options: &self.options,
            cache: &mut self.cache,
            copies: HashMap::new(),
            active: HashSet::new(),
            depth: 0,
            created: 0,
            reused: 0,
        };
        debug!(root = %original.type_name(), "Starting deep copy");
        let copy = pass.copy_value(original)?;
        debug!(
            created = pass.created,
            reused = pass.reused,
            "Deep copy complete"
        );
        Ok(copy)
    }
}

/// State of a single top-level copy.
struct CopyPass<'a> {
    options: &'a CopyOptions,
    cache: &'a mut FieldCache,
    /// Original handle address to the copy made for it.
    copies: HashMap<usize, Value>,
    /// Handles whose copy is still in progress.
    active: HashSet<usize>,
    depth: usize,
    created: usize,
    reused: usize,
}

impl CopyPass<'_> {
    fn copy_value(&mut self, original: &Value) -> CopyResult<Value> {
        match original {
            Value::Collection(src) => {
                self.enter(original, |pass, addr| pass.copy_collection(addr, src))
            }
            Value::Mapping(src) => {
                self.enter(original, |pass, addr| pass.copy_mapping(addr, src))
            }
            Value::Array(src) => {
                self.enter(original, |pass, addr| pass.copy_array(addr, src))
            }
            Value::Record(src) => {
                self.enter(original, |pass, addr| pass.copy_record(addr, src))
            }
            Value::Opaque(o) => Err(CopyError::Unsupported(o.type_name().to_string())),
            scalar => Ok(scalar.clone()),
        }
    }

    /// Guards the copy of one handle: reuses an earlier copy, detects cycles
    /// and enforces the depth limit.
    fn enter(
        &mut self,
        original: &Value,
        copy: impl FnOnce(&mut Self, usize) -> CopyResult<Value>,
    ) -> CopyResult<Value> {
        let Some(addr) = original.handle_addr() else {
            return Ok(original.clone());
        };

        if let Some(existing) = self.copies.get(&addr) {
            trace!(addr, "Reusing copy of shared value");
            self.reused += 1;
            return Ok(existing.clone());
        }
        if self.active.contains(&addr) {
            return Err(CopyError::Cycle(original.type_name()));
        }
        if let Some(limit) = self.options.max_depth.filter(|&limit| self.depth >= limit) {
            return Err(CopyError::DepthExceeded(limit));
        }

        self.active.insert(addr);
        self.depth += 1;
        let result = copy(self, addr);
        self.depth -= 1;
        self.active.remove(&addr);
        result
    }

    /// Records the copy of `addr` before its children are visited, so that
    /// references back to `addr` link to it.
    fn register(&mut self, addr: usize, copy: &Value) {
        self.created += 1;
        if self.options.preserve_shared {
            self.copies.insert(addr, copy.clone());
        }
    }

    fn copy_collection(&mut self, addr: usize, src: &Shared<Collection>) -> CopyResult<Value> {
        let (kind, items): (_, Vec<Value>) = {
            let src = src.borrow();
            (src.kind(), src.iter().cloned().collect())
        };
        let dst = Rc::new(RefCell::new(Collection::new(kind)));
        self.register(addr, &Value::Collection(Rc::clone(&dst)));

        for item in &items {
            let item = self.copy_value(item)?;
            dst.borrow_mut().push(item);
        }
        Ok(Value::Collection(dst))
    }

    fn copy_mapping(&mut self, addr: usize, src: &Shared<Mapping>) -> CopyResult<Value> {
        let (kind, entries): (_, Vec<(Value, Value)>) = {
            let src = src.borrow();
            let entries = src.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            (src.kind(), entries)
        };
        let dst = Rc::new(RefCell::new(Mapping::new(kind)));
        self.register(addr, &Value::Mapping(Rc::clone(&dst)));

        for (key, value) in &entries {
            let key = self.copy_value(key)?;
            let value = self.copy_value(value)?;
            dst.borrow_mut().insert(key, value);
        }
        Ok(Value::Mapping(dst))
    }

    fn copy_array(&mut self, addr: usize, src: &Shared<Array>) -> CopyResult<Value> {
        let (element_type, items): (_, Vec<Value>) = {
            let src = src.borrow();
            (src.element_type().clone(), src.iter().cloned().collect())
        };
        let dst = Rc::new(RefCell::new(Array::new(element_type, items.len())));
        self.register(addr, &Value::Array(Rc::clone(&dst)));

        for (index, item) in items.iter().enumerate() {
            let item = self.copy_value(item)?;
            dst.borrow_mut()
                .set(index, item)
                .map_err(|err| match err {
                    replica_types::Error::ElementType { expected, found } => {
                        CopyError::ElementType {
                            expected,
                            found,
                            index,
                        }
                    }
                    other => CopyError::Model(other),
                })?;
        }
        Ok(Value::Array(dst))
    }

    fn copy_record(&mut self, addr: usize, src: &Rc<Record>) -> CopyResult<Value> {
        let record_type = Rc::clone(src.record_type());
        let values = src.slots();
        let layout = self.layout_of(&record_type);
        let instance = record_type
            .instantiate_with_layout(Rc::clone(&layout))
            .map_err(|err| CopyError::Construction {
                type_name: record_type.name().to_string(),
                reason: err.to_string(),
            })?;
        let dst = Rc::new(instance);
        self.register(addr, &Value::Record(Rc::clone(&dst)));

        for slot in layout.iter() {
            let def = slot.def();
            let source = values
                .get(slot.index())
                .ok_or_else(|| field_error(&record_type, slot, "missing from the original"))?;

            if def.is_final() && self.options.final_fields == FinalFieldPolicy::Skip {
                if dst.slot(slot.index()).as_ref() != Some(source) {
                    debug!(
                        record_type = %record_type.name(),
                        field = %def.name(),
                        "Final field left at its constructed value"
                    );
                }
                continue;
            }
            if def.is_private() && !self.options.force_access {
                return Err(field_error(
                    &record_type,
                    slot,
                    "field is private and forced access is disabled",
                ));
            }

            let value = self.copy_value(source)?;
            dst.set_slot(slot.index(), value)
                .map_err(|err| field_error(&record_type, slot, &err.to_string()))?;
        }
        Ok(Value::Record(dst))
    }

    fn layout_of(&mut self, record_type: &Rc<RecordType>) -> Rc<[FieldSlot]> {
        if self.options.cache_fields {
            self.cache.layout_of(record_type)
        } else {
            record_type.layout().into()
        }
    }
}

fn field_error(record_type: &RecordType, slot: &FieldSlot, reason: &str) -> CopyError {
    CopyError::FieldAccess {
        type_name: record_type.name().to_string(),
        field: format!("{}.{}", slot.owner(), slot.def().name()),
        reason: reason.to_string(),
    }
}
