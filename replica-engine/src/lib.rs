//! Deep copy engine for Replica object graphs.
//!
//! [`deep_copy`] produces a structural clone of a [`Value`] that shares no
//! mutable part with the original. Values are classified in this order:
//!
//! 1. Scalars (the absence marker included) are returned as is.
//! 2. Collections and mappings are rebuilt as the same concrete kind, with
//!    every element, key and value copied in turn.
//! 3. Arrays are reallocated with the same element type and length.
//! 4. Records are created through their type's no-argument constructor and
//!    every field, inherited ones included, is copied across. Final fields are
//!    governed by [`FinalFieldPolicy`].
//! 5. Opaque values are rejected.
//!
//! Objects reachable along several paths are copied once, and cycles in the
//! original become cycles in the copy. [`DeepCopier`] exposes the options and
//! keeps a [`FieldCache`] of record layouts between calls.

mod cache;
mod config;
mod copier;
mod error;

pub use cache::{CacheStats, FieldCache};
pub use config::{CopyOptions, FinalFieldPolicy};
pub use copier::DeepCopier;
pub use error::{CopyError, CopyResult};

use replica_types::Value;

/// Copies `original` with default [`CopyOptions`] and a fresh field cache.
pub fn deep_copy(original: &Value) -> CopyResult<Value> {
    DeepCopier::default().copy(original)
}
