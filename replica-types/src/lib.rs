//! Dynamic value model for Replica.
//!
//! This crate defines the object graphs the copy engine works on:
//! - [`Value`]: the tagged union of scalars and shared, mutable handles
//! - [`Collection`] / [`Mapping`]: containers with a concrete kind
//! - [`Array`]: fixed-length, element-typed arrays
//! - [`RecordType`] / [`Record`]: runtime-described composite records with
//!   inherited fields
//!
//! Scalars are immutable and compare by value. Every other variant is a
//! reference-counted handle, so two values may alias the same container and
//! graphs may contain cycles.

// Value hashes handles by address, never by contents.
#![allow(clippy::mutable_key_type)]

mod array;
mod collection;
mod element;
mod record;
mod value;

pub use array::Array;
pub use collection::{Collection, CollectionKind, Mapping, MappingKind};
pub use element::ElementType;
pub use record::{
    Construction, FieldDef, FieldSlot, Mutability, Record, RecordType, RecordTypeBuilder,
    Visibility,
};
pub use value::{Opaque, Shared, Value};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by value model operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("expected a value of type {expected}, found {found}")]
    ElementType { expected: String, found: String },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("type {type_name} has no field `{field}`")]
    UnknownField { type_name: String, field: String },

    #[error("field `{field}` of {type_name} is final")]
    FinalField { type_name: String, field: String },

    #[error("type {type_name} declares field `{field}` more than once")]
    DuplicateField { type_name: String, field: String },

    #[error("type {type_name} cannot be constructed: {reason}")]
    NotConstructible {
        type_name: String,
        reason: &'static str,
    },
}
