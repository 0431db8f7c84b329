//! Copy options.
//!
//! Options deserialize from TOML; every key is optional:
//!
//! ```toml
//! final_fields = "copy"
//! force_access = true
//! preserve_shared = true
//! cache_fields = true
//! max_depth = 256
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CopyResult;

/// What happens to fields that are immutable after construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinalFieldPolicy {
    /// Leave the value the default constructor produced.
    #[default]
    Skip,
    /// Copy the original's value like any other field.
    Copy,
}

/// Tunables for a [`DeepCopier`](crate::DeepCopier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyOptions {
    pub final_fields: FinalFieldPolicy,
    /// Read and write private fields. When off, a private field fails the copy.
    pub force_access: bool,
    /// Copy each shared object once and link cycles back to the copy. When
    /// off, every reference is copied separately and cycles are errors.
    pub preserve_shared: bool,
    /// Reuse field layouts across records of the same type.
    pub cache_fields: bool,
    /// Maximum nesting of containers, arrays and records.
    pub max_depth: Option<usize>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            final_fields: FinalFieldPolicy::Skip,
            force_access: true,
            preserve_shared: true,
            cache_fields: true,
            max_depth: None,
        }
    }
}

impl CopyOptions {
    /// Parses options from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> CopyResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    #[must_use]
    pub fn with_final_fields(mut self, policy: FinalFieldPolicy) -> Self {
        self.final_fields = policy;
        self
    }

    #[must_use]
    pub fn with_force_access(mut self, force_access: bool) -> Self {
        self.force_access = force_access;
        self
    }

    #[must_use]
    pub fn with_preserve_shared(mut self, preserve_shared: bool) -> Self {
        self.preserve_shared = preserve_shared;
        self
    }

    #[must_use]
    pub fn with_cache_fields(mut self, cache_fields: bool) -> Self {
        self.cache_fields = cache_fields;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
