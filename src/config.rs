//! Resolver configuration.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::normalize::CaseFolding;

/// What to do with empty or whitespace-only names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyNamePolicy {
    /// Treat as "no match" and mint a fresh identifier.
    #[default]
    Mint,
    /// Fail the whole batch with `ValidationError::EmptyName`.
    Reject,
}

/// How the lookup index is refreshed after a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexMaintenance {
    /// Discard and rebuild from the registry after every batch.
    #[default]
    FullRebuild,
    /// Append postings for newly added keys. Any overwrite of an existing
    /// key in the batch falls back to a full rebuild.
    Incremental,
}

/// Resolver configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Case folding for keys and queries.
    pub case_folding: CaseFolding,
    /// Handling of blank names.
    pub empty_names: EmptyNamePolicy,
    /// Index refresh strategy.
    pub index_maintenance: IndexMaintenance,
    /// Maximum name length in characters. Prefix indexing is quadratic in
    /// name length, so long inputs can be refused up front.
    pub max_name_len: Option<usize>,
}

impl ResolverConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the case folding.
    #[must_use]
    pub fn with_case_folding(mut self, folding: CaseFolding) -> Self {
        self.case_folding = folding;
        self
    }

    /// Sets the blank-name policy.
    #[must_use]
    pub fn with_empty_names(mut self, policy: EmptyNamePolicy) -> Self {
        self.empty_names = policy;
        self
    }

    /// Sets the index refresh strategy.
    #[must_use]
    pub fn with_index_maintenance(mut self, maintenance: IndexMaintenance) -> Self {
        self.index_maintenance = maintenance;
        self
    }

    /// Caps accepted name length, in characters.
    #[must_use]
    pub fn with_max_name_len(mut self, max: usize) -> Self {
        self.max_name_len = Some(max);
        self
    }

    /// Checks the configuration for contradictory settings.
    ///
    /// # Errors
    /// `InvalidConfig` if `max_name_len` is zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_name_len == Some(0) {
            return Err(ValidationError::InvalidConfig {
                reason: "max_name_len must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Validates one input name against this configuration.
    ///
    /// # Errors
    /// `EmptyName` under [`EmptyNamePolicy::Reject`], `NameTooLong` past
    /// `max_name_len`.
    pub fn check_name(&self, position: usize, name: &str) -> Result<(), ValidationError> {
        if self.empty_names == EmptyNamePolicy::Reject && crate::normalize::is_blank(name) {
            return Err(ValidationError::EmptyName { position });
        }
        if let Some(max_length) = self.max_name_len {
            let length = name.chars().count();
            if length > max_length {
                return Err(ValidationError::NameTooLong {
                    position,
                    length,
                    max_length,
                });
            }
        }
        Ok(())
    }
}
