//! Batch resolver: the registry and its lookup index as one unit.
//!
//! A batch is matched against the index as it stood when the batch began.
//! Names inside the same batch never match each other: two identical unseen
//! names in one batch each mint their own identifier. Assignments are merged
//! into the registry only after every name is resolved, and the index is
//! refreshed once, after the merge.

mod batch;
mod shared;

pub use batch::{BatchResolution, Outcome, Resolution};
pub use shared::SharedResolver;

use crate::config::{IndexMaintenance, ResolverConfig};
use crate::entity::CanonicalId;
use crate::error::{ResolveError, ResolveResult};
use crate::index::{IndexMatch, LookupIndex};
use crate::normalize::Normalizer;
use crate::registry::CanonicalRegistry;

/// Resolves names to canonical identifiers, minting new ones as needed.
///
/// # Examples
///
/// ```
/// use canonid::{CanonicalId, EntityResolver, ResolverConfig};
///
/// let mut resolver = EntityResolver::with_seed(
///     [("Acme Corp", CanonicalId::new(1)), ("Acme Industries", CanonicalId::new(2))],
///     ResolverConfig::default(),
/// )?;
///
/// let batch = resolver.resolve_batch(["Acme Partners", "Zyxwvq"])?;
/// assert_eq!(batch.get("Acme Partners"), Some(CanonicalId::new(1)));
/// assert_eq!(batch.get("Zyxwvq"), Some(CanonicalId::new(3)));
/// # Ok::<(), canonid::ResolveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EntityResolver {
    registry: CanonicalRegistry,
    index: LookupIndex,
    config: ResolverConfig,
}

impl EntityResolver {
    /// Creates a resolver over an empty registry.
    ///
    /// # Errors
    /// `Validation` if the configuration is invalid.
    pub fn new(config: ResolverConfig) -> ResolveResult<Self> {
        Self::with_seed(Vec::<(String, CanonicalId)>::new(), config)
    }

    /// Creates a resolver seeded with an existing `name -> id` mapping.
    ///
    /// # Errors
    /// `Validation` if the configuration is invalid.
    pub fn with_seed<I, S>(mapping: I, config: ResolverConfig) -> ResolveResult<Self>
    where
        I: IntoIterator<Item = (S, CanonicalId)>,
        S: Into<String>,
    {
        config.validate()?;
        let registry = CanonicalRegistry::seed(mapping, Normalizer::new(config.case_folding));
        Self::from_registry(registry, config)
    }

    /// Wraps an existing registry, building its index.
    ///
    /// The registry's own normalizer is kept; `config.case_folding` is not
    /// reapplied to it.
    ///
    /// # Errors
    /// `Validation` if the configuration is invalid.
    pub fn from_registry(registry: CanonicalRegistry, config: ResolverConfig) -> ResolveResult<Self> {
        config.validate()?;
        let index = LookupIndex::build(&registry);
        Ok(Self {
            registry,
            index,
            config,
        })
    }

    /// Looks up which existing identifier `name` would resolve to.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<IndexMatch> {
        self.index.find(name)
    }

    /// Resolves a single name as a batch of one.
    ///
    /// # Errors
    /// See [`EntityResolver::resolve_batch`].
    pub fn resolve(&mut self, name: impl Into<String>) -> ResolveResult<CanonicalId> {
        let name: String = name.into();
        let batch = self.resolve_batch([name])?;
        batch
            .iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| ResolveError::internal("single-name batch produced no resolution"))
    }

    /// Resolves `names` in order against the registry as of the call.
    ///
    /// Every name is validated before anything is mutated, and identifier
    /// capacity is checked before any allocation, so a failed batch leaves
    /// the resolver untouched.
    ///
    /// # Errors
    /// - `Validation` if a name is rejected by the configuration
    /// - `IdSpaceExhausted` if the batch needs more identifiers than remain
    pub fn resolve_batch<I, S>(&mut self, names: I) -> ResolveResult<BatchResolution>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        for (position, name) in names.iter().enumerate() {
            self.config.check_name(position, name)?;
        }

        tracing::debug!(
            names = names.len(),
            registry = self.registry.len(),
            next_id = %self.registry.next_id(),
            "resolving batch"
        );

        let planned: Vec<(String, Option<IndexMatch>)> = names
            .into_iter()
            .map(|name| {
                let hit = self.index.find(&name);
                (name, hit)
            })
            .collect();

        let misses = planned.iter().filter(|(_, hit)| hit.is_none()).count();
        let misses = u64::try_from(misses).unwrap_or(u64::MAX);
        if misses > self.registry.remaining_ids() {
            return Err(ResolveError::IdSpaceExhausted {
                next_id: self.registry.next_id(),
            });
        }

        let mut batch = BatchResolution::with_capacity(planned.len());
        for (name, hit) in planned {
            let resolution = match hit {
                Some(hit) => {
                    tracing::trace!(name = %name, id = %hit.id, kind = ?hit.kind, key = %hit.key, "matched");
                    Resolution {
                        name,
                        id: hit.id,
                        outcome: Outcome::Matched(hit.kind),
                    }
                }
                None => {
                    let id = self.registry.allocate_next_id()?;
                    tracing::trace!(name = %name, id = %id, "minted");
                    Resolution {
                        name,
                        id,
                        outcome: Outcome::Minted,
                    }
                }
            };
            batch.push(resolution);
        }

        self.merge(&batch);

        tracing::debug!(
            resolved = batch.len(),
            minted = batch.minted().count(),
            registry = self.registry.len(),
            next_id = %self.registry.next_id(),
            "batch resolved"
        );
        Ok(batch)
    }

    // Registry first, index second: a refresh never sees a half-merged registry.
    fn merge(&mut self, batch: &BatchResolution) {
        let normalizer = self.registry.normalizer();
        let mut appended: Vec<(String, CanonicalId)> = Vec::new();
        let mut overwrote = false;

        for r in batch {
            match self.registry.insert(r.name.clone(), r.id) {
                None => appended.push((normalizer.normalize(&r.name).into_owned(), r.id)),
                Some(prev) if prev == r.id => {}
                Some(_) => overwrote = true,
            }
        }

        match self.config.index_maintenance {
            IndexMaintenance::Incremental if !overwrote => {
                tracing::trace!(appended = appended.len(), "appending to lookup index");
                for (key, id) in &appended {
                    self.index.append(key, *id);
                }
            }
            IndexMaintenance::Incremental | IndexMaintenance::FullRebuild => {
                self.index.rebuild(&self.registry);
            }
        }
    }

    /// Discards the lookup index and rebuilds it from the registry.
    pub fn rebuild_index(&mut self) {
        self.index.rebuild(&self.registry);
    }

    /// The canonical registry.
    #[must_use]
    pub const fn registry(&self) -> &CanonicalRegistry {
        &self.registry
    }

    /// The lookup index.
    #[must_use]
    pub const fn index(&self) -> &LookupIndex {
        &self.index
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Identifier the next mint will use.
    #[must_use]
    pub const fn next_id(&self) -> CanonicalId {
        self.registry.next_id()
    }

    /// Consumes the resolver, returning the registry for the caller to persist.
    #[must_use]
    pub fn into_registry(self) -> CanonicalRegistry {
        self.registry
    }
}

impl Default for EntityResolver {
    fn default() -> Self {
        // The default config is always valid and an empty registry indexes to nothing.
        Self {
            registry: CanonicalRegistry::default(),
            index: LookupIndex::default(),
            config: ResolverConfig::default(),
        }
    }
}
