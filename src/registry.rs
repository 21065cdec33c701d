//! Canonical registry: normalized name to identifier, plus allocation.
//!
//! The registry is the only source of truth. Lookup indexes are derived from
//! it and can always be rebuilt from its contents.

use indexmap::IndexMap;

use crate::entity::{CanonicalId, EntityRecord};
use crate::error::{ResolveError, ResolveResult};
use crate::normalize::Normalizer;

/// Authoritative mapping from normalized name to [`EntityRecord`].
///
/// Iteration follows insertion order. Overwriting an existing key keeps the
/// key's original position, which in turn fixes its position in every index
/// bucket.
#[derive(Debug, Clone)]
pub struct CanonicalRegistry {
    records: IndexMap<String, EntityRecord>,
    next_id: CanonicalId,
    // Set once `i64::MAX` has been handed out or seeded.
    exhausted: bool,
    normalizer: Normalizer,
}

impl Default for CanonicalRegistry {
    fn default() -> Self {
        Self::new(Normalizer::default())
    }
}

impl CanonicalRegistry {
    /// Creates an empty registry. `next_id` starts at 1.
    #[must_use]
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            records: IndexMap::new(),
            next_id: CanonicalId::FIRST,
            exhausted: false,
            normalizer,
        }
    }

    /// Seeds a registry from an existing name to identifier mapping.
    ///
    /// `next_id` becomes `max(identifiers) + 1`, or 1 for an empty mapping.
    /// Identifiers are taken as-is: zero, negative and sparse values are all
    /// accepted. Names that normalize to the same key collapse into one entry
    /// and the later identifier wins.
    pub fn seed<I, S>(mapping: I, normalizer: Normalizer) -> Self
    where
        I: IntoIterator<Item = (S, CanonicalId)>,
        S: Into<String>,
    {
        let mut registry = Self::new(normalizer);
        let mut max: Option<CanonicalId> = None;

        for (name, id) in mapping {
            let name = name.into();
            let key = normalizer.normalize(&name).into_owned();
            registry.records.insert(key, EntityRecord::new(name, id));
            max = Some(max.map_or(id, |m| m.max(id)));
        }

        if let Some(max) = max {
            match max.next() {
                Some(next) => registry.next_id = next,
                None => {
                    registry.next_id = max;
                    registry.exhausted = true;
                }
            }
        }

        tracing::debug!(
            entries = registry.records.len(),
            next_id = %registry.next_id,
            "registry seeded"
        );
        registry
    }

    /// Returns the current `next_id` and advances the counter by one.
    ///
    /// # Errors
    /// `IdSpaceExhausted` once `i64::MAX` has been assigned.
    pub fn allocate_next_id(&mut self) -> ResolveResult<CanonicalId> {
        if self.exhausted {
            return Err(ResolveError::IdSpaceExhausted {
                next_id: self.next_id,
            });
        }

        let id = self.next_id;
        match id.next() {
            Some(next) => self.next_id = next,
            None => self.exhausted = true,
        }
        tracing::trace!(id = %id, "allocated canonical id");
        Ok(id)
    }

    /// Adds or overwrites the entry for `name`.
    ///
    /// Returns the identifier previously stored under the same normalized
    /// key. If `id` is at or beyond `next_id`, the counter is moved past it
    /// so later allocations can never collide with it.
    pub fn insert(&mut self, name: impl Into<String>, id: CanonicalId) -> Option<CanonicalId> {
        let name = name.into();
        let key = self.normalizer.normalize(&name).into_owned();

        if !self.exhausted && id >= self.next_id {
            match id.next() {
                Some(next) => self.next_id = next,
                None => {
                    self.next_id = id;
                    self.exhausted = true;
                }
            }
        }

        self.records
            .insert(key, EntityRecord::new(name, id))
            .map(|prev| prev.id)
    }

    /// Looks up the identifier registered for `name` (exact, after normalization).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<CanonicalId> {
        let key = self.normalizer.normalize(name);
        self.records.get(key.as_ref()).map(|r| r.id)
    }

    /// Returns the record registered for `name`.
    #[must_use]
    pub fn record(&self, name: &str) -> Option<&EntityRecord> {
        let key = self.normalizer.normalize(name);
        self.records.get(key.as_ref())
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Peeks at the identifier the next allocation will return.
    ///
    /// Once [`CanonicalRegistry::is_exhausted`] is true this is `i64::MAX`,
    /// which is already assigned, and no further allocation succeeds.
    #[must_use]
    pub const fn next_id(&self) -> CanonicalId {
        self.next_id
    }

    /// Returns true once `i64::MAX` has been assigned and allocation can no
    /// longer succeed.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// How many identifiers can still be allocated.
    #[must_use]
    pub fn remaining_ids(&self) -> u64 {
        if self.exhausted {
            return 0;
        }
        let remaining = i128::from(i64::MAX) - i128::from(self.next_id.get()) + 1;
        u64::try_from(remaining).unwrap_or(u64::MAX)
    }

    /// The normalizer used for keys.
    #[must_use]
    pub const fn normalizer(&self) -> Normalizer {
        self.normalizer
    }

    /// Normalized keys and identifiers, in registry order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, CanonicalId)> {
        self.records.iter().map(|(k, r)| (k.as_str(), r.id))
    }

    /// Records in registry order.
    pub fn records(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.values()
    }

    /// Distinct identifiers currently referenced, in first-seen order.
    #[must_use]
    pub fn ids(&self) -> Vec<CanonicalId> {
        let mut seen = indexmap::IndexSet::with_capacity(self.records.len());
        for record in self.records.values() {
            seen.insert(record.id);
        }
        seen.into_iter().collect()
    }

    /// Copies the registry out as `name -> id`, keyed by the supplied names.
    ///
    /// Feeding the snapshot back into [`CanonicalRegistry::seed`] reproduces
    /// the same keys, order and identifiers.
    #[must_use]
    pub fn snapshot(&self) -> IndexMap<String, CanonicalId> {
        self.records
            .values()
            .map(|r| (r.name.clone(), r.id))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, CanonicalId)> for CanonicalRegistry {
    fn from_iter<I: IntoIterator<Item = (S, CanonicalId)>>(iter: I) -> Self {
        Self::seed(iter, Normalizer::default())
    }
}
