//! Per-batch resolution results.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::entity::CanonicalId;
use crate::index::MatchKind;

/// How one input name got its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Matched an entry that existed before the batch began.
    Matched(MatchKind),
    /// No match; a new identifier was allocated.
    Minted,
}

/// The identifier assigned to one input name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Input name as supplied.
    pub name: String,
    /// Assigned identifier.
    pub id: CanonicalId,
    /// Match or mint.
    pub outcome: Outcome,
}

impl Resolution {
    /// Returns true if a new identifier was allocated for this name.
    #[must_use]
    pub fn is_minted(&self) -> bool {
        self.outcome == Outcome::Minted
    }
}

/// Result of resolving one batch, in input order.
///
/// The same input string may appear more than once; each occurrence is kept.
/// Map-style accessors use the last occurrence, which is also the assignment
/// the registry ends up holding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchResolution {
    resolutions: Vec<Resolution>,
}

impl BatchResolution {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            resolutions: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, resolution: Resolution) {
        self.resolutions.push(resolution);
    }

    /// Identifier assigned to `name` (exact input string, last occurrence).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<CanonicalId> {
        self.resolutions
            .iter()
            .rev()
            .find(|r| r.name == name)
            .map(|r| r.id)
    }

    /// `input name -> id`, first-occurrence order, last-occurrence value.
    #[must_use]
    pub fn to_map(&self) -> IndexMap<String, CanonicalId> {
        let mut map = IndexMap::with_capacity(self.resolutions.len());
        for r in &self.resolutions {
            map.insert(r.name.clone(), r.id);
        }
        map
    }

    /// Resolutions that allocated a new identifier.
    pub fn minted(&self) -> impl Iterator<Item = &Resolution> {
        self.resolutions.iter().filter(|r| r.is_minted())
    }

    /// Resolutions that matched a pre-existing entry.
    pub fn matched(&self) -> impl Iterator<Item = &Resolution> {
        self.resolutions.iter().filter(|r| !r.is_minted())
    }

    /// All resolutions in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Resolution> {
        self.resolutions.iter()
    }

    /// Number of input names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolutions.len()
    }

    /// Returns true for an empty batch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolutions.is_empty()
    }
}

impl IntoIterator for BatchResolution {
    type Item = Resolution;
    type IntoIter = std::vec::IntoIter<Resolution>;

    fn into_iter(self) -> Self::IntoIter {
        self.resolutions.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchResolution {
    type Item = &'a Resolution;
    type IntoIter = std::slice::Iter<'a, Resolution>;

    fn into_iter(self) -> Self::IntoIter {
        self.resolutions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(name: &str, id: i64, outcome: Outcome) -> Resolution {
        Resolution {
            name: name.to_string(),
            id: CanonicalId::new(id),
            outcome,
        }
    }

    fn sample() -> BatchResolution {
        let mut batch = BatchResolution::with_capacity(3);
        batch.push(res("Acme Co", 1, Outcome::Minted));
        batch.push(res("Acme Partners", 7, Outcome::Matched(MatchKind::Word)));
        batch.push(res("Acme Co", 2, Outcome::Minted));
        batch
    }

    #[test]
    fn get_uses_last_occurrence() {
        let batch = sample();
        assert_eq!(batch.get("Acme Co"), Some(CanonicalId::new(2)));
        assert_eq!(batch.get("acme co"), None);
    }

    #[test]
    fn to_map_keeps_first_position_last_value() {
        let map = sample().to_map();
        let pairs: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), v.get())).collect();
        assert_eq!(pairs, vec![("Acme Co", 2), ("Acme Partners", 7)]);
    }

    #[test]
    fn minted_and_matched_partition_the_batch() {
        let batch = sample();
        assert_eq!(batch.minted().count(), 2);
        assert_eq!(batch.matched().count(), 1);
        assert_eq!(batch.len(), 3);
        assert!(!batch.is_empty());
    }

    #[test]
    fn serializes_as_ordered_list() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json[1]["outcome"], serde_json::json!({"matched": "word"}));
        assert_eq!(json[2]["outcome"], serde_json::json!("minted"));
        assert_eq!(json[2]["id"], serde_json::json!(2));
    }
}
