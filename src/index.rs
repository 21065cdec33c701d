//! Word and prefix lookup index.
//!
//! Both maps are inverted indexes from a normalized token to the identifiers
//! of registry entries that contain it, in registry order. The index is a
//! pure function of the registry: [`LookupIndex::build`] over the same
//! registry always yields an equal index.
//!
//! # Matching policy
//!
//! Queries are first-match, not best-match:
//! 1. words of the query in input order; the first word with a bucket wins
//!    and resolves to that bucket's first identifier;
//! 2. otherwise prefixes of the query, shortest first; the first prefix with
//!    a bucket wins, again taking the first identifier.
//!
//! A single shared leading character is enough for a prefix match, and a
//! later, more specific entry never beats an earlier one in the same bucket.
//! That precision loss is the price of O(1) work per token.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entity::CanonicalId;
use crate::normalize::{self, Normalizer};
use crate::registry::CanonicalRegistry;

/// Which index produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// A whole word of the query is a word of a registered name.
    Word,
    /// A leading substring of the query is a prefix of a registered name.
    Prefix,
}

/// A successful index lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMatch {
    /// Resolved identifier.
    pub id: CanonicalId,
    /// Index that matched.
    pub kind: MatchKind,
    /// The normalized word or prefix that hit.
    pub key: String,
}

/// Size counters for an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Distinct words.
    pub words: usize,
    /// Distinct prefixes.
    pub prefixes: usize,
    /// Total identifiers across word buckets.
    pub word_postings: usize,
    /// Total identifiers across prefix buckets.
    pub prefix_postings: usize,
}

/// Derived word and prefix index over a [`CanonicalRegistry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupIndex {
    by_word: HashMap<String, Vec<CanonicalId>>,
    by_prefix: HashMap<String, Vec<CanonicalId>>,
    normalizer: Normalizer,
}

impl LookupIndex {
    /// Builds an index from every entry of `registry`, in registry order.
    #[must_use]
    pub fn build(registry: &CanonicalRegistry) -> Self {
        let mut index = Self {
            by_word: HashMap::new(),
            by_prefix: HashMap::new(),
            normalizer: registry.normalizer(),
        };
        for (key, id) in registry.entries() {
            index.append(key, id);
        }
        tracing::debug!(
            entries = registry.len(),
            words = index.by_word.len(),
            prefixes = index.by_prefix.len(),
            "lookup index built"
        );
        index
    }

    /// Discards the current contents and rebuilds from `registry`.
    pub fn rebuild(&mut self, registry: &CanonicalRegistry) {
        *self = Self::build(registry);
    }

    /// Appends the postings for one already-normalized registry key.
    ///
    /// Equivalent to a rebuild only when `key` is new to the registry and
    /// therefore sits last in registry order.
    pub fn append(&mut self, key: &str, id: CanonicalId) {
        for word in normalize::words(key) {
            self.by_word.entry(word.to_string()).or_default().push(id);
        }
        for prefix in normalize::prefixes(key) {
            self.by_prefix.entry(prefix.to_string()).or_default().push(id);
        }
    }

    /// Finds the identifier `name` should resolve to, if any.
    ///
    /// Returns `None` when no word and no prefix of `name` is indexed. Blank
    /// names never match.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<IndexMatch> {
        if normalize::is_blank(name) {
            return None;
        }
        let name = self.normalizer.normalize(name);

        for word in normalize::words(&name) {
            if let Some(&id) = self.by_word.get(word).and_then(|bucket| bucket.first()) {
                return Some(IndexMatch {
                    id,
                    kind: MatchKind::Word,
                    key: word.to_string(),
                });
            }
        }

        for prefix in normalize::prefixes(&name) {
            if let Some(&id) = self.by_prefix.get(prefix).and_then(|bucket| bucket.first()) {
                return Some(IndexMatch {
                    id,
                    kind: MatchKind::Prefix,
                    key: prefix.to_string(),
                });
            }
        }

        None
    }

    /// Like [`LookupIndex::find`], returning only the identifier.
    #[must_use]
    pub fn find_id(&self, name: &str) -> Option<CanonicalId> {
        self.find(name).map(|m| m.id)
    }

    /// Bucket for a normalized word.
    #[must_use]
    pub fn word_bucket(&self, word: &str) -> &[CanonicalId] {
        self.by_word.get(word).map(Vec::as_slice).unwrap_or_default()
    }

    /// Bucket for a normalized prefix.
    #[must_use]
    pub fn prefix_bucket(&self, prefix: &str) -> &[CanonicalId] {
        self.by_prefix.get(prefix).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns true if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_word.is_empty() && self.by_prefix.is_empty()
    }

    /// Size counters.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            words: self.by_word.len(),
            prefixes: self.by_prefix.len(),
            word_postings: self.by_word.values().map(Vec::len).sum(),
            prefix_postings: self.by_prefix.values().map(Vec::len).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(v: i64) -> CanonicalId {
        CanonicalId::new(v)
    }

    fn index_of(entries: &[(&str, i64)]) -> LookupIndex {
        let registry: CanonicalRegistry = entries.iter().map(|&(n, v)| (n, id(v))).collect();
        LookupIndex::build(&registry)
    }

    #[test]
    fn word_match_takes_first_bucket_entry() {
        let index = index_of(&[("Acme Corp", 1), ("Acme Industries", 2)]);
        assert_eq!(index.word_bucket("acme"), &[id(1), id(2)]);

        let m = index.find("Acme Partners").unwrap();
        assert_eq!(m.id, id(1));
        assert_eq!(m.kind, MatchKind::Word);
        assert_eq!(m.key, "acme");
    }

    #[test]
    fn words_are_tried_in_input_order() {
        let index = index_of(&[("Globex", 1), ("Initech", 2)]);
        assert_eq!(index.find_id("initech globex"), Some(id(2)));
        assert_eq!(index.find_id("globex initech"), Some(id(1)));
    }

    #[test]
    fn prefix_fallback_uses_shortest_prefix() {
        let index = index_of(&[("Johnson", 5)]);
        let m = index.find("John").unwrap();
        assert_eq!(m.id, id(5));
        assert_eq!(m.kind, MatchKind::Prefix);
        assert_eq!(m.key, "j");
    }

    #[test]
    fn shortest_prefix_beats_more_specific_entry() {
        let index = index_of(&[("Jones", 1), ("Jonas Brothers", 2)]);
        // Only "Jonas Brothers" starts with "jona", but "j" already hits "Jones".
        assert_eq!(index.find_id("Jona"), Some(id(1)));
        assert_eq!(index.find_id("Jonas"), Some(id(2)));
    }

    #[test]
    fn word_match_wins_over_earlier_prefix_match() {
        let index = index_of(&[("Zeta", 1), ("Omega Zeta", 2), ("Delta", 3)]);
        // "delta" is a whole word; the "z" prefix of "zed" is never consulted.
        assert_eq!(index.find("Zed Delta").map(|m| (m.id, m.kind)), Some((id(3), MatchKind::Word)));
    }

    #[test]
    fn no_overlap_is_none() {
        let index = index_of(&[("Acme Corp", 1), ("Globex", 2)]);
        assert!(index.find("Zyxwvq").is_none());
    }

    #[test]
    fn blank_queries_never_match() {
        let index = index_of(&[(" leading space", 1)]);
        assert!(index.find("").is_none());
        assert!(index.find("   ").is_none());
    }

    #[test]
    fn query_is_case_insensitive() {
        let index = index_of(&[("acme corp", 1)]);
        assert_eq!(index.find_id("ACME"), Some(id(1)));
        assert_eq!(index.find_id("AC"), Some(id(1)));
    }

    #[test]
    fn repeated_word_in_one_name_is_posted_twice() {
        let index = index_of(&[("New New York", 1)]);
        assert_eq!(index.word_bucket("new"), &[id(1), id(1)]);
    }

    #[test]
    fn prefixes_cover_every_length() {
        let index = index_of(&[("abc", 1), ("abd", 2)]);
        assert_eq!(index.prefix_bucket("a"), &[id(1), id(2)]);
        assert_eq!(index.prefix_bucket("ab"), &[id(1), id(2)]);
        assert_eq!(index.prefix_bucket("abc"), &[id(1)]);
        assert!(index.prefix_bucket("abcd").is_empty());
    }

    #[test]
    fn multibyte_prefixes_match() {
        let index = index_of(&[("Zoë Keating", 7)]);
        assert_eq!(index.find_id("zoëtrope"), Some(id(7)));
        assert_eq!(index.prefix_bucket("zoë"), &[id(7)]);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let registry: CanonicalRegistry = [("Acme Corp", id(1)), ("Globex", id(2)), ("Acme Labs", id(3))]
            .into_iter()
            .collect();
        let mut index = LookupIndex::build(&registry);
        let first = index.clone();
        index.rebuild(&registry);
        assert_eq!(index, first);
        for q in ["acme", "glob", "labs", "x", "Acme Labs"] {
            assert_eq!(index.find(q), first.find(q));
        }
    }

    #[test]
    fn append_matches_build_for_new_trailing_entry() {
        let mut registry: CanonicalRegistry = [("Acme Corp", id(1))].into_iter().collect();
        let mut index = LookupIndex::build(&registry);

        registry.insert("Acme Labs", id(2));
        index.append("acme labs", id(2));

        assert_eq!(index, LookupIndex::build(&registry));
    }

    #[test]
    fn stats_count_postings() {
        let index = index_of(&[("ab c", 1)]);
        let stats = index.stats();
        assert_eq!(stats.words, 2);
        assert_eq!(stats.word_postings, 2);
        // "a", "ab", "ab ", "ab c"
        assert_eq!(stats.prefixes, 4);
        assert_eq!(stats.prefix_postings, 4);
        assert!(LookupIndex::default().is_empty());
    }
}
