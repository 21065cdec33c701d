//! Name normalization and tokenization.
//!
//! Normalization is case folding only. Whitespace is not trimmed or
//! collapsed, so a leading space is part of every prefix of a name. Folding
//! never consults the process locale.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Case folding applied before indexing and querying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseFolding {
    /// Full Unicode lower-casing (`str::to_lowercase`).
    #[default]
    Unicode,
    /// ASCII-only lower-casing; non-ASCII characters are left untouched.
    Ascii,
}

/// Applies one [`CaseFolding`] consistently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalizer {
    folding: CaseFolding,
}

impl Normalizer {
    /// Creates a normalizer with the given folding.
    #[must_use]
    pub const fn new(folding: CaseFolding) -> Self {
        Self { folding }
    }

    /// Returns the folding in use.
    #[must_use]
    pub const fn folding(&self) -> CaseFolding {
        self.folding
    }

    /// Normalizes a name. Borrows when the input is already folded.
    #[must_use]
    pub fn normalize<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self.folding {
            CaseFolding::Unicode => {
                if name.chars().any(changes_when_lowercased) {
                    Cow::Owned(name.to_lowercase())
                } else {
                    Cow::Borrowed(name)
                }
            }
            CaseFolding::Ascii => {
                if name.bytes().any(|b| b.is_ascii_uppercase()) {
                    Cow::Owned(name.to_ascii_lowercase())
                } else {
                    Cow::Borrowed(name)
                }
            }
        }
    }
}

// Covers titlecase letters, which are not `is_uppercase` but still fold.
fn changes_when_lowercased(c: char) -> bool {
    let mut lower = c.to_lowercase();
    lower.next() != Some(c) || lower.next().is_some()
}

/// Splits a normalized name into whitespace-delimited words.
pub fn words(name: &str) -> impl Iterator<Item = &str> {
    name.split_whitespace()
}

/// Yields every non-empty prefix of `name`, shortest first, on char boundaries.
pub fn prefixes(name: &str) -> impl Iterator<Item = &str> {
    name.char_indices()
        .map(move |(start, c)| &name[..start + c.len_utf8()])
}

/// Returns true for names that contain no word at all.
#[must_use]
pub fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unicode_folding_lowercases_non_ascii() {
        let n = Normalizer::new(CaseFolding::Unicode);
        assert_eq!(n.normalize("ÉCOLE Polytechnique"), "école polytechnique");
    }

    #[test]
    fn ascii_folding_leaves_non_ascii() {
        let n = Normalizer::new(CaseFolding::Ascii);
        assert_eq!(n.normalize("ÉCOLE Polytechnique"), "École polytechnique");
    }

    #[test]
    fn normalize_borrows_when_already_folded() {
        let n = Normalizer::default();
        assert!(matches!(n.normalize("acme corp"), Cow::Borrowed(_)));
        assert!(matches!(n.normalize("Acme corp"), Cow::Owned(_)));
    }

    #[test]
    fn normalize_does_not_trim() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("  Acme "), "  acme ");
    }

    #[test]
    fn words_split_on_any_whitespace() {
        let got: Vec<_> = words(" acme\tcorp \n inc ").collect();
        assert_eq!(got, vec!["acme", "corp", "inc"]);
    }

    #[test]
    fn prefixes_are_char_aligned_and_shortest_first() {
        let got: Vec<_> = prefixes("zoë").collect();
        assert_eq!(got, vec!["z", "zo", "zoë"]);
        assert_eq!(prefixes("").count(), 0);
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n"));
        assert!(!is_blank(" a "));
    }
}
