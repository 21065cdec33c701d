//! Canonical identifiers and entity records.
//!
//! Every resolved name is anchored to a [`CanonicalId`]. Once minted, an
//! identifier is never reused and a registered name keeps resolving to it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable integer identifier assigned to a resolved entity.
///
/// Identifiers are signed: a seed mapping may carry zero or negative values,
/// and those are accepted as-is.
///
/// # Examples
///
/// ```
/// use canonid::CanonicalId;
///
/// let id = CanonicalId::new(7);
/// assert_eq!(id.get(), 7);
/// assert_eq!(id.next(), Some(CanonicalId::new(8)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalId(i64);

impl CanonicalId {
    /// The first identifier handed out by an empty registry.
    pub const FIRST: Self = Self(1);

    /// Creates an identifier from a raw value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns the identifier that follows this one, or `None` on overflow.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl Default for CanonicalId {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CanonicalId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<CanonicalId> for i64 {
    fn from(id: CanonicalId) -> Self {
        id.0
    }
}

/// A registered name and the identifier it resolves to.
///
/// `name` keeps the spelling it was last inserted with; the registry keys
/// records by the normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Name as supplied by the caller.
    pub name: String,

    /// Assigned identifier.
    pub id: CanonicalId,
}

impl EntityRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(name: impl Into<String>, id: CanonicalId) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}
