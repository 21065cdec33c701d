//! # canonid - Incremental Entity-Identity Resolution
//!
//! canonid maps free-text entity names to stable canonical integer
//! identifiers, folding near-identical names together as they stream in.
//!
//! ## Core Concepts
//!
//! - **Registry**: the authoritative `normalized name -> id` mapping and the
//!   `next_id` counter
//! - **Lookup Index**: word and prefix inverted indexes derived from the registry
//! - **Batch**: names resolved together against one registry snapshot, then
//!   merged and re-indexed once
//!
//! ## Usage
//!
//! ```rust
//! use canonid::{CanonicalId, EntityResolver, ResolverConfig};
//!
//! let mut resolver = EntityResolver::with_seed(
//!     [("Johnson", CanonicalId::new(5))],
//!     ResolverConfig::default(),
//! )?;
//!
//! // No shared word, but "j" is a shared prefix.
//! assert_eq!(resolver.resolve("John")?, CanonicalId::new(5));
//!
//! // Nothing in common: a fresh identifier is minted.
//! assert_eq!(resolver.resolve("Zyxwvq")?, CanonicalId::new(6));
//! # Ok::<(), canonid::ResolveError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod entity;
pub mod error;
pub mod index;
pub mod normalize;
pub mod registry;
pub mod resolver;

// Re-export primary types at crate root for convenience
pub use config::{EmptyNamePolicy, IndexMaintenance, ResolverConfig};
pub use entity::{CanonicalId, EntityRecord};
pub use error::{ResolveError, ResolveResult, ValidationError};
pub use index::{IndexMatch, IndexStats, LookupIndex, MatchKind};
pub use normalize::{CaseFolding, Normalizer};
pub use registry::CanonicalRegistry;
pub use resolver::{BatchResolution, EntityResolver, Outcome, Resolution, SharedResolver};
