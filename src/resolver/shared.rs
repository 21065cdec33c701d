//! Thread-safe wrapper around [`EntityResolver`].
//!
//! Registry and index are one unit of shared state. A batch holds the write
//! lock from its first lookup to its index refresh, so no reader can observe
//! a merged registry with a stale index.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::entity::CanonicalId;
use crate::error::{ResolveError, ResolveResult};
use crate::index::IndexMatch;
use crate::resolver::{BatchResolution, EntityResolver};

fn lock_err(context: &'static str) -> ResolveError {
    ResolveError::LockPoisoned { context }
}

/// Cloneable handle to a resolver shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SharedResolver {
    inner: Arc<RwLock<EntityResolver>>,
}

impl SharedResolver {
    /// Wraps a resolver.
    #[must_use]
    pub fn new(resolver: EntityResolver) -> Self {
        Self {
            inner: Arc::new(RwLock::new(resolver)),
        }
    }

    fn read(&self, context: &'static str) -> ResolveResult<RwLockReadGuard<'_, EntityResolver>> {
        self.inner.read().map_err(|_| lock_err(context))
    }

    fn write(&self, context: &'static str) -> ResolveResult<RwLockWriteGuard<'_, EntityResolver>> {
        self.inner.write().map_err(|_| lock_err(context))
    }

    /// Looks up an existing identifier under the read lock.
    ///
    /// # Errors
    /// `LockPoisoned` if a writer panicked.
    pub fn find(&self, name: &str) -> ResolveResult<Option<IndexMatch>> {
        Ok(self.read("resolver.find")?.find(name))
    }

    /// Resolves a batch under the write lock.
    ///
    /// # Errors
    /// `LockPoisoned`, plus everything [`EntityResolver::resolve_batch`] returns.
    pub fn resolve_batch<I, S>(&self, names: I) -> ResolveResult<BatchResolution>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write("resolver.resolve_batch")?.resolve_batch(names)
    }

    /// Resolves one name under the write lock.
    ///
    /// # Errors
    /// See [`SharedResolver::resolve_batch`].
    pub fn resolve(&self, name: impl Into<String>) -> ResolveResult<CanonicalId> {
        self.write("resolver.resolve")?.resolve(name)
    }

    /// Copies the registry out as `name -> id`.
    ///
    /// # Errors
    /// `LockPoisoned` if a writer panicked.
    pub fn snapshot(&self) -> ResolveResult<IndexMap<String, CanonicalId>> {
        Ok(self.read("resolver.snapshot")?.registry().snapshot())
    }

    /// Number of registered names.
    ///
    /// # Errors
    /// `LockPoisoned` if a writer panicked.
    pub fn len(&self) -> ResolveResult<usize> {
        Ok(self.read("resolver.len")?.registry().len())
    }

    /// Identifier the next mint will use.
    ///
    /// # Errors
    /// `LockPoisoned` if a writer panicked.
    pub fn next_id(&self) -> ResolveResult<CanonicalId> {
        Ok(self.read("resolver.next_id")?.next_id())
    }
}

impl From<EntityResolver> for SharedResolver {
    fn from(resolver: EntityResolver) -> Self {
        Self::new(resolver)
    }
}
