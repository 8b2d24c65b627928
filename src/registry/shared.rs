use super::LoggerRegistry;
use crate::domain::{EntityCreationError, LevelMap};
use crate::reconcile::{ApplyReport, CreationPolicy};
use parking_lot::Mutex;
use std::sync::Arc;

/// Single-writer handle around a registry shared between callers.
///
/// Each operation holds the lock across enumeration and mutation, so no
/// other caller can register a logger between the two.
pub struct SharedRegistry<R> {
    inner: Arc<Mutex<R>>,
}

impl<R: LoggerRegistry> SharedRegistry<R> {
    pub fn new(registry: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    pub fn snapshot(&self) -> LevelMap {
        LevelMap::from_registry(&*self.inner.lock())
    }

    pub fn would_make_changes(&self, levels: &LevelMap) -> bool {
        levels.would_make_changes(&*self.inner.lock())
    }

    pub fn apply(
        &self,
        levels: &LevelMap,
        policy: CreationPolicy,
    ) -> Result<ApplyReport, EntityCreationError> {
        levels.apply_with_policy(&mut *self.inner.lock(), policy)
    }

    /// Apply only when it would change something. `Ok(None)` means the
    /// registry already matched.
    pub fn reconcile(
        &self,
        levels: &LevelMap,
        policy: CreationPolicy,
    ) -> Result<Option<ApplyReport>, EntityCreationError> {
        let mut registry = self.inner.lock();
        if !levels.would_make_changes(&*registry) {
            return Ok(None);
        }
        levels.apply_with_policy(&mut *registry, policy).map(Some)
    }

    /// Run `f` with exclusive access to the registry.
    pub fn with_registry<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        f(&mut self.inner.lock())
    }
}

impl<R> Clone for SharedRegistry<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
