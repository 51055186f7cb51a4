//! Service locators: anything that maps an input object to a service.
//!
//! Besides the trait itself this module has two combinators. A
//! [`MultiLocator`] fans a lookup out to several locators, and an
//! [`UpdatableLocator`] is a reference cell whose implementation can be
//! swapped while other threads keep querying it, which is how a freshly built
//! ring gets published.

use crate::error::{MedleyError, Result};
use crate::service::Service;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// A service locator based on hashing input objects.
pub trait Locator<S: Service>: Send + Sync {
    /// Locate a service for a particular object.
    fn find(&self, object: &[u8]) -> Result<S>;
}

impl<S: Service, L: Locator<S> + ?Sized> Locator<S> for Arc<L> {
    fn find(&self, object: &[u8]) -> Result<S> {
        (**self).find(object)
    }
}

/// Locate a service for a string object.
pub fn find_string<S: Service, L: Locator<S> + ?Sized>(locator: &L, object: &str) -> Result<S> {
    locator.find(object.as_bytes())
}

/// An aggregate of locators, each of which is consulted on every lookup.
///
/// Safe for concurrent use. An empty `MultiLocator` reports
/// [`MedleyError::NoServices`].
pub struct MultiLocator<S: Service> {
    locators: RwLock<Vec<Arc<dyn Locator<S>>>>,
}

impl<S: Service> MultiLocator<S> {
    pub fn new() -> Self {
        Self {
            locators: RwLock::new(Vec::new()),
        }
    }

    pub fn with_locators<I>(locators: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Locator<S>>>,
    {
        Self {
            locators: RwLock::new(locators.into_iter().collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.locators.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.read().is_empty()
    }

    /// Add another locator. Adding the same locator twice is not prevented.
    pub fn add(&self, locator: Arc<dyn Locator<S>>) {
        self.locators.write().push(locator);
    }

    /// Remove a locator, compared by identity. If it was added more than once
    /// only the first occurrence goes. Returns whether anything was removed.
    pub fn remove(&self, locator: &Arc<dyn Locator<S>>) -> bool {
        let mut locators = self.locators.write();
        match locators.iter().position(|l| Arc::ptr_eq(l, locator)) {
            Some(index) => {
                locators.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Find a service from each locator.
    ///
    /// Locators reporting no services are skipped; any other error stops the
    /// search and is returned. `NoServices` comes back only if every locator
    /// had none.
    pub fn find(&self, object: &[u8]) -> Result<Vec<S>> {
        let locators = self.locators.read();
        let mut services = Vec::with_capacity(locators.len());
        for locator in locators.iter() {
            match locator.find(object) {
                Ok(service) => services.push(service),
                Err(MedleyError::NoServices) => {}
                Err(err) => return Err(err),
            }
        }

        if services.is_empty() {
            return Err(MedleyError::NoServices);
        }

        Ok(services)
    }

    pub fn find_string(&self, object: &str) -> Result<Vec<S>> {
        self.find(object.as_bytes())
    }
}

impl<S: Service> Default for MultiLocator<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// A locator whose implementation can be swapped atomically, e.g. when service
/// discovery or DNS produces a new set of endpoints.
///
/// Every swap bumps a version counter, so callers can tell whether the
/// implementation changed since they last looked.
pub struct UpdatableLocator<S: Service> {
    current: RwLock<Option<Arc<dyn Locator<S>>>>,
    version: AtomicU64,
}

impl<S: Service> UpdatableLocator<S> {
    /// Create a locator with no implementation. Lookups report no services
    /// until one is set.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
            version: AtomicU64::new(0),
        }
    }

    pub fn with_locator(locator: Arc<dyn Locator<S>>) -> Self {
        let ul = Self::new();
        ul.set(locator);
        ul
    }

    /// Replace the implementation, returning the new version.
    pub fn set(&self, locator: Arc<dyn Locator<S>>) -> u64 {
        self.swap(Some(locator))
    }

    /// Turn this locator off. Lookups report no services afterwards.
    pub fn clear(&self) -> u64 {
        self.swap(None)
    }

    /// The current implementation, if any.
    pub fn get(&self) -> Option<Arc<dyn Locator<S>>> {
        self.current.read().clone()
    }

    /// Number of times the implementation has been replaced.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    fn swap(&self, locator: Option<Arc<dyn Locator<S>>>) -> u64 {
        let mut current = self.current.write();
        *current = locator;
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(version, active = current.is_some(), "swapped locator implementation");
        version
    }
}

impl<S: Service> Default for UpdatableLocator<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Service> Locator<S> for UpdatableLocator<S> {
    fn find(&self, object: &[u8]) -> Result<S> {
        // clone the handle so a slow lookup never holds up a swap
        let current = self.current.read().clone();
        match current {
            Some(locator) => locator.find(object),
            None => Err(MedleyError::NoServices),
        }
    }
}

impl<S: Service> Locator<S> for MultiLocator<S> {
    /// The first service found across all locators.
    fn find(&self, object: &[u8]) -> Result<S> {
        let mut services = MultiLocator::find(self, object)?;
        Ok(services.swap_remove(0))
    }
}
