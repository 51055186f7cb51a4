//! Immutable consistent hash rings.
//!
//! A [`Ring`] is a built, queryable snapshot. It is never mutated: a new
//! service set produces a new ring via [`Ring::update`], which reuses the
//! cached tokens of every service that survives. Rings are handed around as
//! `Arc<Ring<S>>` and are safe to share across threads without locking;
//! publishing a new ring to readers is the job of something like
//! [`medley::UpdatableLocator`].

use crate::hasher::TokenHasher;
use crate::ring_store::RingStore;
use medley::{Algorithm, Locator, Result, Service, ServiceMap};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// A consistent hash ring over services of type `S`.
pub struct Ring<S: Service> {
    hasher: TokenHasher<S>,
    /// Each service's own tokens, kept so updates can skip rehashing them.
    cache: ServiceMap<S, Vec<u64>>,
    store: RingStore<S>,
}

impl<S: Service> Ring<S> {
    /// Assemble a ring from per-service tokens.
    pub(crate) fn from_cache(hasher: TokenHasher<S>, cache: ServiceMap<S, Vec<u64>>) -> Self {
        let mut store = RingStore::new();
        store.grow(hasher.ring_size(cache.len()));
        for (service, tokens) in cache.iter() {
            for &token in tokens {
                store.add(service.clone(), token);
            }
        }

        store.sort();
        Self {
            hasher,
            cache,
            store,
        }
    }

    /// Locate the service for an object by walking clockwise from its hash.
    pub fn find(&self, object: &[u8]) -> Result<S> {
        let token = self.hasher.sum64(object);
        self.store.closest(token).cloned()
    }

    pub fn find_str(&self, object: &str) -> Result<S> {
        self.find(object.as_bytes())
    }

    /// Number of services in this ring.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Total number of tokens on the ring.
    pub fn token_count(&self) -> usize {
        self.store.len()
    }

    pub fn vnodes(&self) -> usize {
        self.hasher.vnodes()
    }

    pub fn algorithm(&self) -> &Algorithm {
        self.hasher.algorithm()
    }

    pub fn contains(&self, service: &S) -> bool {
        self.cache.contains(service)
    }

    /// The services in this ring, in no particular order.
    pub fn services(&self) -> impl Iterator<Item = &S> {
        self.cache.services()
    }

    /// The tokens computed for one service, in index order.
    pub fn tokens_of(&self, service: &S) -> Option<&[u64]> {
        self.cache.get(service).map(Vec::as_slice)
    }

    pub fn store(&self) -> &RingStore<S> {
        &self.store
    }

    /// Produce a ring holding exactly `services`, reusing `current`'s tokens
    /// for every service it already has.
    ///
    /// The returned flag says whether anything changed. When nothing did, the
    /// returned handle is `current` itself, so `Arc::ptr_eq` detects a no-op.
    /// Only new services are hashed, so the cost of a membership change is
    /// proportional to the number of changed services.
    pub fn update(current: &Arc<Self>, services: &[S]) -> Result<(Arc<Self>, bool)> {
        let mut seen = HashSet::with_capacity(services.len());
        let mut reused = 0;
        let mut fresh = 0;
        for update in current.cache.update(services) {
            if !seen.insert(update.service) {
                continue;
            }

            if update.exists() {
                reused += 1;
            } else {
                fresh += 1;
            }
        }

        if fresh == 0 && reused == current.cache.len() {
            return Ok((Arc::clone(current), false));
        }

        let hasher = current.hasher.clone();
        let mut assigner = hasher.assigner();
        let mut cache = ServiceMap::with_capacity(seen.len());
        for update in current.cache.update(services) {
            if cache.contains(update.service) {
                continue;
            }

            let tokens = match update.value {
                Some(tokens) => tokens.clone(),
                None => hasher.service_tokens(&mut assigner, update.service)?,
            };
            cache.insert(update.service.clone(), tokens);
        }

        debug!(
            reused,
            added = fresh,
            dropped = current.cache.len() - reused,
            "updated consistent hash ring"
        );
        Ok((Arc::new(Self::from_cache(hasher, cache)), true))
    }
}

impl<S: Service> Locator<S> for Ring<S> {
    fn find(&self, object: &[u8]) -> Result<S> {
        Ring::find(self, object)
    }
}

impl<S: Service + std::fmt::Debug> std::fmt::Debug for Ring<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ring")
            .field("services", &self.cache.len())
            .field("vnodes", &self.hasher.vnodes())
            .field("tokens", &self.store.len())
            .finish()
    }
}
