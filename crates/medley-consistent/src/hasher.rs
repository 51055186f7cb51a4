//! Low-level hashing shared by ring building and ring lookups.

use crate::assigner::TokenAssigner;
use medley::{Algorithm, Result, Service, ServiceHasher};

/// Couples an algorithm, a vnode count and a service serializer.
pub struct TokenHasher<S> {
    vnodes: usize,
    algorithm: Algorithm,
    service_hasher: ServiceHasher<S>,
}

impl<S: Service> TokenHasher<S> {
    pub fn new(vnodes: usize, algorithm: Algorithm, service_hasher: ServiceHasher<S>) -> Self {
        Self {
            vnodes,
            algorithm,
            service_hasher,
        }
    }

    pub fn vnodes(&self) -> usize {
        self.vnodes
    }

    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// An assigner using this hasher's algorithm.
    pub fn assigner(&self) -> TokenAssigner {
        TokenAssigner::new(&self.algorithm)
    }

    /// Total ring entries needed for `service_count` services.
    pub fn ring_size(&self, service_count: usize) -> usize {
        self.vnodes * service_count
    }

    /// The 64-bit hash of a raw lookup key.
    pub fn sum64(&self, object: &[u8]) -> u64 {
        self.algorithm.sum64_bytes(object)
    }

    /// The bytes every token of `service` is derived from.
    pub fn base(&self, service: &S) -> Result<Vec<u8>> {
        let mut base = Vec::new();
        (self.service_hasher)(&mut base, service)?;
        Ok(base)
    }

    /// Compute all of a service's tokens.
    pub fn service_tokens(&self, assigner: &mut TokenAssigner, service: &S) -> Result<Vec<u64>> {
        let base = self.base(service)?;
        assigner.reset(&base);
        Ok(assigner.by_ref().take(self.vnodes).collect())
    }
}

impl<S> Clone for TokenHasher<S> {
    fn clone(&self) -> Self {
        Self {
            vnodes: self.vnodes,
            algorithm: self.algorithm,
            service_hasher: self.service_hasher,
        }
    }
}
