//! Fluent construction of [`Ring`]s.

use crate::hash::DEFAULT_VNODES;
use crate::hasher::TokenHasher;
use crate::ring::Ring;
use medley::{
    display_service_hasher, hash_basic_service_to, hash_string_to, Algorithm, BasicService, Result,
    Service, ServiceHasher, ServiceMap,
};
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

/// Accumulates a set of services and builds a brand new [`Ring`] from them.
///
/// Start a chain with [`strings`], [`services`] or [`basic_services`], or with
/// [`Builder::new`] for a custom service hasher. To derive a ring from an
/// existing one, use [`Ring::update`] instead, which reuses tokens.
///
/// ```
/// use medley_consistent::strings;
///
/// let ring = strings(["service1", "service2", "service3"]).build().unwrap();
/// assert_eq!(ring.find_str("test value").unwrap(), "service2");
/// ```
pub struct Builder<S: Service> {
    vnodes: usize,
    algorithm: Algorithm,
    service_hasher: ServiceHasher<S>,
    services: ServiceMap<S, ()>,
}

impl<S: Service> Builder<S> {
    /// Create an empty builder that serializes services with `service_hasher`.
    pub fn new(service_hasher: ServiceHasher<S>) -> Self {
        Self {
            vnodes: DEFAULT_VNODES,
            algorithm: Algorithm::default(),
            service_hasher,
            services: ServiceMap::new(),
        }
    }

    /// Tokens generated per service. Values below 1 select [`DEFAULT_VNODES`].
    pub fn vnodes(mut self, vnodes: usize) -> Self {
        self.vnodes = vnodes;
        self
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Replace the bytes used to hash each service. A dedicated hasher is
    /// usually faster than formatting the service.
    pub fn service_hasher(mut self, service_hasher: ServiceHasher<S>) -> Self {
        self.service_hasher = service_hasher;
        self
    }

    /// Add services to the ring. Repeated calls are cumulative and duplicates
    /// are ignored.
    pub fn services<I>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        for service in services {
            self.services.insert(service, ());
        }
        self
    }

    fn hasher(&self) -> TokenHasher<S> {
        let vnodes = if self.vnodes < 1 {
            DEFAULT_VNODES
        } else {
            self.vnodes
        };

        TokenHasher::new(vnodes, self.algorithm, self.service_hasher)
    }

    /// Build a new ring from the accumulated services.
    ///
    /// The builder's services are reset afterwards, so the builder can be
    /// reused with a fresh set. Fails only if the service hasher does.
    pub fn build(&mut self) -> Result<Arc<Ring<S>>> {
        let hasher = self.hasher();
        let services = std::mem::take(&mut self.services);

        let mut assigner = hasher.assigner();
        let mut cache = ServiceMap::with_capacity(services.len());
        for service in services.services() {
            let tokens = hasher.service_tokens(&mut assigner, service)?;
            cache.insert(service.clone(), tokens);
        }

        debug!(
            services = cache.len(),
            vnodes = hasher.vnodes(),
            "built consistent hash ring"
        );
        Ok(Arc::new(Ring::from_cache(hasher, cache)))
    }
}

/// Start a chain for string-like services, hashed by their raw bytes.
pub fn strings<S, I>(services: I) -> Builder<S>
where
    S: Service + AsRef<str>,
    I: IntoIterator<Item = S>,
{
    Builder::new(hash_string_to::<S>).services(services)
}

/// Start a chain for any displayable services, hashed by their `Display`
/// form.
pub fn services<S, I>(services: I) -> Builder<S>
where
    S: Service + Display,
    I: IntoIterator<Item = S>,
{
    Builder::new(display_service_hasher::<S>).services(services)
}

/// Start a chain for [`BasicService`]s.
pub fn basic_services<I>(services: I) -> Builder<BasicService>
where
    I: IntoIterator<Item = BasicService>,
{
    Builder::new(hash_basic_service_to as ServiceHasher<BasicService>).services(services)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    const SERVICES: [&str; 3] = ["service1", "service2", "service3"];

    #[test]
    fn test_build_known_placement() {
        let ring = strings(SERVICES).vnodes(200).build().unwrap();
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.token_count(), 600);
        assert!(ring.store().is_sorted());

        assert_eq!(ring.find_str("test value").unwrap(), "service2");
        assert_eq!(ring.find_str("alpha").unwrap(), "service3");
        assert_eq!(ring.find_str("beta").unwrap(), "service1");
        assert_eq!(ring.find_str("gamma").unwrap(), "service1");
        assert_eq!(ring.find_str("delta").unwrap(), "service3");
        assert_eq!(ring.find_str("user:123").unwrap(), "service2");
    }

    #[test]
    fn test_build_fnv() {
        let ring = strings(SERVICES)
            .algorithm(Algorithm::fnv())
            .build()
            .unwrap();
        assert_eq!(ring.find_str("test value").unwrap(), "service2");
    }

    #[test]
    fn test_wrap_around_goes_to_smallest_token() {
        let ring = strings(SERVICES).build().unwrap();
        let entries = ring.store().entries();
        let first = &entries[0];
        let last = &entries[entries.len() - 1];
        assert_eq!(first.value, 0x0034c3badb80d59e);
        assert_eq!(first.node, "service3");
        assert_eq!(last.value, 0xff5eb9e465bd12c1);
        assert_eq!(last.node, "service1");

        // hashes past the largest token
        assert_eq!(ring.algorithm().sum64_str("wrap-452"), 0xff648604d8a8a2ac);
        assert_eq!(ring.find_str("wrap-452").unwrap(), "service3");
    }

    #[test]
    fn test_display_and_string_hashers_agree() {
        let by_bytes = strings(SERVICES).vnodes(20).build().unwrap();
        let by_display = services(SERVICES).vnodes(20).build().unwrap();
        for service in SERVICES {
            assert_eq!(by_bytes.tokens_of(&service), by_display.tokens_of(&service));
        }
    }

    #[test]
    fn test_build_dedupes_and_resets() {
        let mut builder = strings(["a", "b", "a"]).services(["b", "c"]).vnodes(10);
        let ring = builder.build().unwrap();
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.token_count(), 30);

        let empty = builder.build().unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.vnodes(), 10);
        assert!(empty.find_str("x").unwrap_err().is_no_services());
    }

    #[test]
    fn test_nonpositive_vnodes_use_default() {
        let ring = strings(["a"]).vnodes(0).build().unwrap();
        assert_eq!(ring.vnodes(), DEFAULT_VNODES);
        assert_eq!(ring.token_count(), DEFAULT_VNODES);
    }

    #[test]
    fn test_basic_services() {
        let service = BasicService::new("service2.net")
            .with_scheme("http")
            .with_port(8080);
        let other = BasicService::new("service1.net")
            .with_scheme("http")
            .with_port(8080);

        let ring = basic_services([service.clone(), other.clone()])
            .vnodes(2)
            .build()
            .unwrap();
        assert_eq!(
            ring.tokens_of(&service).unwrap().to_vec(),
            vec![0x0f46392551c7a00b_u64, 0xd055741ddbbc5451]
        );

        let found = ring.find_str("anything").unwrap();
        assert!(found == service || found == other);
    }

    #[test]
    fn test_update_reuses_tokens() {
        let ring = strings(SERVICES.map(String::from)).build().unwrap();
        let targets: Vec<String> = ["service1", "service2", "service3", "new1"]
            .into_iter()
            .map(String::from)
            .collect();

        let (updated, changed) = Ring::update(&ring, &targets).unwrap();
        assert!(changed);
        assert!(!Arc::ptr_eq(&ring, &updated));
        assert_eq!(updated.len(), 4);
        assert_eq!(updated.token_count(), 800);
        assert!(updated.store().is_sorted());

        for service in &targets[..3] {
            let before: HashSet<u64> = ring.tokens_of(service).unwrap().iter().copied().collect();
            let after: HashSet<u64> = updated.tokens_of(service).unwrap().iter().copied().collect();
            assert_eq!(before, after);
        }

        let fresh = strings(["new1".to_string()]).build().unwrap();
        assert_eq!(
            updated.tokens_of(&targets[3]),
            fresh.tokens_of(&targets[3])
        );

        assert_eq!(updated.find_str("test value").unwrap(), "new1");
        assert_eq!(updated.find_str("alpha").unwrap(), "service3");
        assert_eq!(updated.find_str("user:123").unwrap(), "service2");
    }

    #[test]
    fn test_update_matches_fresh_build() {
        let ring = strings(SERVICES.map(String::from)).build().unwrap();
        let targets = vec!["service1".to_string(), "service3".to_string()];
        let (updated, changed) = Ring::update(&ring, &targets).unwrap();
        assert!(changed);

        let rebuilt = strings(targets.clone()).build().unwrap();
        assert_eq!(updated.store().entries(), rebuilt.store().entries());
        assert_eq!(updated.find_str("test value").unwrap(), "service1");
        assert_eq!(updated.find_str("user:123").unwrap(), "service3");
    }

    #[test]
    fn test_distribution() {
        let ring = strings(SERVICES).build().unwrap();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for i in 0..10_000 {
            let service = ring.find_str(&format!("object-{}", i)).unwrap();
            *counts.entry(service).or_default() += 1;
        }

        assert_eq!(counts.len(), 3);
        for (service, count) in counts {
            assert!(
                (2_500..=4_167).contains(&count),
                "{} got {} of 10000 objects",
                service,
                count
            );
        }
    }
}
