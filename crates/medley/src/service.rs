//! Services: the endpoints objects get hashed to.

use crate::hash_builder::HashBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::io::{self, Write};

/// Some sort of endpoint that objects can be hashed to.
///
/// A service is often a host name or URL, but can be any struct describing an
/// endpoint. It must be usable as a map key, and it must be totally ordered so
/// that two services landing on the same token are always ranked the same way.
pub trait Service: Clone + Eq + Hash + Ord + Send + Sync + 'static {}

impl<T> Service for T where T: Clone + Eq + Hash + Ord + Send + Sync + 'static {}

/// Writes a service's hashable bytes to a sink.
///
/// The bytes a hasher writes are part of the token contract: changing them
/// changes every token computed for the service.
pub type ServiceHasher<S> = fn(&mut dyn Write, &S) -> io::Result<()>;

/// Writes a service's `Display` form.
///
/// This works for any displayable service, but a dedicated hasher is usually
/// cheaper.
pub fn display_service_hasher<S: fmt::Display>(dst: &mut dyn Write, service: &S) -> io::Result<()> {
    write!(dst, "{}", service)
}

/// Writes the raw bytes of a string-like service, such as a host name or URL.
pub fn hash_string_to<S: AsRef<str>>(dst: &mut dyn Write, service: &S) -> io::Result<()> {
    dst.write_all(service.as_ref().as_bytes())
}

/// A URI-based service broken into the parts applications usually need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BasicService {
    /// URI scheme, e.g. `http`.
    #[serde(default)]
    pub scheme: String,
    /// Domain name or IP address.
    pub host: String,
    /// IP port the service listens on.
    #[serde(default)]
    pub port: u16,
    /// URI path.
    #[serde(default)]
    pub path: String,
}

impl BasicService {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

impl fmt::Display for BasicService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}://", self.scheme)?;
        }
        write!(f, "{}", self.host)?;
        if self.port != 0 {
            write!(f, ":{}", self.port)?;
        }
        write!(f, "{}", self.path)
    }
}

/// Hashes a [`BasicService`] as scheme, host, port (big-endian u16), path.
pub fn hash_basic_service_to(dst: &mut dyn Write, service: &BasicService) -> io::Result<()> {
    let mut hb = HashBuilder::new(dst);
    hb.write_str(&service.scheme)
        .write_str(&service.host)
        .write_u16(service.port)
        .write_str(&service.path);
    hb.finish()
}

/// The disposition of one service from an update list.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceUpdate<'a, S, V> {
    pub service: &'a S,
    /// The value already mapped to the service, if it existed.
    pub value: Option<&'a V>,
}

impl<S, V> ServiceUpdate<'_, S, V> {
    pub fn exists(&self) -> bool {
        self.value.is_some()
    }
}

/// A mapping of services onto arbitrary values, used to dedupe services or to
/// keep per-service data such as cached tokens.
#[derive(Debug, Clone)]
pub struct ServiceMap<S, V> {
    entries: HashMap<S, V>,
}

impl<S: Service, V> ServiceMap<S, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, service: &S) -> Option<&V> {
        self.entries.get(service)
    }

    pub fn contains(&self, service: &S) -> bool {
        self.entries.contains_key(service)
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, service: S, value: V) -> Option<V> {
        self.entries.insert(service, value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &V)> {
        self.entries.iter()
    }

    pub fn services(&self) -> impl Iterator<Item = &S> {
        self.entries.keys()
    }

    /// Compare an updated list of services to this map, yielding one
    /// [`ServiceUpdate`] per entry in `services`, in order.
    pub fn update<'a>(&'a self, services: &'a [S]) -> impl Iterator<Item = ServiceUpdate<'a, S, V>> + 'a {
        services.iter().map(move |service| ServiceUpdate {
            service,
            value: self.entries.get(service),
        })
    }
}

impl<S: Service, V> Default for ServiceMap<S, V> {
    fn default() -> Self {
        Self::new()
    }
}
