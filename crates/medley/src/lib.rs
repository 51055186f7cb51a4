//! # Medley
//!
//! Core types for locating a service endpoint by hashing an input object.
//!
//! This crate defines the vocabulary shared by every medley locator:
//!
//! - **Algorithm**: a pluggable 64-bit hash plus the registry resolving names to it
//! - **Key**: values that write their own hashable bytes
//! - **Node / NodeSet**: string identifiers and the set tracking ring membership
//! - **Service**: generic endpoints, with hashers that serialize them to bytes
//! - **HashBuilder**: a fluent, big-endian serializer for composite services
//! - **Locator**: the lookup interface, plus aggregating and swappable locators
//!
//! The consistent hash ring itself lives in `medley-consistent`.
//!
//! ## Quick Start
//!
//! ```rust
//! use medley::prelude::*;
//!
//! let alg = get_algorithm(ALGORITHM_MURMUR3).unwrap();
//! let token = compute_hash("user:123", &alg).unwrap();
//! assert_eq!(token, alg.sum64_str("user:123"));
//! ```

pub mod algorithm;
pub mod error;
pub mod hash_builder;
pub mod key;
pub mod locator;
pub mod node;
pub mod prelude;
pub mod service;

pub use algorithm::{find_algorithm, get_algorithm, Algorithm, Hash64, ALGORITHM_FNV, ALGORITHM_MURMUR3};
pub use error::{MedleyError, Result};
pub use hash_builder::HashBuilder;
pub use key::{compute_hash, Key};
pub use locator::{find_string, Locator, MultiLocator, UpdatableLocator};
pub use node::{Node, NodeSet};
pub use service::{
    display_service_hasher, hash_basic_service_to, hash_string_to, BasicService, Service,
    ServiceHasher, ServiceMap, ServiceUpdate,
};
