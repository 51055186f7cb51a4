//! Medley Prelude: convenient imports for common usage.
//!
//! ```rust
//! use medley::prelude::*;
//! ```

// Algorithms and keys
pub use crate::algorithm::{
    find_algorithm, get_algorithm, Algorithm, Hash64, ALGORITHM_FNV, ALGORITHM_MURMUR3,
};
pub use crate::key::{compute_hash, Key};

// Nodes and services
pub use crate::node::{Node, NodeSet};
pub use crate::service::{
    display_service_hasher, hash_basic_service_to, hash_string_to, BasicService, Service,
    ServiceHasher, ServiceMap,
};
pub use crate::hash_builder::HashBuilder;

// Locators
pub use crate::locator::{find_string, Locator, MultiLocator, UpdatableLocator};

// Errors
pub use crate::error::{MedleyError, Result};
