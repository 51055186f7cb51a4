//! # Medley Consistent
//!
//! Consistent hashing with virtual nodes. Services are placed on a 64-bit
//! circle at `vnodes` points each; an object goes to the service owning the
//! first point at or clockwise from the object's hash.
//!
//! Two flavors are provided:
//!
//! - [`Ring`], an immutable ring built by a [`Builder`]. A changed service
//!   set yields a new ring through [`Ring::update`], which only hashes the
//!   services that are new.
//! - [`ConsistentHash`], a ring of [`medley::Node`]s mutated in place and
//!   safe for concurrent lookups while it changes.
//!
//! Token values are compatible with github.com/billhathaway/consistentHash.
//!
//! ```
//! use medley_consistent::{strings, Ring};
//!
//! let ring = strings(["service1", "service2", "service3"]).build().unwrap();
//! assert_eq!(ring.find_str("test value").unwrap(), "service2");
//!
//! let (updated, changed) = Ring::update(&ring, &["service1", "service3"]).unwrap();
//! assert!(changed);
//! assert_eq!(updated.len(), 2);
//! ```

pub mod assigner;
pub mod bench;
pub mod builder;
pub mod hash;
pub mod hasher;
pub mod ring;
pub mod ring_store;

pub use assigner::TokenAssigner;
pub use bench::{BenchConfig, BenchResults};
pub use builder::{basic_services, services, strings, Builder};
pub use hash::{Config, ConsistentHash, DEFAULT_VNODES};
pub use hasher::TokenHasher;
pub use ring::Ring;
pub use ring_store::{HashEntry, RingStore};
