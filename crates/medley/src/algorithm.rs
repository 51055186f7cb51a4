//! Pluggable 64-bit hash algorithms and the name registry that resolves them.
//!
//! An [`Algorithm`] is a pair of plain function pointers: a constructor for a
//! resettable streaming hasher, and an optional one-shot function that hashes
//! a whole byte slice at once. Both are `Copy`, so an algorithm can be resolved
//! once at configuration time and handed to every ring that needs it.
//!
//! Two algorithms are built in:
//!
//! - `"murmur3"` (also the default, selected by the empty name): the first
//!   64 bits of MurmurHash3 x64-128 with a zero seed.
//! - `"fnv"`: 64-bit FNV-1a.

use crate::error::{MedleyError, Result};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hasher;
use std::io::{self, Write};

/// Registry name of the murmur3 algorithm.
pub const ALGORITHM_MURMUR3: &str = "murmur3";

/// Registry name of the FNV-1a algorithm.
pub const ALGORITHM_FNV: &str = "fnv";

/// A resettable, streaming 64-bit hasher.
///
/// Writes never fail. A boxed `Hash64` implements [`std::io::Write`], so it can
/// be handed to anything that serializes into a byte sink.
pub trait Hash64: Send {
    /// Feeds more bytes into the running digest.
    fn update(&mut self, bytes: &[u8]);

    /// Returns the digest of everything written since the last reset.
    fn sum64(&self) -> u64;

    /// Returns this hasher to its freshly constructed state.
    fn reset(&mut self);
}

impl Write for dyn Hash64 + '_ {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Hash64 for mur3::Hasher128 {
    fn update(&mut self, bytes: &[u8]) {
        Hasher::write(self, bytes);
    }

    fn sum64(&self) -> u64 {
        self.finish128().0
    }

    fn reset(&mut self) {
        *self = mur3::Hasher128::with_seed(0);
    }
}

impl Hash64 for fnv::FnvHasher {
    fn update(&mut self, bytes: &[u8]) {
        Hasher::write(self, bytes);
    }

    fn sum64(&self) -> u64 {
        self.finish()
    }

    fn reset(&mut self) {
        *self = fnv::FnvHasher::default();
    }
}

/// Constructor for a streaming hasher.
pub type New64 = fn() -> Box<dyn Hash64>;

/// One-shot hash over a complete byte slice.
pub type Sum64 = fn(&[u8]) -> u64;

/// A hash algorithm medley can use to place services and keys on a ring.
#[derive(Clone, Copy)]
pub struct Algorithm {
    new64: New64,
    sum64: Option<Sum64>,
}

impl Algorithm {
    /// Create an algorithm from a streaming hasher constructor alone.
    pub const fn new(new64: New64) -> Self {
        Self { new64, sum64: None }
    }

    /// Create an algorithm with a dedicated one-shot function, which is
    /// usually cheaper than building a streaming hasher for a single slice.
    pub const fn with_sum64(new64: New64, sum64: Sum64) -> Self {
        Self {
            new64,
            sum64: Some(sum64),
        }
    }

    /// MurmurHash3 x64-128 truncated to its first 64 bits, seed 0.
    pub fn murmur3() -> Self {
        Self::with_sum64(new_murmur3, sum64_murmur3)
    }

    /// 64-bit FNV-1a.
    pub fn fnv() -> Self {
        Self::new(new_fnv)
    }

    /// Construct a fresh streaming hasher.
    pub fn new64(&self) -> Box<dyn Hash64> {
        (self.new64)()
    }

    /// Whether this algorithm carries a one-shot function.
    pub fn has_sum64(&self) -> bool {
        self.sum64.is_some()
    }

    /// Hash a byte slice, using the one-shot function when there is one.
    pub fn sum64_bytes(&self, v: &[u8]) -> u64 {
        match self.sum64 {
            Some(sum64) => sum64(v),
            None => {
                let mut hasher = self.new64();
                hasher.update(v);
                hasher.sum64()
            }
        }
    }

    /// Hash the bytes of a string without copying them.
    pub fn sum64_str(&self, v: &str) -> u64 {
        self.sum64_bytes(v.as_bytes())
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::murmur3()
    }
}

impl fmt::Debug for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Algorithm")
            .field("sum64", &self.sum64.is_some())
            .finish_non_exhaustive()
    }
}

fn new_murmur3() -> Box<dyn Hash64> {
    Box::new(mur3::Hasher128::with_seed(0))
}

fn sum64_murmur3(v: &[u8]) -> u64 {
    mur3::murmurhash3_x64_128(v, 0).0
}

fn new_fnv() -> Box<dyn Hash64> {
    Box::new(fnv::FnvHasher::default())
}

/// Resolve one of the built-in algorithms by name.
///
/// The empty name selects the default algorithm.
pub fn get_algorithm(name: &str) -> Result<Algorithm> {
    match name {
        "" | ALGORITHM_MURMUR3 => Ok(Algorithm::murmur3()),
        ALGORITHM_FNV => Ok(Algorithm::fnv()),
        other => Err(MedleyError::unknown_algorithm(other)),
    }
}

/// Resolve an algorithm by name, consulting the built-ins first and then the
/// caller-supplied extensions.
pub fn find_algorithm(name: &str, extensions: &HashMap<String, Algorithm>) -> Result<Algorithm> {
    match get_algorithm(name) {
        Ok(algorithm) => Ok(algorithm),
        Err(err) => extensions.get(name).copied().ok_or(err),
    }
}
