//! Hash keys: anything that can write its own hashable bytes to a sink.

use crate::algorithm::Algorithm;
use crate::error::Result;
use std::io::{self, Write};

/// Behavior of hash keys.
///
/// A key writes the bytes that identify it to an output sink. When the sink is
/// a hasher those writes cannot fail, but an I/O-backed sink may.
pub trait Key {
    fn write_to(&self, dst: &mut dyn Write) -> io::Result<()>;
}

impl Key for [u8] {
    fn write_to(&self, dst: &mut dyn Write) -> io::Result<()> {
        dst.write_all(self)
    }
}

impl Key for Vec<u8> {
    fn write_to(&self, dst: &mut dyn Write) -> io::Result<()> {
        dst.write_all(self)
    }
}

impl Key for str {
    fn write_to(&self, dst: &mut dyn Write) -> io::Result<()> {
        dst.write_all(self.as_bytes())
    }
}

impl Key for String {
    fn write_to(&self, dst: &mut dyn Write) -> io::Result<()> {
        dst.write_all(self.as_bytes())
    }
}

impl<K: Key + ?Sized> Key for &K {
    fn write_to(&self, dst: &mut dyn Write) -> io::Result<()> {
        (**self).write_to(dst)
    }
}

/// Compute a single key's hash with a freshly constructed hasher.
///
/// Code that hashes many keys should keep and reset one hasher instead.
pub fn compute_hash<K: Key + ?Sized>(key: &K, algorithm: &Algorithm) -> Result<u64> {
    let mut hasher = algorithm.new64();
    key.write_to(&mut hasher)?;
    Ok(hasher.sum64())
}
