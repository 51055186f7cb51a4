//! A fluent builder for hashing composite values such as structs.
//!
//! Multi-byte integers are written most-significant byte first and floats as
//! their IEEE-754 bit pattern, so the byte stream for a value is the same on
//! every platform. The first write error is kept and every later write is
//! skipped, which lets a whole chain be checked once at the end.

use crate::algorithm::Hash64;
use std::io::{self, Write};

/// Fluent builder that serializes fields into a byte sink.
///
/// # Example
///
/// ```
/// use medley::HashBuilder;
///
/// let mut buffer = Vec::new();
/// let mut hb = HashBuilder::new(&mut buffer);
/// hb.write_str("http").write_u16(8080);
/// hb.finish().unwrap();
/// assert_eq!(buffer, b"http\x1f\x90");
/// ```
pub struct HashBuilder<W> {
    dst: W,
    err: Option<io::Error>,
}

impl<W: Write> HashBuilder<W> {
    pub fn new(dst: W) -> Self {
        Self { dst, err: None }
    }

    /// Swap in a new sink and clear any recorded error, so one builder can
    /// serve many hashes. The previous sink is returned.
    pub fn reuse(&mut self, dst: W) -> W {
        self.err = None;
        std::mem::replace(&mut self.dst, dst)
    }

    /// The first error that occurred in any chain on this builder.
    pub fn err(&self) -> Option<&io::Error> {
        self.err.as_ref()
    }

    /// Consume the builder, reporting the first error if there was one.
    pub fn finish(self) -> io::Result<()> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Consume the builder and hand back its sink.
    pub fn into_inner(self) -> W {
        self.dst
    }

    pub fn write(&mut self, v: &[u8]) -> &mut Self {
        if self.err.is_none() {
            if let Err(err) = self.dst.write_all(v) {
                self.err = Some(err);
            }
        }

        self
    }

    pub fn write_str(&mut self, v: &str) -> &mut Self {
        if v.is_empty() {
            return self;
        }

        self.write(v.as_bytes())
    }

    pub fn write_u8(&mut self, v: u8) -> &mut Self {
        self.write(&[v])
    }

    pub fn write_u16(&mut self, v: u16) -> &mut Self {
        self.write(&v.to_be_bytes())
    }

    pub fn write_u32(&mut self, v: u32) -> &mut Self {
        self.write(&v.to_be_bytes())
    }

    pub fn write_u64(&mut self, v: u64) -> &mut Self {
        self.write(&v.to_be_bytes())
    }

    pub fn write_f32(&mut self, v: f32) -> &mut Self {
        self.write_u32(v.to_bits())
    }

    pub fn write_f64(&mut self, v: f64) -> &mut Self {
        self.write_u64(v.to_bits())
    }
}

impl HashBuilder<Box<dyn Hash64>> {
    /// The digest of everything written since the last reset.
    pub fn sum64(&self) -> u64 {
        self.dst.sum64()
    }

    /// Reset the underlying hasher. The recorded error, if any, is kept.
    pub fn reset(&mut self) {
        self.dst.reset();
    }
}
