//! Virtual-node token generation.
//!
//! A node's tokens are produced by hashing `"<index>=<node-bytes>"` for
//! index `0, 1, 2, ...`, with the index written in decimal ASCII. This byte
//! sequence is a compatibility contract with the consistentHash library at
//! github.com/billhathaway/consistentHash: changing the separator, the index
//! encoding or the base changes every token value.

use medley::{Algorithm, Hash64, Key};
use std::io;

/// Written between the index and the node bytes.
const SEPARATOR: &[u8] = b"=";

/// Generates the sequence of token values for one node at a time.
///
/// An assigner is an endless iterator over the current node's tokens; take
/// as many as there are virtual nodes. Call [`reset`](Self::reset) to start
/// over with another node.
///
/// ```
/// use medley::Algorithm;
/// use medley_consistent::TokenAssigner;
///
/// let mut assigner = TokenAssigner::new(&Algorithm::murmur3());
/// assigner.reset(b"test1");
/// let tokens: Vec<u64> = assigner.by_ref().take(3).collect();
/// assert_eq!(tokens[0], 0xeabc7a6d3a81647c);
/// ```
pub struct TokenAssigner {
    hasher: Box<dyn Hash64>,
    base: Vec<u8>,
    index: u64,
}

impl TokenAssigner {
    /// Create an assigner set to the empty node.
    pub fn new(algorithm: &Algorithm) -> Self {
        Self {
            hasher: algorithm.new64(),
            base: Vec::with_capacity(64),
            index: 0,
        }
    }

    /// Begin a new token sequence for the node with the given bytes.
    pub fn reset(&mut self, base: &[u8]) {
        self.base.clear();
        self.base.extend_from_slice(base);
        self.index = 0;
    }

    /// Begin a new token sequence for a key that serializes itself.
    pub fn reset_key<K: Key + ?Sized>(&mut self, key: &K) -> io::Result<()> {
        self.base.clear();
        self.index = 0;
        key.write_to(&mut self.base)
    }

    /// The index the next token will be computed for.
    pub fn index(&self) -> u64 {
        self.index
    }

    fn next_token(&mut self) -> u64 {
        let mut digits = [0u8; 20];
        let prefix = decimal(self.index, &mut digits);
        self.index += 1;

        self.hasher.reset();
        self.hasher.update(prefix);
        self.hasher.update(SEPARATOR);
        self.hasher.update(&self.base);
        self.hasher.sum64()
    }
}

impl Iterator for TokenAssigner {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_token())
    }
}

/// Formats `v` in decimal ASCII into the tail of `buf`, returning the digits.
fn decimal(mut v: u64, buf: &mut [u8; 20]) -> &[u8] {
    let mut pos = buf.len();
    loop {
        pos -= 1;
        buf[pos] = b'0' + (v % 10) as u8;
        v /= 10;
        if v == 0 {
            break;
        }
    }

    &buf[pos..]
}
