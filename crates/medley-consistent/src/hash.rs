//! A mutable consistent hash, safe for concurrent lookups and updates.
//!
//! [`ConsistentHash`] is backward compatible with
//! github.com/billhathaway/consistentHash: for the same nodes, vnode count
//! and algorithm it places keys on the same nodes.
//!
//! Two locks guard it. The update lock serializes structural changes
//! (`add`, `remove`, `rehash`) against each other and owns the token
//! assigner. The state lock is a read/write lock over the node set and the
//! ring; the expensive precomputation of every change runs under its read
//! side, so lookups keep flowing, and only the final splice and sort hold
//! the write side. The update lock is always taken first.

use crate::assigner::TokenAssigner;
use crate::ring_store::RingStore;
use medley::{compute_hash, find_algorithm, Algorithm, Key, Locator, MedleyError, Node, NodeSet, Result};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Virtual nodes per node when configuration doesn't say.
pub const DEFAULT_VNODES: usize = 200;

/// Configuration for a [`ConsistentHash`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Name of the hash algorithm. Empty selects the default, murmur3.
    #[serde(default)]
    pub algorithm: String,

    /// Virtual nodes per node. Zero selects [`DEFAULT_VNODES`].
    #[serde(default)]
    pub vnodes: usize,

    /// Algorithms beyond the built-ins that `algorithm` may name.
    #[serde(skip)]
    pub extensions: HashMap<String, Algorithm>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_algorithm(mut self, name: impl Into<String>) -> Self {
        self.algorithm = name.into();
        self
    }

    pub fn with_vnodes(mut self, vnodes: usize) -> Self {
        self.vnodes = vnodes;
        self
    }

    /// Register an extra algorithm under `name`.
    pub fn with_extension(mut self, name: impl Into<String>, algorithm: Algorithm) -> Self {
        self.extensions.insert(name.into(), algorithm);
        self
    }
}

#[derive(Default)]
struct HashState {
    nodes: NodeSet,
    ring: RingStore<Node>,
}

/// A consistent hash over [`Node`]s that can be changed in place.
pub struct ConsistentHash {
    algorithm: Algorithm,
    vnodes: usize,
    /// Held for the whole of every structural change.
    update_lock: Mutex<TokenAssigner>,
    state: RwLock<HashState>,
}

impl ConsistentHash {
    /// Create an empty hash. Fails if the configured algorithm is unknown.
    pub fn new(config: Config) -> Result<Self> {
        let algorithm = find_algorithm(&config.algorithm, &config.extensions)?;
        let vnodes = if config.vnodes < 1 {
            DEFAULT_VNODES
        } else {
            config.vnodes
        };

        debug!(algorithm = %config.algorithm, vnodes, "created consistent hash");
        Ok(Self {
            algorithm,
            vnodes,
            update_lock: Mutex::new(TokenAssigner::new(&algorithm)),
            state: RwLock::new(HashState::default()),
        })
    }

    /// Number of nodes, not the number of tokens on the ring.
    pub fn len(&self) -> usize {
        self.state.read().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().nodes.is_empty()
    }

    pub fn vnodes(&self) -> usize {
        self.vnodes
    }

    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// Total size of the ring, `len() * vnodes()`.
    pub fn token_count(&self) -> usize {
        self.state.read().ring.len()
    }

    /// A sorted snapshot of the current nodes.
    pub fn nodes(&self) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.state.read().nodes.iter().cloned().collect();
        nodes.sort();
        nodes
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.state.read().nodes.contains(node)
    }

    /// Find the node closest to a key, walking the ring clockwise.
    pub fn get<K: Key + ?Sized>(&self, key: &K) -> Result<Node> {
        let state = self.state.read();
        if state.ring.is_empty() {
            return Err(MedleyError::NoServices);
        }

        let token = compute_hash(key, &self.algorithm)?;
        state.ring.closest(token).cloned()
    }

    /// Insert nodes along with their virtual nodes, returning how many
    /// distinct nodes were new. Nodes already present are left alone.
    ///
    /// `nodes` is reordered in place: present nodes first, new ones after.
    pub fn add(&self, nodes: &mut [Node]) -> usize {
        let mut assigner = self.update_lock.lock();
        let (_, missing) = self.state.read().nodes.filter(nodes);
        if missing.is_empty() {
            return 0;
        }

        let fresh: NodeSet = missing.iter().collect();
        let mut state = self.state.write();
        let state = &mut *state;
        self.assign(&mut assigner, &mut state.ring, &fresh);
        let added = state.nodes.add_all(fresh);
        state.ring.sort();

        debug!(added, nodes = state.nodes.len(), "added nodes to consistent hash");
        added
    }

    /// Delete nodes and their virtual nodes, returning how many distinct
    /// nodes were actually removed.
    ///
    /// `nodes` is reordered in place: present nodes first, unknown ones after.
    pub fn remove(&self, nodes: &mut [Node]) -> usize {
        let _update = self.update_lock.lock();
        let (present, _) = self.state.read().nodes.filter(nodes);
        if present.is_empty() {
            return 0;
        }

        let doomed: NodeSet = present.iter().collect();
        let mut state = self.state.write();
        let removed = state.nodes.remove_all(&doomed);
        state.ring.remove_if(|n| doomed.contains(n));
        state.ring.sort();

        debug!(removed, nodes = state.nodes.len(), "removed nodes from consistent hash");
        removed
    }

    /// Make `nodes` the exact membership of this hash, returning the counts
    /// of nodes added and removed. Unlike `add` and `remove` this leaves
    /// `nodes` untouched.
    pub fn rehash(&self, nodes: &[Node]) -> (usize, usize) {
        let mut assigner = self.update_lock.lock();
        let target: NodeSet = nodes.iter().collect();
        let (to_add, to_remove) = {
            let state = self.state.read();
            let to_add: NodeSet = target.iter().filter(|n| !state.nodes.contains(n)).collect();
            let to_remove: NodeSet = state.nodes.iter().filter(|n| !target.contains(n)).collect();
            (to_add, to_remove)
        };

        let (added, removed) = (to_add.len(), to_remove.len());
        if added == 0 && removed == 0 {
            return (0, 0);
        }

        let mut state = self.state.write();
        let state = &mut *state;
        if removed > 0 {
            state.ring.remove_if(|n| to_remove.contains(n));
        }
        if added > 0 {
            self.assign(&mut assigner, &mut state.ring, &to_add);
        }

        state.nodes = target;
        state.ring.sort();

        debug!(added, removed, nodes = state.nodes.len(), "rehashed consistent hash");
        (added, removed)
    }

    /// Append every token of `nodes` to `ring` without sorting it.
    fn assign(&self, assigner: &mut TokenAssigner, ring: &mut RingStore<Node>, nodes: &NodeSet) {
        ring.grow(self.vnodes * nodes.len());
        for node in nodes {
            assigner.reset(node.as_bytes());
            for token in assigner.by_ref().take(self.vnodes) {
                ring.add(node.clone(), token);
            }
        }
    }
}

impl Locator<Node> for ConsistentHash {
    fn find(&self, object: &[u8]) -> Result<Node> {
        self.get(object)
    }
}

impl fmt::Debug for ConsistentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsistentHash")
            .field("algorithm", &self.algorithm)
            .field("vnodes", &self.vnodes)
            .field("nodes", &self.len())
            .finish()
    }
}
