//! Node identifiers and the deduplicating set used to track ring membership.

use crate::key::Key;
use serde::{Deserialize, Serialize};
use std::collections::hash_set;
use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};

/// A string identifier that is assigned hash values in a ring.
///
/// A node can be any string, but is most often a URL or host name. Nodes are
/// ordered lexicographically, which is what breaks ties between equal tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node(String);

impl Node {
    /// The canonical empty node.
    pub const NIL: Node = Node(String::new());

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Node {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Node {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Node {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Node {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Node {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Key for Node {
    fn write_to(&self, dst: &mut dyn Write) -> io::Result<()> {
        dst.write_all(self.as_bytes())
    }
}

/// An unordered, deduplicating set of nodes.
///
/// A hash keeps one of these next to its ring so membership tests don't need
/// a search through the ring itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSet {
    nodes: HashSet<Node>,
}

impl NodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.nodes.contains(node)
    }

    /// Insert a node. Returns false if it was already present.
    pub fn add(&mut self, node: Node) -> bool {
        self.nodes.insert(node)
    }

    /// Insert each node, returning how many were actually new.
    pub fn add_all<I>(&mut self, nodes: I) -> usize
    where
        I: IntoIterator<Item = Node>,
    {
        nodes
            .into_iter()
            .map(|n| self.nodes.insert(n))
            .filter(|&added| added)
            .count()
    }

    /// Delete a node. Returns false if it wasn't present.
    pub fn remove(&mut self, node: &Node) -> bool {
        self.nodes.remove(node)
    }

    /// Delete each node, returning how many were actually removed.
    pub fn remove_all<'a, I>(&mut self, nodes: I) -> usize
    where
        I: IntoIterator<Item = &'a Node>,
    {
        nodes
            .into_iter()
            .map(|n| self.nodes.remove(n))
            .filter(|&removed| removed)
            .count()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Partition `nodes` in place into members and non-members of this set.
    ///
    /// The slice is rearranged with a two-pointer sweep so that members come
    /// first, then everything else; the two returned slices point into it.
    /// Order within either partition is not preserved.
    pub fn filter<'a>(&self, nodes: &'a mut [Node]) -> (&'a mut [Node], &'a mut [Node]) {
        let mut i = 0;
        let mut j = nodes.len();
        while i < j {
            if self.nodes.contains(&nodes[i]) {
                i += 1;
            } else {
                j -= 1;
                nodes.swap(i, j);
            }
        }

        nodes.split_at_mut(i)
    }
}

impl FromIterator<Node> for NodeSet {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a Node> for NodeSet {
    fn from_iter<I: IntoIterator<Item = &'a Node>>(iter: I) -> Self {
        iter.into_iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = &'a Node;
    type IntoIter = hash_set::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl IntoIterator for NodeSet {
    type Item = Node;
    type IntoIter = hash_set::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(names: &[&str]) -> Vec<Node> {
        names.iter().map(|n| Node::from(*n)).collect()
    }

    #[test]
    fn test_nil_node() {
        assert!(Node::NIL.is_nil());
        assert_eq!(Node::NIL, Node::default());
        assert!(!Node::from("a.com").is_nil());
    }

    #[test]
    fn test_node_write_to() {
        let mut buffer = Vec::new();
        Node::from("host.example.net").write_to(&mut buffer).unwrap();
        assert_eq!(buffer, b"host.example.net");
    }

    #[test]
    fn test_node_ordering() {
        let mut list = nodes(&["b", "a", "ab"]);
        list.sort();
        assert_eq!(list, nodes(&["a", "ab", "b"]));
    }

    #[test]
    fn test_node_serde_transparent() {
        let json = serde_json::to_string(&Node::from("a.com")).unwrap();
        assert_eq!(json, "\"a.com\"");
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, "a.com");
    }

    #[test]
    fn test_add_remove() {
        let mut set = NodeSet::new();
        assert!(set.is_empty());

        assert!(set.add(Node::from("a")));
        assert!(!set.add(Node::from("a")));
        assert_eq!(set.len(), 1);

        assert_eq!(set.add_all(nodes(&["a", "b", "c", "b"])), 2);
        assert_eq!(set.len(), 3);

        assert!(set.remove(&Node::from("a")));
        assert!(!set.remove(&Node::from("a")));
        assert_eq!(set.remove_all(&nodes(&["a", "b", "z"])), 1);
        assert_eq!(set.len(), 1);
        assert!(set.contains(&Node::from("c")));
    }

    #[test]
    fn test_filter() {
        let set: NodeSet = nodes(&["a", "c", "e"]).into_iter().collect();
        let mut list = nodes(&["a", "b", "c", "d", "e", "f"]);

        let (mut in_set, mut not_in) = {
            let (i, n) = set.filter(&mut list);
            (i.to_vec(), n.to_vec())
        };
        in_set.sort();
        not_in.sort();
        assert_eq!(in_set, nodes(&["a", "c", "e"]));
        assert_eq!(not_in, nodes(&["b", "d", "f"]));

        // the caller's slice was reordered, not reallocated
        assert_eq!(list.len(), 6);
        assert!(list[..3].iter().all(|n| set.contains(n)));
    }

    #[test]
    fn test_filter_edges() {
        let empty = NodeSet::new();
        let mut list = nodes(&["x", "y"]);
        let (i, n) = empty.filter(&mut list);
        assert!(i.is_empty());
        assert_eq!(n.len(), 2);

        let full: NodeSet = nodes(&["x", "y"]).into_iter().collect();
        let (i, n) = full.filter(&mut list);
        assert_eq!(i.len(), 2);
        assert!(n.is_empty());

        let mut nothing: Vec<Node> = Vec::new();
        let (i, n) = full.filter(&mut nothing);
        assert!(i.is_empty() && n.is_empty());
    }
}
