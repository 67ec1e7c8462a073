//! Node implementation for the Lanai Counting Trie.
//!
//! This module provides the TrieNode structure used in the Lanai Trie
//! implementation. Nodes are the fundamental building blocks of the trie,
//! each owning its children outright together with a terminal flag and a
//! subtree word counter.

use fnv::FnvHashMap;

/// A node in the Lanai Counting Trie.
///
/// Each edge is labeled by one UTF-16 code unit. Terminal nodes mark the
/// end of a stored string. `word_count` equals the number of stored strings
/// whose path passes through or ends at this node; a node whose counter
/// drops to zero is detached from its parent.
#[derive(Debug)]
pub(crate) struct TrieNode {
    /// Map of code units to exclusively-owned child nodes
    pub children: FnvHashMap<u16, TrieNode>,

    /// Whether this node represents the end of a stored string
    pub is_terminal: bool,

    /// Number of stored strings in the subtree rooted here
    pub word_count: u32,
}

impl TrieNode {
    /// Creates a new empty trie node.
    pub fn new() -> Self {
        Self {
            children: FnvHashMap::default(),
            is_terminal: false,
            word_count: 0,
        }
    }
}

impl Default for TrieNode {
    fn default() -> Self {
        Self::new()
    }
}
