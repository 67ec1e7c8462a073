// Copyright (c) 2025 Lanai Trie Authors
//
// Licensed under MIT License (LICENSE or https://opensource.org/licenses/MIT)

//! Lanai Counting Trie implementation.
//!
//! This module provides an efficient trie-based string set that answers
//! prefix-count queries in time proportional to the prefix length, and that
//! persists to a binary stream with an integrity-validated restore path.
//!
//! Key features:
//! * Per-node subtree counters, maintained incrementally under insertion
//!   and deletion, so `count_with_prefix` and `len` never walk the tree.
//! * Pruning deletion: a subtree whose counter reaches zero is detached
//!   immediately, never leaving dangling empty nodes.
//! * Verify-before-commit restore: a deserialized tree replaces the live
//!   one only after every stored counter has been recomputed and checked.

use std::io::{Read, Write};

use crate::codec::{self, StreamSerializable};
use crate::error::{LanaiTrieError, LanaiTrieResult};
use crate::node::TrieNode;
use crate::validate;

/// Configuration options for the Lanai Counting Trie
#[derive(Debug, Clone)]
pub struct LanaiTrieConfig {
    /// Longest accepted key, in UTF-16 code units (guards insertion only;
    /// lookups with longer arguments simply report absence)
    pub max_key_len: usize,

    /// Maximum number of node records accepted from a single stream before
    /// it is rejected as malformed (bounds allocation on hostile input)
    pub max_decode_nodes: usize,
}

impl Default for LanaiTrieConfig {
    fn default() -> Self {
        Self {
            max_key_len: 65_536,
            max_decode_nodes: 1 << 22,
        }
    }
}

/// Lanai Counting Trie is an ordered set of strings that also answers
/// "how many stored strings start with this prefix" in O(|prefix|).
///
/// Keys are sequences of UTF-16 code units, one code unit per edge. Every
/// node carries the number of stored strings in its subtree; the counters
/// are kept exact under both insertion and pruning deletion, so `len` and
/// `count_with_prefix` are simple field reads at the end of a walk.
///
/// The trie serializes to a byte stream through [`StreamSerializable`] and
/// restores with an all-or-nothing policy: a malformed, truncated, or
/// inconsistent stream is rejected without touching the live contents.
#[derive(Debug)]
pub struct LanaiTrie {
    /// The root node of the trie; never terminal, its counter is the size
    root: TrieNode,

    /// Configuration options
    config: LanaiTrieConfig,
}

impl LanaiTrie {
    /// Creates a new empty `LanaiTrie` with default configuration.
    pub fn new() -> Self {
        Self::with_config(LanaiTrieConfig::default())
    }

    /// Creates a new empty `LanaiTrie` with the specified configuration.
    pub fn with_config(config: LanaiTrieConfig) -> Self {
        Self {
            root: TrieNode::new(),
            config,
        }
    }

    /// Inserts a key into the trie.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The key was not previously present.
    /// * `Ok(false)` - The key was already stored; the trie is unchanged.
    /// * `Err(LanaiTrieError)` - The key is empty or exceeds the configured
    ///   maximum length; the trie is unchanged.
    ///
    /// Counters along the path from the root to the final node are each
    /// incremented exactly once for a genuinely new key. O(|key|).
    pub fn insert(&mut self, key: &str) -> LanaiTrieResult<bool> {
        let symbols = self.checked_symbols(key)?;

        if self.walk(key).map_or(false, |node| node.is_terminal) {
            return Ok(false);
        }

        self.root.word_count += 1;
        let mut cur = &mut self.root;
        for &symbol in &symbols {
            let child = cur.children.entry(symbol).or_default();
            child.word_count += 1;
            cur = child;
        }
        cur.is_terminal = true;
        Ok(true)
    }

    /// Checks if a key is stored in the trie.
    ///
    /// Returns `false` for an empty key, for any key whose path does not
    /// fully exist, and for path nodes that no stored string ends at.
    /// O(|key|).
    pub fn contains(&self, key: &str) -> bool {
        !key.is_empty() && self.walk(key).map_or(false, |node| node.is_terminal)
    }

    /// Removes a key from the trie.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to remove.
    ///
    /// # Returns
    ///
    /// `true` if the key was stored. An empty or absent key is a no-op
    /// reporting `false`.
    ///
    /// Counters along the path are decremented; the first node whose
    /// counter reaches zero is detached from its parent and descent stops
    /// there, since everything below it is unreachable. If no node was
    /// pruned, the final node's terminal flag is cleared instead. O(|key|).
    pub fn remove(&mut self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        if !self.walk(key).map_or(false, |node| node.is_terminal) {
            return false;
        }

        let symbols: Vec<u16> = key.encode_utf16().collect();
        self.root.word_count -= 1;
        let mut cur = &mut self.root;
        for &symbol in &symbols {
            let zero = match cur.children.get_mut(&symbol) {
                Some(child) => {
                    child.word_count -= 1;
                    child.word_count == 0
                }
                None => unreachable!("walk confirmed the full path exists"),
            };
            if zero {
                cur.children.remove(&symbol);
                return true;
            }
            cur = cur
                .children
                .get_mut(&symbol)
                .unwrap_or_else(|| unreachable!("walk confirmed the full path exists"));
        }
        cur.is_terminal = false;
        true
    }

    /// Returns the number of stored keys. O(1).
    pub fn len(&self) -> usize {
        self.root.word_count as usize
    }

    /// Checks if the trie is empty.
    pub fn is_empty(&self) -> bool {
        self.root.word_count == 0
    }

    /// Returns how many stored keys start with the given prefix.
    ///
    /// Returns 0 for an empty prefix or for a prefix whose path does not
    /// fully exist. O(|prefix|).
    pub fn count_with_prefix(&self, prefix: &str) -> usize {
        if prefix.is_empty() {
            return 0;
        }
        self.walk(prefix).map_or(0, |node| node.word_count as usize)
    }

    /// Collects all stored keys starting with the given prefix, sorted.
    ///
    /// An empty prefix enumerates the whole set. Unlike
    /// [`count_with_prefix`](Self::count_with_prefix) this walks the whole
    /// matching subtree, so it is O(total length of the returned keys).
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let Some(start) = self.walk(prefix) else {
            return Vec::new();
        };

        let mut result = Vec::new();
        let prefix_units: Vec<u16> = prefix.encode_utf16().collect();
        let mut stack = vec![(start, prefix_units)];

        while let Some((node, path)) = stack.pop() {
            if node.is_terminal {
                result.push(String::from_utf16_lossy(&path));
            }
            for (&symbol, child) in &node.children {
                let mut next = path.clone();
                next.push(symbol);
                stack.push((child, next));
            }
        }

        result.sort();
        result
    }

    /// Clears all entries from the trie.
    pub fn clear(&mut self) {
        self.root = TrieNode::new();
    }

    /// Runs the integrity checker over the live tree.
    ///
    /// Recomputes every subtree counter from the terminal flags and
    /// compares against the stored values; any disagreement is an
    /// [`IntegrityViolation`](LanaiTrieError::IntegrityViolation). Useful
    /// as an oracle in randomized tests.
    pub fn verify(&self) -> LanaiTrieResult<()> {
        validate::verify_counters(&self.root)
    }

    /// Validates a key for insertion and expands it to code units.
    fn checked_symbols(&self, key: &str) -> LanaiTrieResult<Vec<u16>> {
        if key.is_empty() {
            return Err(LanaiTrieError::EmptyKey);
        }
        let symbols: Vec<u16> = key.encode_utf16().collect();
        if symbols.len() > self.config.max_key_len {
            return Err(LanaiTrieError::KeyTooLong {
                len: symbols.len(),
                max_len: self.config.max_key_len,
            });
        }
        Ok(symbols)
    }

    /// Follows the key's path from the root, if it fully exists.
    fn walk(&self, key: &str) -> Option<&TrieNode> {
        let mut cur = &self.root;
        for symbol in key.encode_utf16() {
            cur = cur.children.get(&symbol)?;
        }
        Some(cur)
    }
}

impl Default for LanaiTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamSerializable for LanaiTrie {
    fn serialize<W: Write>(&self, sink: &mut W) -> LanaiTrieResult<()> {
        codec::encode_tree(&self.root, sink)
    }

    fn deserialize<R: Read>(&mut self, source: &mut R) -> LanaiTrieResult<()> {
        let candidate = match codec::decode_tree(source, self.config.max_decode_nodes) {
            Ok(candidate) => candidate,
            Err(err) => {
                tracing::warn!(error = %err, "rejected unreadable trie stream");
                return Err(err);
            }
        };

        if let Err(err) = validate::verify_counters(&candidate) {
            tracing::warn!(error = %err, "rejected inconsistent trie stream");
            return Err(err);
        }

        tracing::debug!(words = candidate.word_count, "restored trie from stream");
        self.root = candidate;
        Ok(())
    }
}
