//! Lanai Counting Trie Library
//!
//! This library provides a counting prefix trie: an ordered set of strings
//! that answers "how many stored strings start with prefix P" in O(|P|),
//! together with a preorder binary codec and a verify-before-commit
//! restore path. A corrupted or malformed stream is rejected in its
//! entirety and never clobbers a live, valid instance.
//!
//! # Architecture
//!
//! The crate is designed with the following principles in mind:
//! - Strict component boundaries: node storage, trie algorithms, the wire
//!   codec, and the integrity checker are separate modules
//! - Single-writer, single-threaded execution; exclusive ownership down
//!   the tree, no shared references and no cycles
//! - Comprehensive error handling and propagation: every rejection path
//!   reports a typed error, nothing is swallowed
//! - Explicit-stack traversals on the persistence path, so deep keys
//!   cannot overflow the call stack
//!
//! # Example
//!
//! ```
//! use lanai_trie::{LanaiTrie, StreamSerializable};
//!
//! let mut trie = LanaiTrie::new();
//! trie.insert("mauka").unwrap();
//! trie.insert("makai").unwrap();
//!
//! assert_eq!(trie.len(), 2);
//! assert_eq!(trie.count_with_prefix("ma"), 2);
//! assert_eq!(trie.count_with_prefix("mau"), 1);
//!
//! // Persist to any byte sink and restore from any byte source.
//! let mut buf = Vec::new();
//! trie.serialize(&mut buf).unwrap();
//!
//! let mut restored = LanaiTrie::new();
//! restored.deserialize(&mut buf.as_slice()).unwrap();
//! assert!(restored.contains("mauka"));
//! ```

// Re-export public modules
pub mod codec;
pub mod error;
pub mod trie;

// Internal modules that are not part of the public API
mod node;
mod validate;

pub use codec::StreamSerializable;
pub use error::{LanaiTrieError, LanaiTrieResult};
pub use trie::{LanaiTrie, LanaiTrieConfig};

/// Version information for the Lanai Trie library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
