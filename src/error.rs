// Copyright (c) 2025 Lanai Trie Authors
//
// Licensed under MIT License (LICENSE or https://opensource.org/licenses/MIT)

//! Error types for the Lanai Counting Trie.
//!
//! This module defines the error types that can occur during trie
//! operations, including the stream decode and integrity-check failures
//! raised on the restore path.

/// Errors that can occur in Lanai Trie operations.
#[derive(Debug, thiserror::Error)]
pub enum LanaiTrieError {
    /// Error when an empty key is passed to an insertion.
    #[error("Empty key not allowed")]
    EmptyKey,

    /// Error when a key exceeds the configured maximum length.
    #[error("Key of {len} code units exceeds maximum length of {max_len}")]
    KeyTooLong {
        /// Length of the rejected key, in UTF-16 code units.
        len: usize,
        /// The configured maximum length.
        max_len: usize,
    },

    /// Error when a structurally impossible value is decoded from a stream.
    #[error("Malformed stream: {0}")]
    MalformedData(String),

    /// Error when the stream ends before a node record completes.
    #[error("Unexpected end of stream inside a node record")]
    TruncatedStream,

    /// Error when a stored subtree counter disagrees with the recomputed
    /// value, or a candidate tree breaks a structural invariant.
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    /// I/O error surfaced by the byte sink or source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Lanai Trie operations
pub type LanaiTrieResult<T> = std::result::Result<T, LanaiTrieError>;
