// Copyright (c) 2025 Lanai Trie Authors
//
// Licensed under MIT License (LICENSE or https://opensource.org/licenses/MIT)

//! Preorder binary codec for the Lanai Counting Trie.
//!
//! Each node is written as one record: child count (i32), subtree counter
//! (i32), terminal flag (one byte, 0 or 1), then one u16 symbol per child.
//! Child subtrees follow immediately, recursively in the same format, in
//! ascending symbol order, matching the symbol list. All integers are
//! big-endian.
//!
//! Both directions walk with an explicit stack rather than call-stack
//! recursion; deep keys produce deep trees. Decoding always builds a new,
//! independent tree and never touches a live one, so a malformed or
//! truncated stream cannot corrupt existing data.

use std::io::{self, Read, Write};

use crate::error::{LanaiTrieError, LanaiTrieResult};
use crate::node::TrieNode;

/// Serialization seam for types that persist to a byte stream.
///
/// `serialize` walks the implementor read-only and writes to the sink;
/// a sink failure partway through has no effect on the implementor's state.
/// `deserialize` replaces the implementor's contents only after the whole
/// stream has been read and validated.
pub trait StreamSerializable {
    /// Writes the full state to the given byte sink.
    fn serialize<W: Write>(&self, sink: &mut W) -> LanaiTrieResult<()>;

    /// Replaces the current state with data read from the given byte
    /// source. On any error the previous state is left untouched.
    fn deserialize<R: Read>(&mut self, source: &mut R) -> LanaiTrieResult<()>;
}

fn write_i32<W: Write>(sink: &mut W, value: i32) -> LanaiTrieResult<()> {
    sink.write_all(&value.to_be_bytes())?;
    Ok(())
}

fn write_u16<W: Write>(sink: &mut W, value: u16) -> LanaiTrieResult<()> {
    sink.write_all(&value.to_be_bytes())?;
    Ok(())
}

fn write_flag<W: Write>(sink: &mut W, value: bool) -> LanaiTrieResult<()> {
    sink.write_all(&[u8::from(value)])?;
    Ok(())
}

/// End-of-stream inside a record is a distinct failure from other I/O
/// errors.
fn map_read_err(err: io::Error) -> LanaiTrieError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        LanaiTrieError::TruncatedStream
    } else {
        LanaiTrieError::Io(err)
    }
}

fn read_i32<R: Read>(source: &mut R) -> LanaiTrieResult<i32> {
    let mut buf = [0u8; 4];
    source.read_exact(&mut buf).map_err(map_read_err)?;
    Ok(i32::from_be_bytes(buf))
}

fn read_u16<R: Read>(source: &mut R) -> LanaiTrieResult<u16> {
    let mut buf = [0u8; 2];
    source.read_exact(&mut buf).map_err(map_read_err)?;
    Ok(u16::from_be_bytes(buf))
}

fn read_flag<R: Read>(source: &mut R) -> LanaiTrieResult<bool> {
    let mut buf = [0u8; 1];
    source.read_exact(&mut buf).map_err(map_read_err)?;
    match buf[0] {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(LanaiTrieError::MalformedData(format!(
            "terminal flag byte must be 0 or 1, got {other}"
        ))),
    }
}

/// Writes the tree rooted at `root` to the sink in preorder.
pub(crate) fn encode_tree<W: Write>(root: &TrieNode, sink: &mut W) -> LanaiTrieResult<()> {
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        write_i32(sink, node.children.len() as i32)?;
        write_i32(sink, node.word_count as i32)?;
        write_flag(sink, node.is_terminal)?;

        let mut edges: Vec<(&u16, &TrieNode)> = node.children.iter().collect();
        edges.sort_unstable_by_key(|entry| *entry.0);

        for (symbol, _) in &edges {
            write_u16(sink, **symbol)?;
        }

        // Reversed so the stack pops subtrees in symbol order.
        for (_, child) in edges.iter().rev() {
            stack.push(child);
        }
    }

    Ok(())
}

/// A node whose record has been read but whose child subtrees are still
/// being attached.
struct PendingNode {
    node: TrieNode,
    symbols: Vec<u16>,
    attached: usize,
}

fn read_record<R: Read>(
    source: &mut R,
    nodes_read: &mut usize,
    max_nodes: usize,
) -> LanaiTrieResult<PendingNode> {
    let child_count = read_i32(source)?;
    if child_count < 0 {
        return Err(LanaiTrieError::MalformedData(format!(
            "negative child count {child_count}"
        )));
    }

    let word_count = read_i32(source)?;
    if word_count < 0 {
        return Err(LanaiTrieError::MalformedData(format!(
            "negative subtree counter {word_count}"
        )));
    }

    let is_terminal = read_flag(source)?;

    *nodes_read += 1;
    let child_count = child_count as usize;
    if *nodes_read > max_nodes || child_count > max_nodes - *nodes_read {
        return Err(LanaiTrieError::MalformedData(format!(
            "stream exceeds node limit of {max_nodes}"
        )));
    }

    let mut symbols = Vec::with_capacity(child_count);
    for _ in 0..child_count {
        symbols.push(read_u16(source)?);
    }

    let mut node = TrieNode::new();
    node.is_terminal = is_terminal;
    node.word_count = word_count as u32;

    Ok(PendingNode {
        node,
        symbols,
        attached: 0,
    })
}

/// Reads one complete tree from the source and returns its root.
///
/// Bytes following the tree are left unread. `max_nodes` bounds the number
/// of node records accepted before the stream is rejected as malformed.
pub(crate) fn decode_tree<R: Read>(source: &mut R, max_nodes: usize) -> LanaiTrieResult<TrieNode> {
    let mut nodes_read = 0;
    let root = read_record(source, &mut nodes_read, max_nodes)?;
    let mut stack = vec![root];

    loop {
        let wants_child = match stack.last_mut() {
            Some(top) if top.attached < top.symbols.len() => {
                top.attached += 1;
                true
            }
            Some(_) => false,
            None => {
                return Err(LanaiTrieError::MalformedData(
                    "decoder stack underflow".to_string(),
                ))
            }
        };

        if wants_child {
            let pending = read_record(source, &mut nodes_read, max_nodes)?;
            stack.push(pending);
            continue;
        }

        let Some(done) = stack.pop() else {
            return Err(LanaiTrieError::MalformedData(
                "decoder stack underflow".to_string(),
            ));
        };

        match stack.last_mut() {
            Some(parent) => {
                let symbol = parent.symbols[parent.attached - 1];
                if parent.node.children.insert(symbol, done.node).is_some() {
                    return Err(LanaiTrieError::MalformedData(format!(
                        "duplicate edge symbol {symbol:#06x}"
                    )));
                }
            }
            None => return Ok(done.node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const NO_LIMIT: usize = 1 << 22;

    fn leaf(word_count: u32, is_terminal: bool) -> TrieNode {
        let mut node = TrieNode::new();
        node.word_count = word_count;
        node.is_terminal = is_terminal;
        node
    }

    fn chain(symbols: &[u16]) -> TrieNode {
        // Single path of `symbols`, terminal at the end.
        let mut node = leaf(1, true);
        for &symbol in symbols.iter().rev() {
            let mut parent = leaf(1, false);
            parent.children.insert(symbol, node);
            node = parent;
        }
        node
    }

    fn encode(root: &TrieNode) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_tree(root, &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_empty_tree_layout() {
        // Lone root record: zero children, zero words, not terminal.
        assert_eq!(encode(&TrieNode::new()), vec![0u8; 9]);
    }

    #[test]
    fn test_single_path_layout() {
        // "ab": root -> 'a' -> 'b', terminal leaf.
        let root = chain(&[0x61, 0x62]);

        let mut expected = Vec::new();
        expected.extend_from_slice(&1i32.to_be_bytes()); // root: one child
        expected.extend_from_slice(&1i32.to_be_bytes()); // one stored word
        expected.push(0);
        expected.extend_from_slice(&0x61u16.to_be_bytes());
        expected.extend_from_slice(&1i32.to_be_bytes()); // 'a': one child
        expected.extend_from_slice(&1i32.to_be_bytes());
        expected.push(0);
        expected.extend_from_slice(&0x62u16.to_be_bytes());
        expected.extend_from_slice(&0i32.to_be_bytes()); // 'b': leaf
        expected.extend_from_slice(&1i32.to_be_bytes());
        expected.push(1);

        assert_eq!(encode(&root), expected);
    }

    #[test]
    fn test_children_written_in_symbol_order() {
        let mut root = leaf(2, false);
        root.children.insert(0x7A, leaf(1, true)); // 'z'
        root.children.insert(0x61, leaf(1, true)); // 'a'

        let bytes = encode(&root);
        // Symbols at offsets 9..11 and 11..13 of the root record.
        assert_eq!(&bytes[9..11], &0x61u16.to_be_bytes());
        assert_eq!(&bytes[11..13], &0x7Au16.to_be_bytes());
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        // Two words under 'a', one under 'z'.
        let mut root = leaf(3, false);
        let mut a = leaf(2, true);
        a.children.insert(0x62, leaf(1, true));
        root.children.insert(0x61, a);
        root.children.insert(0x7A, leaf(1, true));

        let bytes = encode(&root);
        let decoded = decode_tree(&mut Cursor::new(&bytes), NO_LIMIT).unwrap();

        assert_eq!(decoded.word_count, 3);
        assert!(!decoded.is_terminal);
        assert_eq!(decoded.children.len(), 2);
        let a = decoded.children.get(&0x61).unwrap();
        assert!(a.is_terminal);
        assert_eq!(a.word_count, 2);
        assert!(a.children.get(&0x62).unwrap().is_terminal);
        assert!(decoded.children.get(&0x7A).unwrap().is_terminal);
    }

    #[test]
    fn test_decode_rejects_negative_child_count() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(-5i32).to_be_bytes());

        let err = decode_tree(&mut Cursor::new(&bytes), NO_LIMIT).unwrap_err();
        assert!(matches!(err, LanaiTrieError::MalformedData(_)));
    }

    #[test]
    fn test_decode_rejects_negative_counter() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&(-1i32).to_be_bytes());
        bytes.push(0);

        let err = decode_tree(&mut Cursor::new(&bytes), NO_LIMIT).unwrap_err();
        assert!(matches!(err, LanaiTrieError::MalformedData(_)));
    }

    #[test]
    fn test_decode_rejects_bad_flag_byte() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.push(2);

        let err = decode_tree(&mut Cursor::new(&bytes), NO_LIMIT).unwrap_err();
        assert!(matches!(err, LanaiTrieError::MalformedData(_)));
    }

    #[test]
    fn test_decode_rejects_duplicate_symbols() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2i32.to_be_bytes()); // root claims two children
        bytes.extend_from_slice(&2i32.to_be_bytes());
        bytes.push(0);
        bytes.extend_from_slice(&0x61u16.to_be_bytes());
        bytes.extend_from_slice(&0x61u16.to_be_bytes()); // same symbol twice
        for _ in 0..2 {
            bytes.extend_from_slice(&0i32.to_be_bytes());
            bytes.extend_from_slice(&1i32.to_be_bytes());
            bytes.push(1);
        }

        let err = decode_tree(&mut Cursor::new(&bytes), NO_LIMIT).unwrap_err();
        assert!(matches!(err, LanaiTrieError::MalformedData(_)));
    }

    #[test]
    fn test_decode_rejects_empty_stream() {
        let err = decode_tree(&mut Cursor::new(&[]), NO_LIMIT).unwrap_err();
        assert!(matches!(err, LanaiTrieError::TruncatedStream));
    }

    #[test]
    fn test_decode_rejects_truncated_stream() {
        let bytes = encode(&chain(&[0x6B, 0x6F, 0x74]));
        for cut in [1, 4, 9, 13, bytes.len() - 1] {
            let err = decode_tree(&mut Cursor::new(&bytes[..cut]), NO_LIMIT).unwrap_err();
            assert!(
                matches!(err, LanaiTrieError::TruncatedStream),
                "cut at {cut} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_decode_enforces_node_limit() {
        let bytes = encode(&chain(&[0x61, 0x62, 0x63]));
        let err = decode_tree(&mut Cursor::new(&bytes), 2).unwrap_err();
        assert!(matches!(err, LanaiTrieError::MalformedData(_)));

        assert!(decode_tree(&mut Cursor::new(&bytes), 4).is_ok());
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut bytes = encode(&chain(&[0x61]));
        bytes.extend_from_slice(b"trailing payload");

        let decoded = decode_tree(&mut Cursor::new(&bytes), NO_LIMIT).unwrap();
        assert_eq!(decoded.word_count, 1);
    }
}
