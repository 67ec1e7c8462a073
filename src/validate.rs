// Copyright (c) 2025 Lanai Trie Authors
//
// Licensed under MIT License (LICENSE or https://opensource.org/licenses/MIT)

//! Structural integrity checks for a node tree.
//!
//! The checker recomputes every subtree counter bottom-up from the terminal
//! flags and compares against the stored values. It runs over candidate
//! trees before they are promoted to live, and over live trees through
//! [`LanaiTrie::verify`](crate::trie::LanaiTrie::verify).

use crate::error::{LanaiTrieError, LanaiTrieResult};
use crate::node::TrieNode;

enum Step<'a> {
    Enter(&'a TrieNode, bool),
    Exit(&'a TrieNode, bool, usize),
}

/// Verifies that every stored counter equals the recomputed count of
/// terminal nodes in its subtree.
///
/// Beyond the counter comparison, two structural invariants are enforced:
/// a non-root node counting zero words is unreachable garbage, and a
/// terminal root would represent a stored empty string; both reject the
/// tree.
pub(crate) fn verify_counters(root: &TrieNode) -> LanaiTrieResult<()> {
    if root.is_terminal {
        return Err(LanaiTrieError::IntegrityViolation(
            "root node must not be terminal".to_string(),
        ));
    }

    // Iterative post-order; `totals` carries recomputed subtree counts.
    let mut steps = vec![Step::Enter(root, true)];
    let mut totals: Vec<u64> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(node, is_root) => {
                steps.push(Step::Exit(node, is_root, node.children.len()));
                for child in node.children.values() {
                    steps.push(Step::Enter(child, false));
                }
            }
            Step::Exit(node, is_root, child_count) => {
                let mut total: u64 = u64::from(node.is_terminal);
                for _ in 0..child_count {
                    match totals.pop() {
                        Some(subtotal) => total += subtotal,
                        None => {
                            return Err(LanaiTrieError::IntegrityViolation(
                                "counter accounting underflow".to_string(),
                            ))
                        }
                    }
                }

                if total != u64::from(node.word_count) {
                    return Err(LanaiTrieError::IntegrityViolation(format!(
                        "stored counter {} disagrees with recomputed {}",
                        node.word_count, total
                    )));
                }
                if total == 0 && !is_root {
                    return Err(LanaiTrieError::IntegrityViolation(
                        "unreachable node counting zero words".to_string(),
                    ));
                }

                totals.push(total);
            }
        }
    }

    Ok(())
}
