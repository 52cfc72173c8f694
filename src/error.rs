//! Errors reported by [`Tree::validate`][crate::rbtree::Tree::validate].
//!
//! None of the tree's regular operations fail: inserting a present key or erasing an absent one
//! is a no-op. These errors only describe a tree whose internal bookkeeping has been corrupted.
//! `depth` is the number of edges between the root and the offending node.

use thiserror::Error;

/// A broken structural invariant found while walking the whole tree.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// The root node is red.
    #[error("the root is red")]
    RedRoot,
    /// A red node has a red child.
    #[error("red node at depth {depth} has a red child")]
    RedRedEdge {
        /// Depth of the parent of the offending edge.
        depth: usize,
    },
    /// Two paths from the same node down to an empty slot cross different numbers of black
    /// nodes.
    #[error("black heights differ at depth {depth}: left {left}, right {right}")]
    BlackHeightMismatch {
        /// Depth of the node whose subtrees disagree.
        depth: usize,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// A key is not strictly between the keys of the ancestors it hangs under.
    #[error("key at depth {depth} is out of order")]
    OutOfOrder {
        /// Depth of the misplaced node.
        depth: usize,
    },
    /// A node's stored sum isn't the sum of the keys in its subtree.
    #[error("stored sum at depth {depth} does not match its subtree")]
    BadSum {
        /// Depth of the node with the wrong sum.
        depth: usize,
    },
    /// A node's stored size isn't the number of nodes in its subtree.
    #[error("stored size at depth {depth} is {found}, expected {expected}")]
    BadSize {
        /// Depth of the node with the wrong size.
        depth: usize,
        /// The number of nodes actually in the subtree.
        expected: usize,
        /// The size stored in the node.
        found: usize,
    },
    /// A node's parent link doesn't point at the node holding it as a child.
    #[error("parent link at depth {depth} is wrong")]
    BadParentLink {
        /// Depth of the node with the wrong parent link.
        depth: usize,
    },
    /// Some allocated nodes can't be reached from the root.
    #[error("{reachable} of {allocated} nodes are reachable from the root")]
    UnreachableNodes {
        /// Nodes found by walking from the root.
        reachable: usize,
        /// Nodes held by the tree.
        allocated: usize,
    },
}
