//! This crate exposes a red-black tree augmented for order statistics: besides the usual
//! insert, find, and erase it answers "what is the sum of the `k` smallest keys?" in
//! logarithmic time.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to insert, find, and delete
//! stored records. BSTs are typically defined recursively using the notion of a `Node`. A `Node`
//! stores a key and has up to two child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a key less than its
//!    own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a key greater than
//!    its own key.
//!
//! Searching takes `O(height)`, so the interesting part is keeping the height at `O(lg N)`.
//!
//! ## Red-black trees
//!
//! A red-black tree colors every `Node` red or black and keeps three more invariants:
//!
//! 1. The root is black.
//! 2. A red `Node` never has a red child.
//! 3. Every path from a `Node` down to an empty child slot passes through the same number of
//!    black `Node`s.
//!
//! Together these bound the height by `2 * lg(N + 1)`. Inserting and erasing may break them
//! locally; a short sequence of recolorings and rotations walking up towards the root repairs
//! them.
//!
//! ## Augmentation
//!
//! Every `Node` in [`rbtree::Tree`] also stores the sum of the keys in its subtree and the
//! number of `Node`s in it. A rotation only changes which subtrees hang under the two `Node`s
//! it moves, so those two can be patched in constant time and the augmentation costs nothing
//! asymptotically. With the sizes and sums in place, [`rbtree::Tree::prefix_sum`] can take whole
//! subtrees at once instead of visiting every key.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod rbtree;
mod util;

pub use error::InvariantError;
pub use rbtree::Tree;
pub use util::Summable;

#[cfg(test)]
mod test;
