//! A red-black tree whose nodes also track the sum and size of their subtrees. On top of the
//! usual set operations this supports an order-statistic aggregate: the sum of the `k` smallest
//! keys in `O(lg N)`.
//!
//! # Examples
//!
//! ```
//! use rbsum::rbtree::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.find(&1));
//! assert_eq!(tree.prefix_sum(3), 0);
//!
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     tree.insert(key);
//! }
//! assert!(tree.find(&4));
//! assert_eq!(tree.size(), 7);
//!
//! // 1 + 3 + 4
//! assert_eq!(tree.prefix_sum(3), 8);
//!
//! // Inserting a key that's already there does nothing.
//! assert!(!tree.insert(5));
//! assert_eq!(tree.size(), 7);
//!
//! assert!(tree.erase(&5));
//! assert!(!tree.find(&5));
//! assert_eq!(tree.prefix_sum(6), 1 + 3 + 4 + 7 + 8 + 9);
//! ```
//!
//! # Layout
//!
//! Nodes live in a `Vec` owned by the [`Tree`] and refer to each other with indices. A node's
//! children are owned by it in the sense that every node is reachable from the root through
//! exactly one child slot; the parent index is only used to walk back up during rebalancing.
//! Dropping the tree drops the `Vec`, so there is no recursive teardown no matter how many
//! nodes there are.

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use log::trace;

use crate::error::InvariantError;
use crate::util::{Color, Dir, Summable};

/// Index of a node in [`Tree::nodes`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct NodeId(usize);

#[derive(Clone)]
struct Node<K> {
    key: K,
    /// The sum of every key in the subtree rooted at this node, including its own.
    sum: K,
    /// How many nodes are in the subtree rooted at this node, including itself.
    size: usize,
    children: [Option<NodeId>; 2],
    parent: Option<NodeId>,
    color: Color,
}

impl<K> Node<K>
where
    K: Clone,
{
    /// A fresh leaf. New nodes are always red so inserting one can't change any black height.
    fn new(key: K, parent: Option<NodeId>) -> Self {
        Self {
            sum: key.clone(),
            key,
            size: 1,
            children: [None, None],
            parent,
            color: Color::Red,
        }
    }
}

/// A self-balancing Binary Search Tree (specifically, a red-black tree) of unique keys, augmented
/// with subtree sums and sizes.
#[derive(Clone)]
pub struct Tree<K> {
    root: Option<NodeId>,
    nodes: Vec<Node<K>>,
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Tree<K> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: None,
            nodes: Vec::new(),
        }
    }

    /// The number of keys in the tree.
    pub fn size(&self) -> usize {
        self.size_of(self.root)
    }

    /// Same as [`Tree::size`], named the way the standard collections name it.
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Whether the tree holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Iterates over the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbsum::rbtree::Tree;
    ///
    /// let tree: Tree<i32> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self)
    }

    /// The key with the given 0-based rank, i.e. `select(0)` is the smallest key. Returns `None`
    /// when `rank >= self.size()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbsum::rbtree::Tree;
    ///
    /// let tree: Tree<i32> = [30, 10, 20].into_iter().collect();
    /// assert_eq!(tree.select(0), Some(&10));
    /// assert_eq!(tree.select(2), Some(&30));
    /// assert_eq!(tree.select(3), None);
    /// ```
    pub fn select(&self, mut rank: usize) -> Option<&K> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = self.node(id);
            let left_size = self.size_of(node.children[Dir::Left.index()]);
            match rank.cmp(&left_size) {
                Ordering::Less => cur = node.children[Dir::Left.index()],
                Ordering::Equal => return Some(&node.key),
                Ordering::Greater => {
                    rank -= left_size + 1;
                    cur = node.children[Dir::Right.index()];
                }
            }
        }
        None
    }

    /// A pre-order dump of the tree for debugging. Every node prints as
    /// `([key,sum,size,color] <left><right>)` where the color is `R` or `B` and an empty slot
    /// prints as `(null)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbsum::rbtree::Tree;
    ///
    /// let tree: Tree<i32> = [2, 1].into_iter().collect();
    /// assert_eq!(tree.dump(), "([2,3,2,B] ([1,1,1,R] (null)(null))(null))");
    /// ```
    pub fn dump(&self) -> String
    where
        K: fmt::Display,
    {
        Dump { tree: self }.to_string()
    }

    fn node(&self, id: NodeId) -> &Node<K> {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        &mut self.nodes[id.0]
    }

    fn child(&self, id: NodeId, dir: Dir) -> Option<NodeId> {
        self.node(id).children[dir.index()]
    }

    fn set_child(&mut self, id: NodeId, dir: Dir, child: Option<NodeId>) {
        self.node_mut(id).children[dir.index()] = child;
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    fn color(&self, id: NodeId) -> Color {
        self.node(id).color
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    /// Empty slots count as black.
    fn is_black(&self, id: Option<NodeId>) -> bool {
        id.map_or(true, |id| self.color(id) == Color::Black)
    }

    fn size_of(&self, id: Option<NodeId>) -> usize {
        id.map_or(0, |id| self.node(id).size)
    }

    /// Which side of its parent `id` hangs on.
    ///
    /// ## Panics
    ///
    /// When called on the root.
    fn dir_of(&self, id: NodeId) -> Dir {
        let parent = self.parent(id).expect("The root isn't on either side of anything");
        if self.child(parent, Dir::Left) == Some(id) {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    /// The other child of `id`'s parent, if `id` has a parent and that parent has another child.
    fn sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        self.child(parent, !self.dir_of(id))
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.child(id, Dir::Left) {
            id = left;
        }
        id
    }

    /// Drops the detached node at `id`. To keep the arena dense, the last node in the arena is
    /// moved into the freed slot and every link to it is repointed.
    fn release(&mut self, id: NodeId) {
        let last = NodeId(self.nodes.len() - 1);
        self.nodes.swap_remove(id.0);
        if id == last {
            return;
        }

        match self.parent(id) {
            Some(parent) => {
                let side = if self.child(parent, Dir::Left) == Some(last) {
                    Dir::Left
                } else {
                    Dir::Right
                };
                self.set_child(parent, side, Some(id));
            }
            None => self.root = Some(id),
        }
        let children = self.node(id).children;
        for child in children.into_iter().flatten() {
            self.node_mut(child).parent = Some(id);
        }
    }
}

impl<K> Tree<K>
where
    K: Summable,
{
    /// Whether the tree contains `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbsum::rbtree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert!(tree.find(&1));
    /// assert!(!tree.find(&42));
    /// ```
    pub fn find(&self, key: &K) -> bool {
        self.find_node(key).is_some()
    }

    /// Inserts `key` into the tree. Returns `false`, leaving the tree untouched, if the key was
    /// already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbsum::rbtree::Tree;
    ///
    /// let mut tree = Tree::new();
    ///
    /// assert!(tree.insert(1));
    /// assert!(!tree.insert(1));
    /// assert_eq!(tree.size(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        let mut parent = None;
        let mut dir = Dir::Left;
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = self.node(id);
            dir = match key.cmp(&node.key) {
                Ordering::Less => Dir::Left,
                Ordering::Equal => return false,
                Ordering::Greater => Dir::Right,
            };
            parent = Some(id);
            cur = node.children[dir.index()];
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(key.clone(), parent));
        match parent {
            Some(parent) => self.set_child(parent, dir, Some(id)),
            None => self.root = Some(id),
        }

        // Account for the new key before rebalancing. Rotations keep the aggregates of the nodes
        // they move consistent, so they don't need to know about this insert.
        let mut ancestor = parent;
        while let Some(id) = ancestor {
            let node = self.node_mut(id);
            node.sum += key.clone();
            node.size += 1;
            ancestor = node.parent;
        }

        self.balance_insert(id);
        self.debug_assert_root();
        true
    }

    /// Removes `key` from the tree. Returns `false`, leaving the tree untouched, if the key
    /// wasn't present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbsum::rbtree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert!(tree.erase(&1));
    /// assert!(!tree.find(&1));
    /// assert!(!tree.erase(&1));
    /// ```
    pub fn erase(&mut self, key: &K) -> bool {
        let Some(cur) = self.find_node(key) else {
            return false;
        };

        // `y` is the node that actually leaves the tree. With two children that's the in-order
        // successor, whose key then replaces `cur`'s.
        let y = match (self.child(cur, Dir::Left), self.child(cur, Dir::Right)) {
            (Some(_), Some(right)) => self.leftmost(right),
            _ => cur,
        };
        let x = self
            .child(y, Dir::Left)
            .or_else(|| self.child(y, Dir::Right));
        let y_parent = self.parent(y);
        let y_dir = y_parent.map(|_| self.dir_of(y));

        if let Some(x) = x {
            self.node_mut(x).parent = y_parent;
        }
        match (y_parent, y_dir) {
            (Some(parent), Some(dir)) => self.set_child(parent, dir, x),
            _ => self.root = x,
        }

        // Below `cur`, ancestors of `y` lose `y`'s key. `cur` and everything above it keep `y`'s
        // key (it moves into `cur`) and lose the erased one instead. Every ancestor loses a node.
        let erased = self.node(cur).key.clone();
        let moved = self.node(y).key.clone();
        let mut above_cur = y == cur;
        let mut ancestor = y_parent;
        while let Some(id) = ancestor {
            above_cur |= id == cur;
            let node = self.node_mut(id);
            node.sum -= if above_cur {
                erased.clone()
            } else {
                moved.clone()
            };
            node.size -= 1;
            ancestor = node.parent;
        }
        if y != cur {
            self.node_mut(cur).key = moved;
        }

        if self.color(y) == Color::Black {
            if let (Some(parent), Some(dir)) = (y_parent, y_dir) {
                self.balance_erase(parent, dir);
            }
            if let Some(root) = self.root {
                self.set_color(root, Color::Black);
            }
        }

        self.release(y);
        self.debug_assert_root();
        true
    }

    /// The sum of the `k` smallest keys in the tree, or of every key if `k >= self.size()`.
    ///
    /// Whole subtrees that fit in the remaining budget are taken from their stored sums, so this
    /// only walks a single root-to-leaf path.
    ///
    /// ## Panics
    ///
    /// If the stored subtree sizes are inconsistent with the shape of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbsum::rbtree::Tree;
    ///
    /// let tree: Tree<i64> = [10, 1, 5, 7].into_iter().collect();
    ///
    /// assert_eq!(tree.prefix_sum(0), 0);
    /// assert_eq!(tree.prefix_sum(2), 1 + 5);
    /// assert_eq!(tree.prefix_sum(100), 1 + 5 + 7 + 10);
    /// ```
    pub fn prefix_sum(&self, mut k: usize) -> K {
        let mut total = K::zero();
        let mut cur = self.root;
        while let Some(id) = cur {
            if k == 0 {
                break;
            }
            let node = self.node(id);
            if node.size <= k {
                total += node.sum.clone();
                break;
            }

            let left = node.children[Dir::Left.index()];
            let left_size = self.size_of(left);
            if k <= left_size {
                cur = left;
                continue;
            }

            if let Some(left) = left {
                total += self.node(left).sum.clone();
            }
            total += node.key.clone();
            k -= left_size + 1;
            if k == 0 {
                break;
            }
            cur = Some(
                node.children[Dir::Right.index()]
                    .expect("Subtree size exceeds its left subtree and root but has no right child"),
            );
        }
        total
    }

    /// The sum of every key in the tree.
    pub fn sum(&self) -> K {
        self.root
            .map_or_else(K::zero, |root| self.node(root).sum.clone())
    }

    /// Walks the whole tree and checks every structural invariant: key order, the red-black
    /// coloring rules, the stored sums and sizes, and the parent links.
    ///
    /// A tree only built through this type's methods always passes. This is meant for tests and
    /// for debugging.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbsum::rbtree::Tree;
    ///
    /// let tree: Tree<i32> = (0..100).collect();
    /// assert_eq!(tree.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> Result<(), InvariantError> {
        let reachable = match self.root {
            None => 0,
            Some(root) => {
                if self.parent(root).is_some() {
                    return Err(InvariantError::BadParentLink { depth: 0 });
                }
                if self.color(root) == Color::Red {
                    return Err(InvariantError::RedRoot);
                }
                let mut visited = 0;
                self.validate_node(root, None, None, 0, &mut visited)?;
                visited
            }
        };

        if reachable == self.nodes.len() {
            Ok(())
        } else {
            Err(InvariantError::UnreachableNodes {
                reachable,
                allocated: self.nodes.len(),
            })
        }
    }

    /// Recursive helper for [`Tree::validate`]. Recomputes the subtree's black height, sum, and
    /// size from scratch rather than trusting anything stored below `id`.
    fn validate_node<'a>(
        &'a self,
        id: NodeId,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
        depth: usize,
        visited: &mut usize,
    ) -> Result<Checked<K>, InvariantError> {
        *visited += 1;
        let node = self.node(id);
        if lower.is_some_and(|lower| node.key <= *lower)
            || upper.is_some_and(|upper| node.key >= *upper)
        {
            return Err(InvariantError::OutOfOrder { depth });
        }

        let mut sum = node.key.clone();
        let mut size = 1;
        let mut black_heights = [0; 2];
        for dir in [Dir::Left, Dir::Right] {
            let Some(child) = node.children[dir.index()] else {
                continue;
            };
            if self.parent(child) != Some(id) {
                return Err(InvariantError::BadParentLink { depth: depth + 1 });
            }
            if node.color == Color::Red && self.color(child) == Color::Red {
                return Err(InvariantError::RedRedEdge { depth });
            }

            let (lower, upper) = match dir {
                Dir::Left => (lower, Some(&node.key)),
                Dir::Right => (Some(&node.key), upper),
            };
            let checked = self.validate_node(child, lower, upper, depth + 1, visited)?;
            black_heights[dir.index()] = checked.black_height;
            sum += checked.sum;
            size += checked.size;
        }

        let [left, right] = black_heights;
        if left != right {
            return Err(InvariantError::BlackHeightMismatch { depth, left, right });
        }
        if sum != node.sum {
            return Err(InvariantError::BadSum { depth });
        }
        if size != node.size {
            return Err(InvariantError::BadSize {
                depth,
                expected: size,
                found: node.size,
            });
        }

        Ok(Checked {
            black_height: left + usize::from(node.color == Color::Black),
            sum,
            size,
        })
    }

    fn find_node(&self, key: &K) -> Option<NodeId> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = self.node(id);
            cur = match key.cmp(&node.key) {
                Ordering::Less => node.children[Dir::Left.index()],
                Ordering::Equal => return Some(id),
                Ordering::Greater => node.children[Dir::Right.index()],
            };
        }
        None
    }

    /// Restores the red-black invariants after `cur` was inserted as a red leaf. The only thing
    /// that can be wrong is `cur` and its parent both being red.
    fn balance_insert(&mut self, mut cur: NodeId) {
        loop {
            let Some(mut parent) = self.parent(cur) else {
                self.set_color(cur, Color::Black);
                return;
            };
            if self.color(parent) == Color::Black {
                return;
            }

            // A red node is never the root so there is a grandparent.
            let grand = self
                .parent(parent)
                .expect("A red node always has a parent");
            let uncle = self
                .sibling(parent)
                .filter(|&uncle| self.color(uncle) == Color::Red);
            if let Some(uncle) = uncle {
                trace!("insert: red uncle, pushing red up to grandparent {}", grand.0);
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grand, Color::Red);
                cur = grand;
                continue;
            }

            let side = self.dir_of(parent);
            if self.dir_of(cur) != side {
                trace!("insert: straightening zig-zag at {}", parent.0);
                self.rotate(parent, side);
                std::mem::swap(&mut cur, &mut parent);
            }

            trace!("insert: rotating grandparent {}", grand.0);
            self.set_color(grand, Color::Red);
            self.set_color(parent, Color::Black);
            self.rotate(grand, !side);
            return;
        }
    }

    /// Restores the red-black invariants after a black node was removed from
    /// `parent.children[dir]`, leaving that slot one black node short.
    fn balance_erase(&mut self, mut parent: NodeId, mut dir: Dir) {
        while self.is_black(self.child(parent, dir)) {
            // The short slot has a black height of at least 1 to make up for, so its sibling
            // can't be empty.
            let mut sibling = self
                .child(parent, !dir)
                .expect("A double-black slot always has a sibling");

            if self.color(sibling) == Color::Red {
                trace!("erase: red sibling {} under {}", sibling.0, parent.0);
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, dir);
                sibling = self
                    .child(parent, !dir)
                    .expect("A double-black slot always has a sibling");
            }

            let near = self.child(sibling, dir);
            let far = self.child(sibling, !dir);
            if self.is_black(near) && self.is_black(far) {
                trace!("erase: black nephews, moving deficiency up from {}", parent.0);
                self.set_color(sibling, Color::Red);
                match self.parent(parent) {
                    Some(grand) => {
                        dir = self.dir_of(parent);
                        parent = grand;
                    }
                    // The whole tree lost a black level, which is fine.
                    None => return,
                }
                continue;
            }

            if self.is_black(far) {
                trace!("erase: red near nephew under {}", sibling.0);
                let near = near.expect("A red nephew exists");
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, !dir);
                sibling = self
                    .child(parent, !dir)
                    .expect("A double-black slot always has a sibling");
            }

            trace!("erase: red far nephew, rotating {}", parent.0);
            let far = self
                .child(sibling, !dir)
                .expect("The far nephew is red at this point");
            self.set_color(sibling, self.color(parent));
            self.set_color(parent, Color::Black);
            self.set_color(far, Color::Black);
            self.rotate(parent, dir);
            return;
        }

        // The slot holds a red node: painting it black makes up the missing level.
        if let Some(child) = self.child(parent, dir) {
            self.set_color(child, Color::Black);
        }
    }

    /// Rotate `n` towards `dir`. This moves `n`'s child on the other side up vertically and `n`
    /// down vertically. It must only be called when there _is_ a child on the other side.
    ///
    /// Only `n` and the promoted child have their subtrees change, so only their sums and sizes
    /// are patched.
    ///
    /// ## Panics
    ///
    /// When `n` has no child opposite `dir`.
    ///
    /// # Diagram
    ///
    /// Rotating with `dir` = left:
    ///
    /// ```text
    ///    Option<parent>          Option<parent>
    ///      /                       /
    ///     n                       c
    ///    / \                     / \
    ///   x   c      rotate ->    n   z
    ///      / \                 / \
    ///     gc  z               x   gc
    /// ```
    fn rotate(&mut self, n: NodeId, dir: Dir) {
        let parent = self.parent(n);
        let c = self
            .child(n, !dir)
            .expect("Rotating requires a child to promote");
        let gc = self.child(c, dir);

        match parent {
            Some(parent) => {
                let side = self.dir_of(n);
                self.set_child(parent, side, Some(c));
            }
            None => self.root = Some(c),
        }

        // `n` loses everything under `c` and gets `gc` back.
        let (c_sum, c_size) = (self.node(c).sum.clone(), self.node(c).size);
        let node = self.node_mut(n);
        node.children[(!dir).index()] = gc;
        node.parent = Some(c);
        node.sum -= c_sum;
        node.size -= c_size;

        if let Some(gc) = gc {
            let grandchild = self.node_mut(gc);
            grandchild.parent = Some(n);
            let (gc_sum, gc_size) = (grandchild.sum.clone(), grandchild.size);

            let node = self.node_mut(n);
            node.sum += gc_sum.clone();
            node.size += gc_size;

            let promoted = self.node_mut(c);
            promoted.sum -= gc_sum;
            promoted.size -= gc_size;
        }

        // `c` loses `gc` and gets `n` (which now includes `gc`).
        let (n_sum, n_size) = (self.node(n).sum.clone(), self.node(n).size);
        let promoted = self.node_mut(c);
        promoted.parent = parent;
        promoted.children[dir.index()] = Some(n);
        promoted.sum += n_sum;
        promoted.size += n_size;

        if cfg!(debug_assertions) {
            self.assert_aggregates(n);
            self.assert_aggregates(c);
        }
    }

    /// Asserts the sum and size stored in `id` agree with its key and its children's stored
    /// values.
    fn assert_aggregates(&self, id: NodeId) {
        let node = self.node(id);
        let mut sum = node.key.clone();
        let mut size = 1;
        for child in node.children.into_iter().flatten() {
            sum += self.node(child).sum.clone();
            size += self.node(child).size;
        }
        assert!(sum == node.sum, "Stored sum disagrees with children");
        assert_eq!(size, node.size);
    }

    fn debug_assert_root(&self) {
        if cfg!(debug_assertions) {
            if let Some(root) = self.root {
                assert_eq!(self.color(root), Color::Black);
                assert!(self.parent(root).is_none());
            }
        }
    }
}

/// What [`Tree::validate_node`] recomputes for a subtree.
struct Checked<K> {
    /// Black nodes on every path from the subtree's root (inclusive) to an empty slot.
    black_height: usize,
    sum: K,
    size: usize,
}

impl<K> fmt::Debug for Tree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.root.map(|id| DebugNode { tree: self, id });
        f.debug_struct("Tree").field("root", &root).finish()
    }
}

/// A view of one node (and, through it, its subtree) for `Debug` output.
struct DebugNode<'a, K> {
    tree: &'a Tree<K>,
    id: NodeId,
}

impl<K> fmt::Debug for DebugNode<'_, K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.tree.node(self.id);
        let child = |dir: Dir| {
            node.children[dir.index()].map(|id| DebugNode {
                tree: self.tree,
                id,
            })
        };
        f.debug_struct("Node")
            .field("key", &node.key)
            .field("sum", &node.sum)
            .field("size", &node.size)
            .field("color", &node.color)
            .field("left", &child(Dir::Left))
            .field("right", &child(Dir::Right))
            .finish()
    }
}

/// Writes [`Tree::dump`] straight into a formatter, one node at a time.
struct Dump<'a, K> {
    tree: &'a Tree<K>,
}

impl<K> fmt::Display for Dump<'_, K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Step {
            Visit(Option<NodeId>),
            Close,
        }

        let mut stack = vec![Step::Visit(self.tree.root)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Visit(None) => f.write_str("(null)")?,
                Step::Visit(Some(id)) => {
                    let node = self.tree.node(id);
                    write!(
                        f,
                        "([{},{},{},{}] ",
                        node.key,
                        node.sum,
                        node.size,
                        node.color.letter()
                    )?;
                    // Pushed in reverse so the left child comes out first.
                    stack.push(Step::Close);
                    stack.push(Step::Visit(node.children[Dir::Right.index()]));
                    stack.push(Step::Visit(node.children[Dir::Left.index()]));
                }
                Step::Close => f.write_str(")")?,
            }
        }
        Ok(())
    }
}

impl<K> FromIterator<K> for Tree<K>
where
    K: Summable,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K> Extend<K> for Tree<K>
where
    K: Summable,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a Tree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the keys of a [`Tree`], created by [`Tree::iter`].
pub struct Iter<'a, K> {
    tree: &'a Tree<K>,
    /// Nodes whose left subtree has been (or is being) visited but who haven't been yielded.
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn new(tree: &'a Tree<K>) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
            remaining: tree.size(),
        };
        iter.push_left_spine(tree.root);
        iter
    }

    fn push_left_spine(&mut self, mut cur: Option<NodeId>) {
        while let Some(id) = cur {
            self.stack.push(id);
            cur = self.tree.child(id, Dir::Left);
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let tree = self.tree;
        self.push_left_spine(tree.child(id, Dir::Right));
        self.remaining -= 1;
        Some(&tree.node(id).key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}
