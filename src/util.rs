use std::ops::{AddAssign, Not, SubAssign};

use num_traits::Zero;

/// Which child slot of a node we're talking about. Children are stored in a 2-element array so
/// that every rotation and fixup case is written once and parameterized by direction instead of
/// being duplicated for left and right.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Dir {
    /// The index of this side in a node's `children` array.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl Not for Dir {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    /// The single letter used for this color in [`Tree::dump`][crate::rbtree::Tree::dump].
    pub(crate) fn letter(self) -> char {
        match self {
            Self::Red => 'R',
            Self::Black => 'B',
        }
    }
}

/// Keys that can be stored in a [`Tree`][crate::rbtree::Tree]. A key is both the thing the tree
/// is ordered by and the thing that gets summed, so besides a total order it needs a zero and
/// in-place addition and subtraction. Anything satisfying those bounds (all the primitive
/// numeric types, for instance) gets this for free.
pub trait Summable: Ord + Clone + Zero + AddAssign + SubAssign {}

impl<T> Summable for T where T: Ord + Clone + Zero + AddAssign + SubAssign {}
