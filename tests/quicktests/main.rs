//! Property tests against the public API only.

mod rbtree;

use quickcheck::{Arbitrary, Gen};

/// One step of a random workload against the public API. The unit tests have their own
/// generator, but it lives behind `#[cfg(test)]` inside the library and isn't visible from here.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Op<K> {
    Insert(K),
    Erase(K),
    /// Check the sum of this many smallest keys against a reference set.
    PrefixSum(usize),
    /// Check the full in-order sequence against a reference set.
    Iter,
}

impl<K> Arbitrary for Op<K>
where
    K: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 6 {
            0..=2 => Op::Insert(K::arbitrary(g)),
            3 => Op::Erase(K::arbitrary(g)),
            4 => Op::PrefixSum(usize::from(u8::arbitrary(g))),
            _ => Op::Iter,
        }
    }
}
