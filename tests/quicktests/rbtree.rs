use rbsum::rbtree::Tree;

use std::collections::{BTreeSet, HashSet};

use quickcheck_macros::quickcheck;

use crate::Op;

/// Applies a set of operations to a tree and a `BTreeSet`, returning `false` as soon as the
/// two disagree on a prefix sum or on their in-order contents.
fn do_ops(ops: &[Op<i8>], tree: &mut Tree<i64>, set: &mut BTreeSet<i64>) -> bool {
    for op in ops {
        let agrees = match *op {
            Op::Insert(k) => tree.insert(i64::from(k)) == set.insert(i64::from(k)),
            Op::Erase(k) => tree.erase(&i64::from(k)) == set.remove(&i64::from(k)),
            Op::PrefixSum(k) => tree.prefix_sum(k) == set.iter().take(k).sum::<i64>(),
            Op::Iter => tree.iter().eq(set.iter()),
        };
        if !agrees {
            return false;
        }
    }

    true
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set)
        && tree.validate().is_ok()
        && tree.size() == set.len()
        && tree.iter().eq(set.iter())
        && (0..=set.len()).all(|k| tree.prefix_sum(k) == set.iter().take(k).sum::<i64>())
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let tree: Tree<i64> = xs.iter().copied().map(i64::from).collect();

    xs.iter().all(|x| tree.find(&i64::from(*x)))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree: Tree<i64> = xs.iter().copied().map(i64::from).collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| !tree.find(&i64::from(*x)))
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree: Tree<i64> = xs.iter().copied().map(i64::from).collect();
    for delete in &deletes {
        tree.erase(&i64::from(*delete));
    }

    let mut still_present = xs;
    still_present.retain(|x| !deletes.contains(x));

    tree.validate().is_ok()
        && deletes.iter().all(|x| !tree.find(&i64::from(*x)))
        && still_present.iter().all(|x| tree.find(&i64::from(*x)))
}

#[quickcheck]
fn inserting_twice_is_inserting_once(xs: Vec<i8>) -> bool {
    let once: Tree<i64> = xs.iter().copied().map(i64::from).collect();
    let mut twice = once.clone();
    for x in &xs {
        twice.insert(i64::from(*x));
    }

    twice.dump() == once.dump()
}

#[quickcheck]
fn insert_then_erase_restores_keys_and_sums(xs: Vec<i8>, extra: i8) -> bool {
    let mut tree: Tree<i64> = xs.iter().copied().map(i64::from).collect();
    let extra = i64::from(extra);
    if tree.find(&extra) {
        return true;
    }
    let keys = tree.iter().copied().collect::<Vec<_>>();
    let sums = (0..=tree.size()).map(|k| tree.prefix_sum(k)).collect::<Vec<_>>();

    tree.insert(extra);
    tree.erase(&extra);

    tree.validate().is_ok()
        && tree.iter().copied().collect::<Vec<_>>() == keys
        && (0..=tree.size()).map(|k| tree.prefix_sum(k)).collect::<Vec<_>>() == sums
}

#[quickcheck]
fn select_matches_sorted(xs: Vec<i8>) -> bool {
    let tree: Tree<i64> = xs.iter().copied().map(i64::from).collect();
    let sorted: BTreeSet<i64> = xs.iter().copied().map(i64::from).collect();

    sorted
        .iter()
        .enumerate()
        .all(|(rank, key)| tree.select(rank) == Some(key))
        && tree.select(sorted.len()).is_none()
}

#[test]
fn queries_between_mutations_agree() {
    let ops = [
        Op::Insert(5),
        Op::Insert(3),
        Op::Insert(8),
        Op::PrefixSum(2),
        Op::Insert(1),
        Op::Erase(3),
        Op::Iter,
        Op::PrefixSum(2),
        Op::Erase(5),
        Op::PrefixSum(200),
        Op::Iter,
    ];
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    assert!(do_ops(&ops, &mut tree, &mut set));
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 8]);
}
