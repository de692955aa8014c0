use std::fmt;
use std::ops::Range;

use monoid::MonoidAction;
use usize_bounds::{OutOfBounds, UsizeBounds};

/// Segment tree over `[0, len)` with lazily propagated range operations.
///
/// Nodes live in an implicit 1-indexed binary tree (`2i`/`2i + 1`
/// children, segments bisected at the midpoint). Each node caches the
/// fold of its segment; a pending operand recorded at a node is already
/// folded into that node's own cache but not yet into its children.
/// Before a partially overlapping segment is descended into, for reads
/// and writes alike, the pending operand is pushed one level down; on
/// the way back up the cache is recombined from the children. Leaves
/// never hold a pending operand.
///
/// `fold` takes `&mut self` because reads push pending operands too, so
/// the structure cannot be shared between threads mid-operation without
/// external locking.
pub struct LazyRangeTree<A: MonoidAction> {
    data: Vec<A::Set>,
    pending: Vec<Option<A::Operand>>,
    len: usize,
    action: A,
}

impl<A: MonoidAction> LazyRangeTree<A>
where
    A::Set: Clone,
    A::Operand: Clone,
{
    pub fn new(len: usize, action: A) -> Self {
        let data = (0..4 * len).map(|_| action.id()).collect();
        let pending = (0..4 * len).map(|_| None).collect();
        Self { data, pending, len, action }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Folds `f` into every element of `range`. Panics on an invalid
    /// range, before any mutation.
    pub fn apply(&mut self, range: impl UsizeBounds, f: A::Operand) {
        let Range { start, end } = range.to_range(self.len);
        if start < end {
            self.apply_rec(1, 0, self.len, start, end, &f);
        }
    }

    /// Fold of the elements of `range`, in index order. Panics on an
    /// invalid range.
    pub fn fold(&mut self, range: impl UsizeBounds) -> A::Set {
        let Range { start, end } = range.to_range(self.len);
        if start < end {
            self.fold_rec(1, 0, self.len, start, end)
        } else {
            self.action.id()
        }
    }

    pub fn checked_apply(
        &mut self,
        range: impl UsizeBounds,
        f: A::Operand,
    ) -> Result<(), OutOfBounds> {
        let Range { start, end } = range.checked_to_range(self.len)?;
        if start < end {
            self.apply_rec(1, 0, self.len, start, end, &f);
        }
        Ok(())
    }

    pub fn checked_fold(
        &mut self,
        range: impl UsizeBounds,
    ) -> Result<A::Set, OutOfBounds> {
        let Range { start, end } = range.checked_to_range(self.len)?;
        Ok(if start < end {
            self.fold_rec(1, 0, self.len, start, end)
        } else {
            self.action.id()
        })
    }

    // Folds `f` into node `v`'s cache and queues it for the children.
    // Leaves take the operand immediately and queue nothing.
    fn apply_at(&mut self, v: usize, len: usize, f: &A::Operand) {
        self.data[v] = self.action.apply(&self.data[v], f, len);
        if len > 1 {
            self.pending[v] = Some(match self.pending[v].take() {
                Some(g) => self.action.compose(f, &g),
                None => f.clone(),
            });
        }
    }

    // Moves `v`'s pending operand down to both children.
    fn push(&mut self, v: usize, nl: usize, nr: usize) {
        if let Some(f) = self.pending[v].take() {
            let mid = nl + (nr - nl) / 2;
            self.apply_at(2 * v, mid - nl, &f);
            self.apply_at(2 * v + 1, nr - mid, &f);
        }
    }

    fn apply_rec(
        &mut self,
        v: usize,
        nl: usize,
        nr: usize,
        start: usize,
        end: usize,
        f: &A::Operand,
    ) {
        if start <= nl && nr <= end {
            self.apply_at(v, nr - nl, f);
            return;
        }
        self.push(v, nl, nr);
        let mid = nl + (nr - nl) / 2;
        if start < mid {
            self.apply_rec(2 * v, nl, mid, start, end, f);
        }
        if mid < end {
            self.apply_rec(2 * v + 1, mid, nr, start, end, f);
        }
        self.data[v] = self.action.op(&self.data[2 * v], &self.data[2 * v + 1]);
    }

    fn fold_rec(
        &mut self,
        v: usize,
        nl: usize,
        nr: usize,
        start: usize,
        end: usize,
    ) -> A::Set {
        if start <= nl && nr <= end {
            return self.data[v].clone();
        }
        self.push(v, nl, nr);
        let mid = nl + (nr - nl) / 2;
        if end <= mid {
            self.fold_rec(2 * v, nl, mid, start, end)
        } else if mid <= start {
            self.fold_rec(2 * v + 1, mid, nr, start, end)
        } else {
            let lhs = self.fold_rec(2 * v, nl, mid, start, end);
            let rhs = self.fold_rec(2 * v + 1, mid, nr, start, end);
            self.action.op(&lhs, &rhs)
        }
    }

    fn build(&mut self, v: usize, nl: usize, nr: usize, elts: &[A::Set]) {
        if nr - nl == 1 {
            self.data[v] = elts[nl].clone();
            return;
        }
        let mid = nl + (nr - nl) / 2;
        self.build(2 * v, nl, mid, elts);
        self.build(2 * v + 1, mid, nr, elts);
        self.data[v] = self.action.op(&self.data[2 * v], &self.data[2 * v + 1]);
    }

    fn drain(&mut self, v: usize, nl: usize, nr: usize, out: &mut Vec<A::Set>) {
        if nr - nl == 1 {
            out.push(self.data[v].clone());
            return;
        }
        self.push(v, nl, nr);
        let mid = nl + (nr - nl) / 2;
        self.drain(2 * v, nl, mid, out);
        self.drain(2 * v + 1, mid, nr, out);
    }
}

impl<A: MonoidAction> From<(Vec<A::Set>, A)> for LazyRangeTree<A>
where
    A::Set: Clone,
    A::Operand: Clone,
{
    fn from((elts, action): (Vec<A::Set>, A)) -> Self {
        let len = elts.len();
        let mut tree = Self::new(len, action);
        if len > 0 {
            tree.build(1, 0, len, &elts);
        }
        tree
    }
}

impl<A: MonoidAction + Default> From<Vec<A::Set>> for LazyRangeTree<A>
where
    A::Set: Clone,
    A::Operand: Clone,
{
    fn from(elts: Vec<A::Set>) -> Self { (elts, A::default()).into() }
}

impl<A: MonoidAction + Default> FromIterator<A::Set> for LazyRangeTree<A>
where
    A::Set: Clone,
    A::Operand: Clone,
{
    fn from_iter<I: IntoIterator<Item = A::Set>>(iter: I) -> Self {
        let buf: Vec<_> = iter.into_iter().collect();
        buf.into()
    }
}

impl<A: MonoidAction> From<LazyRangeTree<A>> for Vec<A::Set>
where
    A::Set: Clone,
    A::Operand: Clone,
{
    fn from(mut tree: LazyRangeTree<A>) -> Self {
        let mut out = Vec::with_capacity(tree.len);
        if tree.len > 0 {
            tree.drain(1, 0, tree.len, &mut out);
        }
        out
    }
}

impl<A: MonoidAction> LazyRangeTree<A>
where
    A::Set: Clone + fmt::Debug,
    A::Operand: Clone,
{
    // Renders a leaf's logical value with the ancestors' still-pending
    // operands composed in. Ancestor operands are newer than descendant
    // ones, so `carried` composes on the outside.
    fn debug_rec(
        &self,
        v: usize,
        nl: usize,
        nr: usize,
        carried: Option<A::Operand>,
        list: &mut fmt::DebugList<'_, '_>,
    ) {
        if nr - nl == 1 {
            match carried {
                Some(f) => list.entry(&self.action.apply(&self.data[v], &f, 1)),
                None => list.entry(&self.data[v]),
            };
            return;
        }
        let carried = match (&carried, &self.pending[v]) {
            (Some(f), Some(g)) => Some(self.action.compose(f, g)),
            (Some(f), None) => Some(f.clone()),
            (None, Some(g)) => Some(g.clone()),
            (None, None) => None,
        };
        let mid = nl + (nr - nl) / 2;
        self.debug_rec(2 * v, nl, mid, carried.clone(), list);
        self.debug_rec(2 * v + 1, mid, nr, carried, list);
    }
}

impl<A: MonoidAction> fmt::Debug for LazyRangeTree<A>
where
    A::Set: Clone + fmt::Debug,
    A::Operand: Clone,
{
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = fmt.debug_list();
        if self.len > 0 {
            self.debug_rec(1, 0, self.len, None, &mut list);
        }
        list.finish()
    }
}

#[test]
fn sanity_check() {
    use op_add::OpAdd;

    let mut tree: LazyRangeTree<OpAdd<i64>> = vec![1, 2, 3].into();
    assert_eq!(tree.fold(..), 6);
    tree.apply(1..2, -2);
    assert_eq!(tree.fold(..), 4);
    assert_eq!(tree.fold(1..=1), 0);
}

#[test]
fn add_spread() {
    use op_add::OpAdd;

    let mut tree = LazyRangeTree::new(5, OpAdd::<i64>::default());
    for (i, v) in [1, 2, 3, 4, 5].into_iter().enumerate() {
        tree.apply(i..=i, v);
    }
    for (i, v) in [1, 2, 3, 4, 5].into_iter().enumerate() {
        assert_eq!(tree.fold(i..=i), v);
    }
    tree.apply(1..=3, 10);
    assert_eq!(tree.fold(0..=4), 45);
    assert_eq!(tree.fold(1..=2), 25);
    assert_eq!(Vec::from(tree), vec![1, 12, 13, 14, 5]);
}

#[test]
fn xor_parity() {
    use op_xor::OpXor;

    let mut tree = LazyRangeTree::new(4, OpXor::<u32>::default());
    tree.apply(0..4, 5);
    assert_eq!(tree.fold(0..2), 0);
    tree.apply(2..=2, 3);
    assert_eq!(tree.fold(2..4), (5 ^ 3) ^ 5);
    assert_eq!(Vec::from(tree), vec![5, 5, 5 ^ 3, 5]);
}

#[test]
fn reads_are_idempotent() {
    use op_add::OpAdd;

    let mut tree: LazyRangeTree<OpAdd<i64>> = (1..=8).collect();
    tree.apply(2..7, 100);
    let first = tree.fold(1..6);
    assert_eq!(tree.fold(1..6), first);
    assert_eq!(tree.fold(1..6), first);
}

#[test]
fn fold_is_in_index_order() {
    use monoid::def_action;

    def_action! {
        OpConcat = (
            Vec<u32>,
            |x: &Vec<u32>, y: &Vec<u32>| x.iter().chain(y).copied().collect(),
            Vec::new;
            Vec<u32>,
            |acc: &Vec<u32>, f: &Vec<u32>, _: usize| {
                acc.iter().chain(f).copied().collect()
            },
            |f: &Vec<u32>, g: &Vec<u32>| g.iter().chain(f).copied().collect(),
        )
    }

    let n = 6;
    let mut tree = LazyRangeTree::new(n, OpConcat);
    for i in 0..n {
        tree.apply(i..=i, vec![i as u32 * 10]);
    }
    for i in 0..n {
        assert_eq!(tree.fold(i..=i), vec![i as u32 * 10]);
    }
    assert_eq!(tree.fold(..), vec![0, 10, 20, 30, 40, 50]);
    assert_eq!(tree.fold(2..5), vec![20, 30, 40]);
}

#[test]
fn assignment_keeps_latest() {
    use monoid::def_action;

    def_action! {
        OpAssignSum = (
            i64, |x: &i64, y: &i64| x + y, || 0;
            i64,
            |_: &i64, f: &i64, len: usize| f * len as i64,
            |f: &i64, _: &i64| *f,
        )
    }

    let mut tree: LazyRangeTree<OpAssignSum> = vec![1, 1, 1, 1].into();
    tree.apply(0..4, 5);
    tree.apply(1..3, 2);
    assert_eq!(tree.fold(..), 14);
    assert_eq!(tree.fold(1..3), 4);
    assert_eq!(Vec::from(tree), vec![5, 2, 2, 5]);

    // the reverse order must keep the wide assignment
    let mut tree: LazyRangeTree<OpAssignSum> = vec![1, 1, 1, 1].into();
    tree.apply(1..3, 2);
    tree.apply(0..4, 5);
    assert_eq!(tree.fold(..), 20);
}

#[test]
fn disjoint_applies_commute() {
    use op_add::OpAdd;

    let init: Vec<i64> = (0..30).map(|i| i * 7 % 13).collect();
    let mut ab: LazyRangeTree<OpAdd<i64>> = init.clone().into();
    ab.apply(2..=9, 100);
    ab.apply(15..=23, -41);
    let mut ba: LazyRangeTree<OpAdd<i64>> = init.into();
    ba.apply(15..=23, -41);
    ba.apply(2..=9, 100);
    assert_eq!(ab.fold(..), ba.fold(..));
    assert_eq!(ab.fold(0..16), ba.fold(0..16));
    assert_eq!(Vec::from(ab), Vec::from(ba));
}

#[test]
fn boundary_segments() {
    use op_add::OpAdd;

    let n = 9;
    let mut tree = LazyRangeTree::new(n, OpAdd::<i64>::default());
    tree.apply(0..=0, 3);
    tree.apply(0..n, 1);
    tree.apply(n - 1..n, 5);
    assert_eq!(tree.fold(0..=0), 4);
    assert_eq!(tree.fold(n - 1..n), 6);
    assert_eq!(tree.fold(0..n), 3 + n as i64 + 5);

    let mut single = LazyRangeTree::new(1, OpAdd::<i64>::default());
    single.apply(0..=0, 42);
    assert_eq!(single.fold(0..=0), 42);
    assert_eq!(single.fold(..), 42);
}

#[test]
fn empty_segments() {
    use op_add::OpAdd;

    let mut tree: LazyRangeTree<OpAdd<i64>> = vec![1, 2, 3].into();
    assert_eq!(tree.fold(2..2), 0);
    tree.apply(1..1, 1000);
    assert_eq!(tree.fold(..), 6);

    let mut empty = LazyRangeTree::new(0, OpAdd::<i64>::default());
    assert!(empty.is_empty());
    assert_eq!(empty.fold(..), 0);
    empty.apply(.., 17);
    assert_eq!(empty.fold(..), 0);
}

#[test]
#[should_panic(expected = "range end index 10 out of range for length 5")]
fn fold_past_len() {
    use op_add::OpAdd;

    let mut tree = LazyRangeTree::new(5, OpAdd::<i64>::default());
    tree.fold(0..10);
}

#[test]
#[should_panic(expected = "range starts at 3 but ends at 1")]
fn apply_inverted() {
    use op_add::OpAdd;

    let mut tree = LazyRangeTree::new(5, OpAdd::<i64>::default());
    tree.apply(3..1, 7);
}

#[test]
fn checked_calls_leave_tree_intact() {
    use op_add::OpAdd;
    use usize_bounds::OobKind;

    let mut tree: LazyRangeTree<OpAdd<i64>> = vec![1, 2, 3, 4, 5].into();
    let err = tree.checked_apply(2..9, 100).unwrap_err();
    assert_eq!(err.kind, OobKind::EndPastLen);
    let err = tree.checked_fold(6..).unwrap_err();
    assert_eq!(err.kind, OobKind::StartPastLen);
    assert_eq!(tree.checked_fold(1..4), Ok(9));
    assert_eq!(tree.fold(..), 15);
}

#[test]
fn debug_shows_logical_elements() {
    use op_add::OpAdd;

    let mut tree: LazyRangeTree<OpAdd<i64>> = vec![1, 2, 3, 4, 5].into();
    tree.apply(1..4, 10);
    tree.apply(0..5, 1);
    // rendering composes the pending operands without flushing them
    assert_eq!(format!("{tree:?}"), "[2, 13, 14, 15, 6]");
    assert_eq!(format!("{tree:?}"), "[2, 13, 14, 15, 6]");
    assert_eq!(tree.fold(..), 50);
}

#[cfg(test)]
mod random_tests {
    use op_add::OpAdd;
    use op_xor::OpXor;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;
    use range_naive::NaiveRange;

    use crate::LazyRangeTree;

    fn segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
        let i = rng.gen_range(0..n);
        let j = rng.gen_range(0..n);
        (i.min(j), i.max(j))
    }

    #[test]
    fn matches_naive_add() {
        let mut rng = ChaCha20Rng::from_seed([0; 32]);
        for n in [1, 2, 3, 10, 257, 1000] {
            let mut tree = LazyRangeTree::new(n, OpAdd::<i64>::default());
            let mut naive = NaiveRange::new(n, OpAdd::<i64>::default());
            for _ in 0..500 {
                let (l, r) = segment(n, &mut rng);
                if rng.gen_bool(0.5) {
                    let val = rng.gen_range(-1000..=1000);
                    tree.apply(l..=r, val);
                    naive.apply(l..=r, val);
                } else {
                    assert_eq!(tree.fold(l..=r), naive.fold(l..=r));
                }
            }
            assert_eq!(tree.fold(..), naive.fold(..));
            assert_eq!(Vec::from(tree), Vec::from(naive));
        }
    }

    #[test]
    fn matches_naive_xor() {
        let mut rng = ChaCha20Rng::from_seed([1; 32]);
        for n in [1, 4, 63, 64, 1000] {
            let mut tree = LazyRangeTree::new(n, OpXor::<u64>::default());
            let mut naive = NaiveRange::new(n, OpXor::<u64>::default());
            for _ in 0..500 {
                let (l, r) = segment(n, &mut rng);
                if rng.gen_bool(0.5) {
                    let val = rng.gen::<u64>();
                    tree.apply(l..=r, val);
                    naive.apply(l..=r, val);
                } else {
                    assert_eq!(tree.fold(l..=r), naive.fold(l..=r));
                }
            }
            assert_eq!(Vec::from(tree), Vec::from(naive));
        }
    }
}
