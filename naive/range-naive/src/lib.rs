use std::ops::Range;

use monoid::MonoidAction;
use usize_bounds::UsizeBounds;

/// Flat-array model of range apply / range fold, for differential tests.
/// `apply` loops over the range elementwise; `fold` is a linear fold in
/// index order.
pub struct NaiveRange<A: MonoidAction> {
    data: Vec<A::Set>,
    action: A,
}

impl<A: MonoidAction> NaiveRange<A> {
    pub fn new(len: usize, action: A) -> Self {
        let data = (0..len).map(|_| action.id()).collect();
        Self { data, action }
    }

    pub fn len(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    pub fn apply(&mut self, range: impl UsizeBounds, f: A::Operand) {
        let Range { start, end } = range.to_range(self.data.len());
        let Self { data, action } = self;
        for x in &mut data[start..end] {
            *x = action.apply(x, &f, 1);
        }
    }

    pub fn fold(&self, range: impl UsizeBounds) -> A::Set {
        let Range { start, end } = range.to_range(self.data.len());
        self.data[start..end]
            .iter()
            .fold(self.action.id(), |acc, x| self.action.op(&acc, x))
    }
}

impl<A: MonoidAction> From<(Vec<A::Set>, A)> for NaiveRange<A> {
    fn from((data, action): (Vec<A::Set>, A)) -> Self { Self { data, action } }
}

impl<A: MonoidAction + Default> From<Vec<A::Set>> for NaiveRange<A> {
    fn from(data: Vec<A::Set>) -> Self { (data, A::default()).into() }
}

impl<A: MonoidAction> From<NaiveRange<A>> for Vec<A::Set> {
    fn from(naive: NaiveRange<A>) -> Self { naive.data }
}

#[test]
fn sanity_check() {
    use op_add::OpAdd;

    let mut naive: NaiveRange<OpAdd<i64>> = vec![1, 2, 3, 4, 5].into();
    assert_eq!(naive.fold(..), 15);
    naive.apply(1..4, 10);
    assert_eq!(naive.fold(..), 45);
    assert_eq!(naive.fold(1..3), 25);
    assert_eq!(naive.fold(2..2), 0);
    assert_eq!(Vec::from(naive), vec![1, 12, 13, 14, 5]);
}
