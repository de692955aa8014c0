use std::iter::Sum;
use std::marker::PhantomData;
use std::ops::{Add, Mul};

use monoid::{Apply, Associative, BinaryOp, Commutative, Identity};

/// Sum monoid over `T`, acting on ranges by elementwise addition: a delta
/// `d` spread over `len` elements shifts the fold by `d * len`.
pub struct OpAdd<T>(PhantomData<fn(&T) -> T>);

impl<T> Default for OpAdd<T> {
    fn default() -> Self { Self(PhantomData) }
}

impl<T> Clone for OpAdd<T> {
    fn clone(&self) -> Self { Self(PhantomData) }
}

impl<T> BinaryOp for OpAdd<T>
where
    for<'a> &'a T: Add<&'a T, Output = T>,
{
    type Set = T;
    fn op(&self, lhs: &T, rhs: &T) -> T { lhs + rhs }
}

impl<T> Identity for OpAdd<T>
where
    for<'a> &'a T: Add<&'a T, Output = T>,
    T: for<'a> Sum<&'a T>,
{
    fn id(&self) -> T { None.into_iter().sum() }
}

impl<T> Apply for OpAdd<T>
where
    for<'a> &'a T: Add<&'a T, Output = T> + Mul<T, Output = T>,
    T: TryFrom<usize>,
{
    type Operand = T;
    // panics if `len` is not representable in `T`
    fn apply(&self, acc: &T, f: &T, len: usize) -> T {
        let len = match T::try_from(len) {
            Ok(len) => len,
            Err(_) => panic!("segment length {len} overflows the element type"),
        };
        acc + &(f * len)
    }
    fn compose(&self, f: &T, g: &T) -> T { f + g }
}

impl<T> Associative for OpAdd<T> where for<'a> &'a T: Add<&'a T, Output = T> {}
impl<T> Commutative for OpAdd<T> where for<'a> &'a T: Add<&'a T, Output = T> {}

#[test]
fn sanity_check() {
    let op_add: OpAdd<i64> = Default::default();
    assert_eq!(op_add.op(&1, &2), 3);
    assert_eq!(op_add.id(), 0);
    assert_eq!(op_add.apply(&10, &-2, 3), 4);
    assert_eq!(op_add.compose(&1, &2), 3);
}
