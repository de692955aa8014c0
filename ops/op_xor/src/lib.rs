use std::marker::PhantomData;
use std::ops::BitXor;

use monoid::{Apply, Associative, BinaryOp, Commutative, Identity};

/// Xor monoid over `T`. Xoring `f` into every element of a segment flips
/// the fold only when the segment length is odd; even lengths cancel.
pub struct OpXor<T>(PhantomData<fn(&T) -> T>);

impl<T> Default for OpXor<T> {
    fn default() -> Self { Self(PhantomData) }
}

impl<T> Clone for OpXor<T> {
    fn clone(&self) -> Self { Self(PhantomData) }
}

impl<T> BinaryOp for OpXor<T>
where
    for<'a> &'a T: BitXor<&'a T, Output = T>,
{
    type Set = T;
    fn op(&self, lhs: &T, rhs: &T) -> T { lhs ^ rhs }
}

impl<T> Identity for OpXor<T>
where
    for<'a> &'a T: BitXor<&'a T, Output = T>,
    T: Default,
{
    fn id(&self) -> T { T::default() }
}

impl<T> Apply for OpXor<T>
where
    for<'a> &'a T: BitXor<&'a T, Output = T>,
    T: Clone,
{
    type Operand = T;
    fn apply(&self, acc: &T, f: &T, len: usize) -> T {
        if len % 2 == 1 {
            acc ^ f
        } else {
            acc.clone()
        }
    }
    fn compose(&self, f: &T, g: &T) -> T { f ^ g }
}

impl<T> Associative for OpXor<T> where for<'a> &'a T: BitXor<&'a T, Output = T> {}
impl<T> Commutative for OpXor<T> where for<'a> &'a T: BitXor<&'a T, Output = T> {}

#[test]
fn sanity_check() {
    let op_xor: OpXor<u32> = Default::default();
    assert_eq!(op_xor.op(&2, &3), 1);
    assert_eq!(op_xor.id(), 0);
    assert_eq!(op_xor.apply(&0b1100, &0b1010, 3), 0b0110);
    assert_eq!(op_xor.apply(&0b1100, &0b1010, 2), 0b1100);
    assert_eq!(op_xor.compose(&0b1010, &0b0110), 0b1100);
}
