pub trait BinaryOp {
    type Set;
    fn op(&self, lhs: &Self::Set, rhs: &Self::Set) -> Self::Set;
}

pub trait Identity: BinaryOp {
    fn id(&self) -> Self::Set;
}

pub trait Associative {}

pub trait Commutative {}

/// Length-aware action of an operand set on the folded set.
///
/// Contract (not checkable at runtime): `apply` must distribute over
/// `op`, i.e. applying `f` to a fold of `len` elements agrees with
/// folding the `len` elementwise applications. `compose(f, g)` is the
/// single operand equivalent to applying `g` first and `f` second.
pub trait Apply: BinaryOp {
    type Operand;
    fn apply(&self, acc: &Self::Set, f: &Self::Operand, len: usize) -> Self::Set;
    fn compose(&self, f: &Self::Operand, g: &Self::Operand) -> Self::Operand;
}

pub trait Monoid: BinaryOp + Associative + Identity {}
pub trait CommutativeMonoid: BinaryOp + Associative + Identity + Commutative {}
pub trait MonoidAction: Monoid + Apply {}

impl<T: BinaryOp + Associative + Identity> Monoid for T {}
impl<T: BinaryOp + Associative + Identity + Commutative> CommutativeMonoid for T {}
impl<T: Monoid + Apply> MonoidAction for T {}

#[macro_export]
macro_rules! def_monoid {
    (
        $vis:vis $name:ident = ($ty:ty, $op:expr, $id:expr $(,)?)
    ) => {
        $vis struct $name;
        impl $crate::BinaryOp for $name {
            type Set = $ty;
            fn op(&self, lhs: &Self::Set, rhs: &Self::Set) -> Self::Set {
                ($op)(lhs, rhs)
            }
        }
        impl $crate::Identity for $name {
            fn id(&self) -> Self::Set { ($id)() }
        }
        impl $crate::Associative for $name {}
        impl Default for $name {
            fn default() -> Self { Self }
        }
    };
    (
        $($vis:vis $name:ident = ($($impl:tt)*)),+ $(,)?
    ) => { $(
        $crate::def_monoid! { $vis $name = ($($impl)*) }
    )+ };
}

#[macro_export]
macro_rules! def_action {
    (
        $vis:vis $name:ident = (
            $ty:ty, $op:expr, $id:expr;
            $opnd:ty, $apply:expr, $compose:expr $(,)?
        )
    ) => {
        $crate::def_monoid! { $vis $name = ($ty, $op, $id) }
        impl $crate::Apply for $name {
            type Operand = $opnd;
            fn apply(
                &self,
                acc: &Self::Set,
                f: &Self::Operand,
                len: usize,
            ) -> Self::Set {
                ($apply)(acc, f, len)
            }
            fn compose(
                &self,
                f: &Self::Operand,
                g: &Self::Operand,
            ) -> Self::Operand {
                ($compose)(f, g)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_monoid() {
        def_monoid! {
            OpXor = (u32, |x: &u32, y: &u32| x ^ y, || 0),
            OpAdd = (i32, |x: &i32, y: &i32| x + y, || 0),
        }

        let xor = OpXor;
        assert_eq!(xor.id(), 0);
        assert_eq!(xor.op(&2, &3), 1);

        let add = OpAdd::default();
        assert_eq!(add.id(), 0);
        assert_eq!(add.op(&2, &3), 5);
    }

    #[test]
    fn simple_action() {
        def_action! {
            OpAssignSum = (
                i64, |x: &i64, y: &i64| x + y, || 0;
                i64,
                |_: &i64, f: &i64, len: usize| f * len as i64,
                |f: &i64, _: &i64| *f,
            )
        }

        let assign = OpAssignSum;
        assert_eq!(assign.op(&2, &3), 5);
        assert_eq!(assign.apply(&10, &7, 4), 28);
        // composing keeps the later assignment
        assert_eq!(assign.compose(&7, &5), 7);
    }

    #[test]
    fn blanket_aliases() {
        def_action! {
            OpAddSum = (
                i64, |x: &i64, y: &i64| x + y, || 0;
                i64,
                |acc: &i64, f: &i64, len: usize| acc + f * len as i64,
                |f: &i64, g: &i64| f + g,
            )
        }

        fn fold_all<M: Monoid>(monoid: &M, elts: &[M::Set]) -> M::Set {
            elts.iter().fold(monoid.id(), |acc, x| monoid.op(&acc, x))
        }
        fn apply_each<A: MonoidAction>(
            action: &A,
            elts: &mut [A::Set],
            f: &A::Operand,
        ) {
            for x in elts.iter_mut() {
                *x = action.apply(x, f, 1);
            }
        }

        let action = OpAddSum;
        let mut elts = [1, 2, 3];
        apply_each(&action, &mut elts, &10);
        assert_eq!(fold_all(&action, &elts), 36);
        assert_eq!(action.apply(&6, &10, 3), 36);
    }
}
