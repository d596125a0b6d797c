//! Outcome-level operators, usable with [`Die::apply_two`] and [`Die::map`],
//! and the arithmetic/comparison algebra of [`Die`] built on them.

use std::ops::{Add, Div, Mul, Neg, Sub};

use num::{Integer, Signed, Zero};

use crate::{Die, Error, Result, Value};

pub fn add<L, R>(lhs: &L, rhs: &R) -> L::Output
where
    L: Value + Add<R>,
    R: Value,
{
    lhs.clone().add(rhs.clone())
}

pub fn sub<L, R>(lhs: &L, rhs: &R) -> L::Output
where
    L: Value + Sub<R>,
    R: Value,
{
    lhs.clone().sub(rhs.clone())
}

pub fn mul<L, R>(lhs: &L, rhs: &R) -> L::Output
where
    L: Value + Mul<R>,
    R: Value,
{
    lhs.clone().mul(rhs.clone())
}

pub fn div<L, R>(lhs: &L, rhs: &R) -> L::Output
where
    L: Value + Div<R>,
    R: Value,
{
    lhs.clone().div(rhs.clone())
}

pub fn lt<T: PartialOrd>(lhs: &T, rhs: &T) -> bool {
    lhs < rhs
}

pub fn le<T: PartialOrd>(lhs: &T, rhs: &T) -> bool {
    lhs <= rhs
}

pub fn eq<T: PartialEq>(lhs: &T, rhs: &T) -> bool {
    lhs == rhs
}

pub fn ne<T: PartialEq>(lhs: &T, rhs: &T) -> bool {
    lhs != rhs
}

pub fn ge<T: PartialOrd>(lhs: &T, rhs: &T) -> bool {
    lhs >= rhs
}

pub fn gt<T: PartialOrd>(lhs: &T, rhs: &T) -> bool {
    lhs > rhs
}

impl<T> Die<T>
where
    T: Value,
{
    #[must_use]
    pub fn plus(&self, rhs: &Die<T>) -> Die<T>
    where
        T: Add<Output = T>,
    {
        self.apply_two(rhs, add)
    }

    #[must_use]
    pub fn minus(&self, rhs: &Die<T>) -> Die<T>
    where
        T: Sub<Output = T>,
    {
        self.apply_two(rhs, sub)
    }

    #[must_use]
    pub fn times(&self, rhs: &Die<T>) -> Die<T>
    where
        T: Mul<Output = T>,
    {
        self.apply_two(rhs, mul)
    }

    /// Division with the outcome type's own rounding (truncation for primitives).
    pub fn divided_by(&self, rhs: &Die<T>) -> Result<Die<T>>
    where
        T: Div<Output = T> + Zero,
    {
        reject_zero(rhs)?;
        Ok(self.apply_two(rhs, div))
    }

    /// Division rounding toward negative infinity.
    pub fn floor_div(&self, rhs: &Die<T>) -> Result<Die<T>>
    where
        T: Integer,
    {
        reject_zero(rhs)?;
        Ok(self.apply_two(rhs, |a, b| a.div_floor(b)))
    }

    /// Remainder with the sign of the divisor.
    pub fn modulo(&self, rhs: &Die<T>) -> Result<Die<T>>
    where
        T: Integer,
    {
        reject_zero(rhs)?;
        Ok(self.apply_two(rhs, |a, b| a.mod_floor(b)))
    }

    #[must_use]
    pub fn negate(&self) -> Die<T>
    where
        T: Neg<Output = T>,
    {
        self.map(|x| -x.clone())
    }

    #[must_use]
    pub fn abs(&self) -> Die<T>
    where
        T: Signed,
    {
        self.map(Signed::abs)
    }

    /// Adds a constant to every outcome.
    #[must_use]
    pub fn shift(&self, offset: &T) -> Die<T>
    where
        T: Add<Output = T>,
    {
        self.map(|x| add(x, offset))
    }

    #[must_use]
    pub fn is_eq(&self, rhs: &Die<T>) -> Die<bool> {
        self.apply_two(rhs, eq)
    }

    #[must_use]
    pub fn is_ne(&self, rhs: &Die<T>) -> Die<bool> {
        self.apply_two(rhs, ne)
    }

    #[must_use]
    pub fn is_lt(&self, rhs: &Die<T>) -> Die<bool>
    where
        T: PartialOrd,
    {
        self.apply_two(rhs, lt)
    }

    #[must_use]
    pub fn is_le(&self, rhs: &Die<T>) -> Die<bool>
    where
        T: PartialOrd,
    {
        self.apply_two(rhs, le)
    }

    #[must_use]
    pub fn is_gt(&self, rhs: &Die<T>) -> Die<bool>
    where
        T: PartialOrd,
    {
        self.apply_two(rhs, gt)
    }

    #[must_use]
    pub fn is_ge(&self, rhs: &Die<T>) -> Die<bool>
    where
        T: PartialOrd,
    {
        self.apply_two(rhs, ge)
    }

    /// `-1`, `0` or `1` as each pair of outcomes compares.
    #[must_use]
    pub fn vs(&self, rhs: &Die<T>) -> Die<i8>
    where
        T: Ord,
    {
        self.apply_two(rhs, |a, b| a.cmp(b) as i8)
    }

    /// `0` where `self - rhs` lies in `lo..=hi`, `-1` below it, `1` above it.
    #[must_use]
    pub fn within(&self, lo: &T, hi: &T, rhs: &Die<T>) -> Die<i8>
    where
        T: Ord + Sub<Output = T>,
    {
        self.apply_two(rhs, |a, b| {
            let diff = sub(a, b);
            if &diff < lo {
                -1
            } else if &diff > hi {
                1
            } else {
                0
            }
        })
    }

    #[must_use]
    pub fn max(&self, rhs: &Die<T>) -> Die<T>
    where
        T: Ord,
    {
        self.apply_two(rhs, |a, b| a.max(b).clone())
    }

    #[must_use]
    pub fn min(&self, rhs: &Die<T>) -> Die<T>
    where
        T: Ord,
    {
        self.apply_two(rhs, |a, b| a.min(b).clone())
    }
}

fn reject_zero<T>(die: &Die<T>) -> Result<()>
where
    T: Value + Zero,
{
    if die.values().iter().any(Zero::is_zero) {
        return Err(Error::DivisionByZero);
    }
    Ok(())
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $named:ident) => {
        impl<T> $trait<&Die<T>> for &Die<T>
        where
            T: Value + $trait<Output = T>,
        {
            type Output = Die<T>;

            fn $method(self, rhs: &Die<T>) -> Self::Output {
                self.$named(rhs)
            }
        }

        impl<T> $trait<Die<T>> for Die<T>
        where
            T: Value + $trait<Output = T>,
        {
            type Output = Die<T>;

            fn $method(self, rhs: Die<T>) -> Self::Output {
                self.$named(&rhs)
            }
        }

        impl<T> $trait<&Die<T>> for Die<T>
        where
            T: Value + $trait<Output = T>,
        {
            type Output = Die<T>;

            fn $method(self, rhs: &Die<T>) -> Self::Output {
                self.$named(rhs)
            }
        }

        impl<T> $trait<Die<T>> for &Die<T>
        where
            T: Value + $trait<Output = T>,
        {
            type Output = Die<T>;

            fn $method(self, rhs: Die<T>) -> Self::Output {
                self.$named(&rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, plus);
impl_binary_op!(Sub, sub, minus);
impl_binary_op!(Mul, mul, times);

impl<T> Neg for &Die<T>
where
    T: Value + Neg<Output = T>,
{
    type Output = Die<T>;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl<T> Neg for Die<T>
where
    T: Value + Neg<Output = T>,
{
    type Output = Die<T>;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Count;

    fn pairs<T: Value + Copy>(d: &Die<T>) -> Vec<(T, u64)> {
        d.iter()
            .map(|(v, c)| (*v, u64::try_from(c.clone()).unwrap()))
            .collect()
    }

    #[test]
    fn two_d6_sum() {
        let d6 = Die::numeric(6);
        assert_eq!(
            pairs(&(&d6 + &d6)),
            vec![
                (2, 1),
                (3, 2),
                (4, 3),
                (5, 4),
                (6, 5),
                (7, 6),
                (8, 5),
                (9, 4),
                (10, 3),
                (11, 2),
                (12, 1)
            ]
        );
    }

    #[test]
    fn comparisons_produce_bool_dice() {
        let d6 = Die::numeric(6);
        let four = Die::scalar(4);
        assert_eq!(pairs(&d6.is_ge(&four)), vec![(false, 3), (true, 3)]);
        assert_eq!(pairs(&d6.is_lt(&four)), vec![(false, 3), (true, 3)]);
        assert_eq!(pairs(&d6.is_eq(&four)), vec![(false, 5), (true, 1)]);
        assert_eq!(pairs(&d6.is_ne(&d6)), vec![(false, 6), (true, 30)]);
        assert_eq!(pairs(&d6.is_gt(&d6)), vec![(false, 21), (true, 15)]);
        assert_eq!(pairs(&d6.is_le(&d6)), vec![(false, 15), (true, 21)]);
    }

    #[test]
    fn vs_and_within() {
        let d6 = Die::numeric(6);
        assert_eq!(pairs(&d6.vs(&d6)), vec![(-1, 15), (0, 6), (1, 15)]);
        assert_eq!(pairs(&d6.within(&-1, &1, &d6)), vec![(-1, 10), (0, 16), (1, 10)]);
    }

    #[test]
    fn unary_operations_keep_total() {
        let d = Die::new([(-2, 1u32), (1, 2u32), (2, 3u32)]);
        assert_eq!(pairs(&d.abs()), vec![(1, 2), (2, 4)]);
        assert_eq!(pairs(&-&d), vec![(-2, 3), (-1, 2), (2, 1)]);
        assert_eq!(pairs(&d.shift(&10)), vec![(8, 1), (11, 2), (12, 3)]);
        assert_eq!(d.abs().total(), d.total());
    }

    #[test]
    fn division_family() {
        let num = Die::new([(-7, 1u32), (7, 1u32)]);
        let den = Die::scalar(2);
        assert_eq!(pairs(&num.divided_by(&den).unwrap()), vec![(-3, 1), (3, 1)]);
        assert_eq!(pairs(&num.floor_div(&den).unwrap()), vec![(-4, 1), (3, 1)]);
        assert_eq!(pairs(&num.modulo(&Die::scalar(3)).unwrap()), vec![(1, 1), (2, 1)]);
        assert_eq!(num.floor_div(&Die::numeric(2).minus(&Die::scalar(1))), Err(Error::DivisionByZero));
    }

    #[test]
    fn product_and_difference() {
        let d2 = Die::numeric(2);
        assert_eq!(pairs(&(&d2 * &d2)), vec![(1, 1), (2, 2), (4, 1)]);
        assert_eq!(pairs(&(d2.clone() - d2)), vec![(-1, 1), (0, 2), (1, 1)]);
    }

    #[test]
    fn pairwise_total_is_product_of_totals() {
        let a = Die::new([(1, 2u32), (5, 3u32)]);
        let b = Die::numeric(4);
        assert_eq!(*(&a + &b).total(), Count::from(20u32));
        assert_eq!(*a.max(&b).total(), Count::from(20u32));
        assert_eq!(*a.min(&b).total(), Count::from(20u32));
    }
}
