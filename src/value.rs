use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::{Add, Mul, Neg, Sub};

use num::Zero;

pub type DefaultValue = i32;
pub type ComputedValue = i64;

/// An outcome a die can show.
///
/// Every `Ord` type is a value with a total order. Types without one go through
/// [`Lexical`], which sorts by string rendering so that rolls can still be
/// enumerated. That fallback is an approximation: it does not make order
/// statistics over such outcomes meaningful, and selections that depend on
/// sorting refuse to run on it.
pub trait Value: Sized + Send + Sync + Debug + Clone + Eq + Hash {
    /// Whether [`Value::order`] is a real total order over the values.
    const TOTAL_ORDER: bool;

    fn order(&self, other: &Self) -> Ordering;
}

pub trait ComputableValue: Value {
    fn compute(&self) -> ComputedValue;

    fn compute_f64(&self) -> f64 {
        self.compute() as f64
    }
}

/// Wrapper for outcomes that can be rendered but not compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Lexical<T>(pub T);

macro_rules! impl_computable_value_from {
    ($typ:ty) => {
        impl $crate::value::ComputableValue for $typ {
            fn compute(&self) -> ComputedValue {
                ComputedValue::from(*self)
            }
        }
    };
}

impl<T> Value for T
where
    T: Sized + Send + Sync + Debug + Clone + Eq + Hash + Ord,
{
    const TOTAL_ORDER: bool = true;

    fn order(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl<T> Value for Lexical<T>
where
    T: Sized + Send + Sync + Debug + Display + Clone + Eq + Hash,
{
    const TOTAL_ORDER: bool = false;

    fn order(&self, other: &Self) -> Ordering {
        self.0
            .to_string()
            .cmp(&other.0.to_string())
            .then_with(|| format!("{:?}", self.0).cmp(&format!("{:?}", other.0)))
    }
}

impl<T> Lexical<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Display for Lexical<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> Add for Lexical<T>
where
    T: Add<Output = T>,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Lexical(self.0 + rhs.0)
    }
}

impl<T> Sub for Lexical<T>
where
    T: Sub<Output = T>,
{
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Lexical(self.0 - rhs.0)
    }
}

impl<T> Mul for Lexical<T>
where
    T: Mul<Output = T>,
{
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Lexical(self.0 * rhs.0)
    }
}

impl<T> Neg for Lexical<T>
where
    T: Neg<Output = T>,
{
    type Output = Self;

    fn neg(self) -> Self::Output {
        Lexical(-self.0)
    }
}

impl<T> Zero for Lexical<T>
where
    T: Zero,
{
    fn zero() -> Self {
        Lexical(T::zero())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl ComputableValue for bool {
    fn compute(&self) -> ComputedValue {
        if *self { 1 } else { 0 }
    }
}

impl ComputableValue for Ordering {
    fn compute(&self) -> ComputedValue {
        match self {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }
}

impl_computable_value_from!(u8);
impl_computable_value_from!(u16);
impl_computable_value_from!(u32);
impl_computable_value_from!(i8);
impl_computable_value_from!(i16);
impl_computable_value_from!(i32);
impl_computable_value_from!(i64);
