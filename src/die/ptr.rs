use std::borrow::Borrow;
use std::fmt::{Debug, Display};
use std::ops::Add;

use num::rational::Ratio;
use num::Zero;

use super::inner::DieInner;
use super::Iter;
use crate::value::{ComputableValue, DefaultValue, Value};
use crate::{Count, Ptr};

/// A finite distribution: each outcome with the number of ways it occurs.
///
/// Counts are exact and strictly positive; equal outcomes are merged when the
/// die is built. Outcomes iterate in [`Value::order`]. Cloning is cheap, the
/// table is shared.
#[derive(Clone)]
pub struct Die<T = DefaultValue>(Ptr<DieInner<T>>)
where
    T: Value;

impl Die {
    /// Uniform die over `1..=n`, or `n..=-1` for negative `n`. Zero gives an empty die.
    #[must_use]
    pub fn numeric(n: DefaultValue) -> Self {
        match n {
            0 => Die::empty(),
            n if n > 0 => Die::uniform(1..=n),
            n => Die::uniform(n..=-1),
        }
    }
}

impl<T> Die<T>
where
    T: Value,
{
    /// Builds a die from outcome/count pairs. Repeated outcomes are summed and
    /// zero counts dropped.
    #[must_use]
    pub fn new<I, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        C: Into<Count>,
    {
        Self::from_inner(DieInner::from_pairs(pairs))
    }

    /// Builds a die from observed values, each counting once.
    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_inner(DieInner::from_values(values))
    }

    #[must_use]
    pub fn uniform<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_values(values)
    }

    #[must_use]
    pub fn scalar(value: T) -> Self {
        Self::from_inner(DieInner::scalar(value))
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::from_inner(DieInner::empty())
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> &Count {
        self.0.total()
    }

    #[must_use]
    pub fn values(&self) -> &[T] {
        self.0.values()
    }

    #[must_use]
    pub fn counts(&self) -> &[Count] {
        self.0.counts()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().is_empty()
    }

    #[must_use]
    pub fn count_of(&self, value: &T) -> Count {
        self.0.count_of(value)
    }

    #[must_use]
    pub fn min_value(&self) -> Option<&T> {
        self.0.values().first()
    }

    #[must_use]
    pub fn max_value(&self) -> Option<&T> {
        self.0.values().last()
    }

    #[must_use]
    pub fn modes(&self) -> Vec<&T> {
        self.0.modes()
    }

    #[must_use]
    pub fn probabilities(&self) -> Vec<f64> {
        self.0.probabilities()
    }

    /// Exact probability of every outcome.
    #[must_use]
    pub fn distribution(&self) -> Vec<(&T, Ratio<Count>)> {
        self.0.distribution()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.0.iter()
    }

    /// Divides all counts by their greatest common divisor. Probabilities are unchanged.
    #[must_use]
    pub fn lowest_terms(&self) -> Self {
        Self::from_inner(self.0.lowest_terms())
    }

    /// Equality of the distributions in lowest terms.
    #[must_use]
    pub fn equivalent(&self, other: &Self) -> bool {
        self == other || self.0.lowest_terms() == other.0.lowest_terms()
    }

    #[must_use]
    pub fn map<O, F>(&self, f: F) -> Die<O>
    where
        O: Value,
        F: Fn(&T) -> O,
    {
        Die::from_inner(self.0.map(f))
    }

    #[must_use]
    pub fn apply_two<R, O, F>(&self, rhs: &Die<R>, f: F) -> Die<O>
    where
        R: Value,
        O: Value,
        F: Fn(&T, &R) -> O,
    {
        Die::from_inner(self.0.apply_two(&rhs.0, f))
    }

    #[must_use]
    pub fn apply_three<T2, T3, O, F>(&self, d2: &Die<T2>, d3: &Die<T3>, f: F) -> Die<O>
    where
        T2: Value,
        T3: Value,
        O: Value,
        F: Fn(&T, &T2, &T3) -> O,
    {
        Die::from_inner(self.0.apply_three(&d2.0, &d3.0, f))
    }

    #[must_use]
    pub fn apply<D, O, F>(dice: &[D], f: F) -> Die<O>
    where
        D: Borrow<Self>,
        O: Value,
        F: Fn(&[&T]) -> O,
    {
        let inner: Vec<&DieInner<T>> = dice.iter().map(|d| d.borrow().0.as_ref()).collect();
        Die::from_inner(DieInner::apply(&inner, f))
    }

    /// Combines `n` independent copies with `f`, one pairwise step at a time.
    #[must_use]
    pub fn fold<F>(&self, n: usize, f: F) -> Self
    where
        F: Fn(&T, &T) -> T,
    {
        let mut die = self.clone();
        for _ in 1..n {
            die = die.apply_two(self, &f);
        }
        die
    }

    /// Same result as [`Die::fold`] for an associative `f`, in `O(log n)` steps.
    #[must_use]
    pub fn fold_assoc<F>(&self, n: usize, f: F) -> Self
    where
        F: Fn(&T, &T) -> T,
    {
        if n < 2 {
            return self.clone();
        }

        Self::from_inner(self.0.fold_assoc(n, f))
    }

    pub(crate) fn from_inner(value: DieInner<T>) -> Self {
        Self(Ptr::new(value))
    }
}

impl<T> Die<T>
where
    T: Value + Add<Output = T> + Zero,
{
    /// Sum of `n` independent draws. Zero draws sum to `0`.
    #[must_use]
    pub fn sum_of(&self, n: usize) -> Self {
        if n == 0 {
            return Self::scalar(T::zero());
        }
        self.fold_assoc(n, |a, b| a.clone() + b.clone())
    }
}

impl<T> Die<T>
where
    T: Value + Ord,
{
    /// Best of `n` draws.
    #[must_use]
    pub fn max_of(&self, n: usize) -> Self {
        self.fold_assoc(n, |a, b| a.max(b).clone())
    }

    /// Worst of `n` draws.
    #[must_use]
    pub fn min_of(&self, n: usize) -> Self {
        self.fold_assoc(n, |a, b| a.min(b).clone())
    }
}

impl<T> Die<T>
where
    T: ComputableValue,
{
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.0.mean()
    }

    #[must_use]
    pub fn variance(&self) -> f64 {
        self.0.variance()
    }

    #[must_use]
    pub fn stddev(&self) -> f64 {
        self.0.stddev()
    }
}

impl<T> PartialEq for Die<T>
where
    T: Value,
{
    fn eq(&self, other: &Self) -> bool {
        Ptr::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl<T> Eq for Die<T> where T: Value {}

impl<T> Default for Die<T>
where
    T: Value,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Debug for Die<T>
where
    T: Value,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Die")
            .field("total", self.0.total())
            .field("values", &self.0.values())
            .field("counts", &self.0.counts())
            .finish()
    }
}

impl<T> Display for Die<T>
where
    T: Value + Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (v, c)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}: {c}")?;
        }
        write!(f, "}}")
    }
}

impl<'a, T> IntoIterator for &'a Die<T>
where
    T: Value,
{
    type Item = (&'a T, &'a Count);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> FromIterator<T> for Die<T>
where
    T: Value,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}
