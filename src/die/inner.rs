use std::borrow::Borrow;
use std::collections::HashMap;

use itertools::Itertools;
use num::{BigInt, BigRational, Integer, One, ToPrimitive, Zero};
use num::rational::Ratio;

use super::Iter;
use crate::value::{ComputableValue, DefaultValue, Value};
use crate::{Count, Map};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DieInner<T = DefaultValue>
where
    T: Value,
{
    total: Count,
    counts: Vec<Count>,
    values: Vec<T>,
}

impl<T> DieInner<T>
where
    T: Value,
{
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total: Count::zero(),
            counts: Vec::new(),
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn scalar(value: T) -> Self {
        Self {
            total: Count::one(),
            counts: vec![Count::one()],
            values: vec![value],
        }
    }

    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut map = Map::new();
        for value in values {
            *map.entry(value).or_default() += 1u32;
        }
        Self::from_map(map)
    }

    #[must_use]
    pub fn from_pairs<I, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        C: Into<Count>,
    {
        let mut map = Map::new();
        for (value, count) in pairs {
            *map.entry(value).or_default() += count.into();
        }
        Self::from_map(map)
    }

    /// Drops zero counts and sorts outcomes by [`Value::order`].
    #[must_use]
    pub fn from_map(map: Map<T>) -> Self {
        let mut values = Vec::with_capacity(map.len());
        let mut counts = Vec::with_capacity(map.len());
        let mut total = Count::zero();
        for (value, count) in map
            .into_iter()
            .filter(|(_, c)| !c.is_zero())
            .sorted_by(|(v1, _), (v2, _)| v1.order(v2))
        {
            total += &count;
            values.push(value);
            counts.push(count);
        }
        Self {
            total,
            counts,
            values,
        }
    }

    #[must_use]
    pub fn total(&self) -> &Count {
        &self.total
    }

    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[must_use]
    pub fn counts(&self) -> &[Count] {
        &self.counts
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.values.iter().zip(self.counts.iter())
    }

    #[must_use]
    pub fn count_of(&self, value: &T) -> Count {
        self.iter()
            .find(|(v, _)| *v == value)
            .map(|(_, c)| c.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn modes(&self) -> Vec<&T> {
        self.iter()
            .max_set_by_key(|(_, c)| *c)
            .into_iter()
            .map(|(v, _)| v)
            .collect()
    }

    #[must_use]
    pub fn probabilities(&self) -> Vec<f64> {
        self.distribution()
            .into_iter()
            .map(|(_, p)| p.to_f64().unwrap_or(f64::NAN))
            .collect_vec()
    }

    #[must_use]
    pub fn distribution(&self) -> Vec<(&T, Ratio<Count>)> {
        self.iter()
            .map(|(v, c)| (v, Ratio::new(c.clone(), self.total.clone())))
            .collect_vec()
    }

    #[must_use]
    pub fn lowest_terms(&self) -> Self {
        let divisor = self
            .counts
            .iter()
            .fold(Count::zero(), |acc, c| acc.gcd(c));
        if divisor.is_zero() || divisor.is_one() {
            return self.clone();
        }
        Self {
            total: &self.total / &divisor,
            counts: self.counts.iter().map(|c| c / &divisor).collect(),
            values: self.values.clone(),
        }
    }

    #[must_use]
    pub fn map<O, F>(&self, f: F) -> DieInner<O>
    where
        O: Value,
        F: Fn(&T) -> O,
    {
        let mut map = Map::new();

        for (v1, c1) in self.iter() {
            *map.entry(f(v1)).or_default() += c1;
        }

        DieInner::from_map(map)
    }

    #[must_use]
    pub fn apply_two<T2, O, F>(&self, d2: &DieInner<T2>, f: F) -> DieInner<O>
    where
        T2: Value,
        O: Value,
        F: Fn(&T, &T2) -> O,
    {
        let mut map = Map::new();

        for (v1, c1) in self.iter() {
            for (v2, c2) in d2.iter() {
                *map.entry(f(v1, v2)).or_default() += c1 * c2;
            }
        }

        DieInner::from_map(map)
    }

    #[must_use]
    pub fn apply_three<T2, T3, O, F>(
        &self,
        d2: &DieInner<T2>,
        d3: &DieInner<T3>,
        f: F,
    ) -> DieInner<O>
    where
        T2: Value,
        T3: Value,
        O: Value,
        F: Fn(&T, &T2, &T3) -> O,
    {
        let mut map = Map::new();

        for (v1, c1) in self.iter() {
            for (v2, c2) in d2.iter() {
                let c12 = c1 * c2;
                for (v3, c3) in d3.iter() {
                    *map.entry(f(v1, v2, v3)).or_default() += &c12 * c3;
                }
            }
        }

        DieInner::from_map(map)
    }

    #[must_use]
    pub fn apply<D, O, F>(dice: &[D], f: F) -> DieInner<O>
    where
        D: Borrow<Self>,
        O: Value,
        F: Fn(&[&T]) -> O,
    {
        if dice.is_empty() {
            return DieInner::scalar(f(&[]));
        }

        let mut map = Map::new();
        let mut value = Vec::with_capacity(dice.len());

        for p in dice
            .iter()
            .map(|x| x.borrow().iter())
            .multi_cartesian_product()
        {
            value.clear();
            let mut count = Count::one();
            for (v, c) in p {
                value.push(v);
                count *= c;
            }
            *map.entry(f(value.as_slice())).or_default() += count;
        }

        DieInner::from_map(map)
    }

    /// Combines `n >= 2` copies with an associative `f` in `O(log n)` steps.
    #[must_use]
    pub fn fold_assoc<F>(&self, n: usize, f: F) -> Self
    where
        F: Fn(&T, &T) -> T,
    {
        if n < 2 {
            return self.clone();
        }

        let mut cache = HashMap::new();
        cache.insert(1, self.clone());

        let mut stack = vec![n];
        while let Some(&x) = stack.last() {
            if cache.contains_key(&x) {
                stack.pop();
                continue;
            }
            let m = if x % 2 == 0 { x / 2 } else { x - 1 };
            let Some(d) = cache.get(&m) else {
                stack.push(m);
                continue;
            };
            let next = if x % 2 == 0 {
                d.apply_two(d, &f)
            } else {
                d.apply_two(self, &f)
            };
            cache.insert(x, next);
            stack.pop();
        }

        cache.remove(&n).unwrap_or_else(|| self.clone())
    }
}

impl<T> DieInner<T>
where
    T: ComputableValue,
{
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.exact_mean()
            .and_then(|m| m.to_f64())
            .unwrap_or(f64::NAN)
    }

    /// `E[X^2] - E[X]^2`, computed exactly before the final float conversion.
    #[must_use]
    pub fn variance(&self) -> f64 {
        let Some(mean) = self.exact_mean() else {
            return f64::NAN;
        };
        let squares = self.weighted_sum(|x| &x * &x);
        let total = BigInt::from(self.total.clone());
        (BigRational::new(squares, total) - &mean * &mean)
            .to_f64()
            .unwrap_or(f64::NAN)
    }

    #[must_use]
    pub fn stddev(&self) -> f64 {
        self.variance().sqrt()
    }

    fn exact_mean(&self) -> Option<BigRational> {
        if self.total.is_zero() {
            return None;
        }
        let sum = self.weighted_sum(|x| x);
        Some(BigRational::new(sum, BigInt::from(self.total.clone())))
    }

    fn weighted_sum<F>(&self, f: F) -> BigInt
    where
        F: Fn(BigInt) -> BigInt,
    {
        self.iter().fold(BigInt::zero(), |acc, (v, c)| {
            acc + f(BigInt::from(v.compute())) * BigInt::from(c.clone())
        })
    }
}
