use std::cmp::Ordering;
use std::iter;

use itertools::Itertools;
use num::One;

use crate::{Count, Die, Map, Value};

/// A sorted joint outcome of a pool with the number of ways to roll it.
pub type Roll<T> = (Vec<T>, Count);

/// How a pool's joint rolls are enumerated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Enumeration {
    /// Identical dice are grouped and each group is enumerated by multiset
    /// composition; a homogeneous pool is a single group.
    #[default]
    Grouped,
    /// Every assignment of outcomes to dice is visited. Exponential in the
    /// pool size, kept as the reference enumeration.
    Cartesian,
}

/// Rolls of `n` copies of `die`.
///
/// Each way to split `n` among the `d` outcomes of `die` is exactly one sorted
/// roll, weighted by the multinomial coefficient and the outcome counts, so
/// the work is `C(n + d - 1, d - 1)` instead of `d^n`.
pub(crate) fn homogeneous<T>(die: &Die<T>, n: usize) -> Vec<Roll<T>>
where
    T: Value,
{
    if n == 0 {
        return vec![(Vec::new(), Count::one())];
    }
    if die.is_empty() {
        return Vec::new();
    }

    let table = Compositions::new(die, n);

    #[cfg(feature = "parallel")]
    let rolls = {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};

        (0..=n)
            .into_par_iter()
            .flat_map_iter(|first| table.starting_with(first))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let rolls = (0..=n).flat_map(|first| table.starting_with(first)).collect();

    finish(rolls)
}

/// Rolls of an arbitrary pool, enumerating groups of identical dice by composition.
pub(crate) fn grouped<T>(dice: &[Die<T>]) -> Vec<Roll<T>>
where
    T: Value,
{
    let mut groups: Vec<(&Die<T>, usize)> = Vec::new();
    for die in dice {
        match groups.iter_mut().find(|(d, _)| *d == die) {
            Some((_, n)) => *n += 1,
            None => groups.push((die, 1)),
        }
    }
    log::debug!("{:<32}{:<32}", "grouping identical dice", groups.len());

    if let [(die, n)] = groups.as_slice() {
        return homogeneous(die, *n);
    }

    let mut acc: Vec<Roll<T>> = vec![(Vec::new(), Count::one())];
    for (die, n) in groups {
        let rolls = homogeneous(die, n);
        let mut map = Map::new();
        for (r1, c1) in &acc {
            for (r2, c2) in &rolls {
                *map.entry(merge(r1, r2)).or_default() += c1 * c2;
            }
        }
        acc = map.into_iter().collect();
    }

    finish(acc)
}

/// Rolls of an arbitrary pool by visiting every assignment and sorting it.
pub(crate) fn cartesian<T>(dice: &[Die<T>]) -> Vec<Roll<T>>
where
    T: Value,
{
    let Some((first, rest)) = dice.split_first() else {
        return vec![(Vec::new(), Count::one())];
    };

    #[cfg(feature = "parallel")]
    let map = {
        use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

        first
            .values()
            .into_par_iter()
            .zip(first.counts().into_par_iter())
            .fold(Map::new, |mut map, (value, count)| {
                extend_product(&mut map, value, count, rest);
                map
            })
            .reduce(Map::new, merge_maps)
    };

    #[cfg(not(feature = "parallel"))]
    let map = {
        let mut map = Map::new();
        for (value, count) in first {
            extend_product(&mut map, value, count, rest);
        }
        map
    };

    finish(map.into_iter().collect())
}

/// Orders rolls lexicographically so enumeration results are deterministic.
pub(crate) fn finish<T>(mut rolls: Vec<Roll<T>>) -> Vec<Roll<T>>
where
    T: Value,
{
    rolls.sort_by(|(a, _), (b, _)| compare_rolls(a, b));
    rolls
}

pub(crate) fn compare_rolls<T>(a: &[T], b: &[T]) -> Ordering
where
    T: Value,
{
    a.iter()
        .zip(b)
        .map(|(x, y)| x.order(y))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

struct Compositions<'a, T> {
    n: usize,
    values: &'a [T],
    factorials: Vec<Count>,
    powers: Vec<Vec<Count>>,
}

impl<'a, T> Compositions<'a, T>
where
    T: Value,
{
    fn new(die: &'a Die<T>, n: usize) -> Self {
        let mut factorials = Vec::with_capacity(n + 1);
        factorials.push(Count::one());
        for k in 1..=n {
            let next = &factorials[k - 1] * Count::from(k);
            factorials.push(next);
        }

        let powers = die
            .counts()
            .iter()
            .map(|c| {
                iter::successors(Some(Count::one()), |p| Some(p * c))
                    .take(n + 1)
                    .collect_vec()
            })
            .collect_vec();

        Self {
            n,
            values: die.values(),
            factorials,
            powers,
        }
    }

    /// All rolls in which the lowest outcome appears `first` times.
    fn starting_with(&self, first: usize) -> Vec<Roll<T>> {
        let d = self.values.len();
        let mut out = Vec::new();
        if d == 1 {
            if first == self.n {
                out.push(self.roll(&[first]));
            }
            return out;
        }

        let mut parts = vec![0; d];
        parts[0] = first;
        self.fill(&mut parts, 1, self.n - first, &mut out);
        out
    }

    fn fill(&self, parts: &mut [usize], i: usize, remaining: usize, out: &mut Vec<Roll<T>>) {
        if i == parts.len() - 1 {
            parts[i] = remaining;
            out.push(self.roll(parts));
            return;
        }
        for g in 0..=remaining {
            parts[i] = g;
            self.fill(parts, i + 1, remaining - g, out);
        }
    }

    fn roll(&self, parts: &[usize]) -> Roll<T> {
        let mut count = self.factorials[self.n].clone();
        for &g in parts {
            count /= &self.factorials[g];
        }
        for (i, &g) in parts.iter().enumerate() {
            count *= &self.powers[i][g];
        }

        let mut roll = Vec::with_capacity(self.n);
        for (value, &g) in self.values.iter().zip(parts) {
            roll.extend(iter::repeat_n(value.clone(), g));
        }
        (roll, count)
    }
}

fn extend_product<T>(map: &mut Map<Vec<T>>, value: &T, count: &Count, rest: &[Die<T>])
where
    T: Value,
{
    if rest.is_empty() {
        *map.entry(vec![value.clone()]).or_default() += count;
        return;
    }

    for p in rest.iter().map(Die::iter).multi_cartesian_product() {
        let mut roll = Vec::with_capacity(rest.len() + 1);
        roll.push(value.clone());
        let mut weight = count.clone();
        for (v, c) in p {
            roll.push(v.clone());
            weight *= c;
        }
        roll.sort_by(T::order);
        *map.entry(roll).or_default() += weight;
    }
}

fn merge<T>(a: &[T], b: &[T]) -> Vec<T>
where
    T: Value,
{
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].order(&b[j]).is_le() {
            out.push(a[i].clone());
            i += 1;
        } else {
            out.push(b[j].clone());
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

#[cfg(feature = "parallel")]
fn merge_maps<T>(mut a: Map<Vec<T>>, b: Map<Vec<T>>) -> Map<Vec<T>>
where
    T: Value,
{
    for (roll, count) in b {
        *a.entry(roll).or_default() += count;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_u64<T: Clone>(rolls: Vec<Roll<T>>) -> Vec<(Vec<T>, u64)> {
        rolls
            .into_iter()
            .map(|(r, c)| (r, u64::try_from(c).unwrap()))
            .collect()
    }

    #[test]
    fn two_coins() {
        let d2 = Die::numeric(2);
        assert_eq!(
            as_u64(homogeneous(&d2, 2)),
            vec![(vec![1, 1], 1), (vec![1, 2], 2), (vec![2, 2], 1)]
        );
    }

    #[test]
    fn weighted_faces_raise_counts() {
        let d = Die::new([(0, 2u32), (1, 3u32)]);
        assert_eq!(
            as_u64(homogeneous(&d, 2)),
            vec![(vec![0, 0], 4), (vec![0, 1], 12), (vec![1, 1], 9)]
        );
    }

    #[test]
    fn composition_count_is_polynomial() {
        let d6 = Die::numeric(6);
        // C(10 + 5, 5)
        assert_eq!(homogeneous(&d6, 10).len(), 3003);
    }

    #[test]
    fn empty_cases() {
        let d6 = Die::numeric(6);
        assert_eq!(as_u64(homogeneous(&d6, 0)), vec![(vec![], 1)]);
        assert!(homogeneous(&Die::<i32>::empty(), 3).is_empty());
        assert_eq!(as_u64(cartesian::<i32>(&[])), vec![(vec![], 1)]);
        assert!(cartesian(&[d6.clone(), Die::empty()]).is_empty());
    }

    #[test]
    fn single_face_die() {
        let one = Die::scalar(7);
        assert_eq!(as_u64(homogeneous(&one, 3)), vec![(vec![7, 7, 7], 1)]);
    }

    #[test]
    fn mixed_pool_paths_agree() {
        let dice = [Die::numeric(4), Die::numeric(6), Die::numeric(4), Die::numeric(2)];
        assert_eq!(grouped(&dice), cartesian(&dice));
    }

    #[test]
    fn merge_keeps_order() {
        assert_eq!(merge(&[1, 3, 5], &[2, 3, 6]), vec![1, 2, 3, 3, 5, 6]);
    }
}
