mod rolls;
mod which;

use std::ops::Add;

use num::{One, Zero};

pub(crate) use rolls::finish;
pub use rolls::{Enumeration, Roll};
pub use which::{Slice, Which};

use crate::die::DieInner;
use crate::value::{DefaultValue, Value};
use crate::{Count, Die, Error, Map, Result};

/// A collection of independent dice rolled together.
///
/// Rolls are seen sorted, lowest outcome first, so selectors such as "the two
/// highest" address positions of the sorted roll rather than particular dice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pool<T = DefaultValue>
where
    T: Value,
{
    dice: Vec<Die<T>>,
}

enum Selection {
    All,
    Positions(Vec<usize>),
}

/// Whether the consumer of a selection sees the order of its positions.
#[derive(Clone, Copy)]
enum Arrangement {
    Ordered,
    Unordered,
}

impl Pool {
    /// One numeric die per entry, see [`Die::numeric`].
    #[must_use]
    pub fn numeric<I>(faces: I) -> Self
    where
        I: IntoIterator<Item = DefaultValue>,
    {
        faces.into_iter().map(Die::numeric).collect()
    }
}

impl<T> Pool<T>
where
    T: Value,
{
    #[must_use]
    pub fn new<I>(dice: I) -> Self
    where
        I: IntoIterator<Item = Die<T>>,
    {
        Self {
            dice: dice.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self { dice: Vec::new() }
    }

    #[must_use]
    pub fn repeat(count: usize, die: Die<T>) -> Self {
        Self {
            dice: vec![die; count],
        }
    }

    pub fn push(&mut self, die: Die<T>) {
        self.dice.push(die);
    }

    pub fn extend(&mut self, other: Pool<T>) {
        self.dice.extend(other.dice);
    }

    /// Both pools' dice in one pool.
    #[must_use]
    pub fn concat(&self, other: &Pool<T>) -> Self {
        let mut out = self.clone();
        out.dice.extend_from_slice(&other.dice);
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dice.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    #[must_use]
    pub fn dice(&self) -> &[Die<T>] {
        &self.dice
    }

    /// Number of joint rolls, the product of the dice totals.
    #[must_use]
    pub fn total(&self) -> Count {
        self.dice.iter().fold(Count::one(), |acc, d| acc * d.total())
    }

    /// Whether every die is the same distribution.
    #[must_use]
    pub fn is_homogeneous(&self) -> bool {
        self.dice.windows(2).all(|w| w[0] == w[1])
    }

    #[must_use]
    pub fn map<O, F>(&self, f: F) -> Pool<O>
    where
        O: Value,
        F: Fn(&T) -> O,
    {
        Pool {
            dice: self.dice.iter().map(|d| d.map(&f)).collect(),
        }
    }

    /// Every sorted roll of the pool with its count.
    #[must_use]
    pub fn rolls_with_counts(&self) -> Vec<Roll<T>> {
        self.rolls_with_counts_by(Enumeration::default())
    }

    #[must_use]
    pub fn rolls_with_counts_by(&self, enumeration: Enumeration) -> Vec<Roll<T>> {
        log::debug!(
            "{:<32}{:<32}",
            "enumerating pool",
            format!("{} dice, {:?}", self.len(), enumeration)
        );
        match enumeration {
            Enumeration::Grouped if self.is_homogeneous() && !self.is_empty() => {
                rolls::homogeneous(&self.dice[0], self.len())
            }
            Enumeration::Grouped => rolls::grouped(&self.dice),
            Enumeration::Cartesian => rolls::cartesian(&self.dice),
        }
    }

    /// Sorted rolls reduced to the selected positions, equal projections merged.
    ///
    /// Projections keep selector order. Without selectors, or with selectors
    /// naming `0..len` in ascending order, this is [`Pool::rolls_with_counts`].
    pub fn rolls_with_counts_of(&self, which: &[Which]) -> Result<Vec<Roll<T>>> {
        let positions = match self.select(which, Arrangement::Ordered)? {
            Selection::All => return Ok(self.rolls_with_counts()),
            Selection::Positions(positions) => positions,
        };
        let mut map: Map<Vec<T>> = Map::new();
        for (roll, count) in self.rolls_with_counts() {
            let projected = positions.iter().map(|&i| roll[i].clone()).collect();
            *map.entry(projected).or_default() += count;
        }
        Ok(finish(map.into_iter().collect()))
    }

    /// Distribution of `f` over the selected outcomes of each sorted roll.
    ///
    /// `f` sees the outcomes in selector order, so `[1, 0]` on two dice passes
    /// the highest outcome first.
    pub fn apply_rolls<O, F>(&self, which: &[Which], f: F) -> Result<Die<O>>
    where
        O: Value,
        F: Fn(&[T]) -> O,
    {
        let selection = self.select(which, Arrangement::Ordered)?;
        let mut map: Map<O> = Map::new();
        for (roll, count) in self.rolls_with_counts() {
            let value = match &selection {
                Selection::All => f(&roll),
                Selection::Positions(positions) => {
                    let selected: Vec<T> = positions.iter().map(|&i| roll[i].clone()).collect();
                    f(&selected)
                }
            };
            *map.entry(value).or_default() += count;
        }
        Ok(Die::from_inner(DieInner::from_map(map)))
    }

    /// How many dice in the pool show `outcome`.
    #[must_use]
    pub fn appearances(&self, outcome: &T) -> Die<usize> {
        self.dice
            .iter()
            .map(|d| d.map(|v| usize::from(v == outcome)))
            .fold(Die::scalar(0), |acc, hits| acc.plus(&hits))
    }

    fn select(&self, which: &[Which], arrangement: Arrangement) -> Result<Selection> {
        if which.is_empty() {
            return Ok(Selection::All);
        }
        let positions = Which::positions(which, self.len())?;
        let whole = match arrangement {
            Arrangement::Ordered => which::is_identity(&positions, self.len()),
            Arrangement::Unordered => which::covers_all(&positions, self.len()),
        };
        if whole {
            return Ok(Selection::All);
        }
        if !T::TOTAL_ORDER && !positions.is_empty() {
            return Err(Error::Unordered);
        }
        Ok(Selection::Positions(positions))
    }
}

impl<T> Pool<T>
where
    T: Value + Add<Output = T> + Zero,
{
    /// Distribution of the sum of the selected positions.
    ///
    /// With no selectors, or selectors covering the whole roll, the plain sum
    /// is computed by convolution and works for any outcome type. A strict
    /// selection needs a total order on the outcomes.
    pub fn h(&self, which: &[Which]) -> Result<Die<T>> {
        match self.select(which, Arrangement::Unordered)? {
            Selection::All => Ok(self.sum()),
            Selection::Positions(positions) => {
                log::debug!("{:<32}{:<32}", "selecting positions", format!("{positions:?}"));
                self.apply_rolls(&[], |roll| {
                    positions
                        .iter()
                        .fold(T::zero(), |acc, &i| acc + roll[i].clone())
                })
            }
        }
    }

    /// Sum of every die.
    #[must_use]
    pub fn sum(&self) -> Die<T> {
        match self.dice.as_slice() {
            [] => Die::scalar(T::zero()),
            [first, ..] if self.is_homogeneous() => first.sum_of(self.len()),
            [first, rest @ ..] => rest.iter().fold(first.clone(), |acc, d| acc.plus(d)),
        }
    }

    /// Sum of the `k` highest outcomes.
    pub fn highest(&self, k: usize) -> Result<Die<T>> {
        let start = self.len().saturating_sub(k) as isize;
        self.h(&[Slice::new(Some(start), None, 1).into()])
    }

    /// Sum of the `k` lowest outcomes.
    pub fn lowest(&self, k: usize) -> Result<Die<T>> {
        let stop = k.min(self.len()) as isize;
        self.h(&[Slice::new(None, Some(stop), 1).into()])
    }
}

impl<T> Default for Pool<T>
where
    T: Value,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Vec<Die<T>>> for Pool<T>
where
    T: Value,
{
    fn from(dice: Vec<Die<T>>) -> Self {
        Self { dice }
    }
}

impl<T> FromIterator<Die<T>> for Pool<T>
where
    T: Value,
{
    fn from_iter<I: IntoIterator<Item = Die<T>>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lexical;

    fn pairs<T: Value + Copy>(d: &Die<T>) -> Vec<(T, u64)> {
        d.iter()
            .map(|(v, c)| (*v, u64::try_from(c.clone()).unwrap()))
            .collect()
    }

    #[test]
    fn highest_of_two_d6() {
        let pool = Pool::repeat(2, Die::numeric(6));
        assert_eq!(
            pairs(&pool.h(&[(-1).into()]).unwrap()),
            vec![(1, 1), (2, 3), (3, 5), (4, 7), (5, 9), (6, 11)]
        );
        assert_eq!(pool.h(&[(-1).into()]), pool.h(&[1.into()]));
    }

    #[test]
    fn no_selector_is_plain_sum() {
        let pool = Pool::numeric([4, 6, 6]);
        let direct = Die::numeric(4) + Die::numeric(6) + Die::numeric(6);
        assert_eq!(pool.h(&[]).unwrap(), direct);
        assert_eq!(pool.h(&[(..).into()]).unwrap(), direct);
    }

    #[test]
    fn empty_pool() {
        let pool = Pool::<i32>::empty();
        assert_eq!(pool.h(&[]).unwrap(), Die::scalar(0));
        assert_eq!(pool.total(), Count::one());
        assert_eq!(pool.rolls_with_counts().len(), 1);
    }

    #[test]
    fn out_of_range_selector() {
        let pool = Pool::numeric([6, 6]);
        assert_eq!(
            pool.h(&[2.into()]),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn duplicate_positions_count_twice() {
        let pool = Pool::numeric([2]);
        assert_eq!(pairs(&pool.h(&[0.into(), 0.into()]).unwrap()), vec![(2, 1), (4, 1)]);
    }

    #[test]
    fn keep_highest_and_lowest() {
        let pool = Pool::repeat(3, Die::numeric(6));
        let top = pool.highest(3).unwrap();
        assert_eq!(top, pool.sum());
        let low = pool.lowest(1).unwrap();
        assert_eq!(
            pairs(&low),
            vec![(1, 91), (2, 61), (3, 37), (4, 19), (5, 7), (6, 1)]
        );
        assert_eq!(pairs(&pool.lowest(0).unwrap()), vec![(0, 216)]);
    }

    #[test]
    fn projected_rolls() {
        let pool = Pool::repeat(2, Die::numeric(2));
        let rolls: Vec<(Vec<i32>, u64)> = pool
            .rolls_with_counts_of(&[(-1).into()])
            .unwrap()
            .into_iter()
            .map(|(r, c)| (r, u64::try_from(c).unwrap()))
            .collect();
        assert_eq!(rolls, vec![(vec![1], 1), (vec![2], 3)]);
    }

    #[test]
    fn apply_rolls_follows_selector_order() {
        let pool = Pool::numeric([6, 6]);
        let first = |roll: &[i32]| roll[0];
        let highest = vec![(1, 1), (2, 3), (3, 5), (4, 7), (5, 9), (6, 11)];
        let swapped = pool.apply_rolls(&[1.into(), 0.into()], first).unwrap();
        let reversed = pool
            .apply_rolls(&[Slice::full().with_step(-1).into()], first)
            .unwrap();
        assert_eq!(pairs(&swapped), highest);
        assert_eq!(pairs(&reversed), highest);
        let ascending = pool.apply_rolls(&[0.into(), 1.into()], first).unwrap();
        assert_eq!(ascending, pool.apply_rolls(&[], first).unwrap());
        assert_eq!(pairs(&ascending), vec![(1, 11), (2, 9), (3, 7), (4, 5), (5, 3), (6, 1)]);
    }

    #[test]
    fn projected_rolls_keep_selector_order() {
        let pool = Pool::repeat(2, Die::numeric(2));
        let rolls: Vec<(Vec<i32>, u64)> = pool
            .rolls_with_counts_of(&[Slice::full().with_step(-1).into()])
            .unwrap()
            .into_iter()
            .map(|(r, c)| (r, u64::try_from(c).unwrap()))
            .collect();
        assert_eq!(rolls, vec![(vec![1, 1], 1), (vec![2, 1], 2), (vec![2, 2], 1)]);
    }

    #[test]
    fn reordering_unordered_outcomes_is_rejected() {
        let coin = Die::from_values([Lexical(1), Lexical(10)]);
        let pool = Pool::repeat(2, coin);
        assert_eq!(
            pool.apply_rolls(&[1.into(), 0.into()], |r| r[0]),
            Err(Error::Unordered)
        );
        assert_eq!(
            pool.rolls_with_counts_of(&[Slice::full().with_step(-1).into()]),
            Err(Error::Unordered)
        );
        assert!(pool.apply_rolls(&[0.into(), 1.into()], |r| r[0]).is_ok());
    }

    #[test]
    fn huge_slice_step_selects_one_position() {
        let pool = Pool::numeric([6, 6, 6]);
        let middle = pool.h(&[Slice::new(Some(1), None, isize::MAX).into()]).unwrap();
        assert_eq!(middle, pool.h(&[1.into()]).unwrap());
    }

    #[test]
    fn appearances_count_matching_dice() {
        let pool = Pool::repeat(3, Die::numeric(6));
        assert_eq!(
            pairs(&pool.appearances(&6)),
            vec![(0, 125), (1, 75), (2, 15), (3, 1)]
        );
    }

    #[test]
    fn unordered_outcomes_reject_strict_selection() {
        let coin = Die::from_values([Lexical(1), Lexical(10)]);
        let pool = Pool::repeat(2, coin);
        assert_eq!(pool.h(&[(-1).into()]), Err(Error::Unordered));
        assert!(pool.h(&[]).is_ok());
        assert!(pool.h(&[1.into(), 0.into()]).is_ok());
    }

    #[test]
    fn homogeneity() {
        assert!(Pool::numeric([6, 6, 6]).is_homogeneous());
        assert!(!Pool::numeric([6, 4]).is_homogeneous());
        assert!(Pool::<i32>::empty().is_homogeneous());
    }

    #[test]
    fn map_and_concat() {
        let a = Pool::numeric([4]);
        let b = Pool::numeric([6]);
        let both = a.concat(&b);
        assert_eq!(both.len(), 2);
        assert_eq!(both.total(), Count::from(24u32));
        let doubled = both.map(|x| x * 2);
        assert_eq!(doubled.dice()[0].values(), &[2, 4, 6, 8]);
    }
}
