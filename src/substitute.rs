use std::convert::Infallible;
use std::ops::Add;

use bon::Builder;
use num::{Integer, One, Zero};

use crate::die::DieInner;
use crate::ops::add;
use crate::{Count, Die, Error, Map, Result, Value, MAX_UNBOUNDED_DEPTH};

/// What an outcome turns into during substitution or dependent evaluation.
///
/// A [`Expansion::Die`] keeps the probability of the outcome it replaces and
/// splits it among its own outcomes. An empty die discards the branch: its
/// probability is dropped, so the result is conditioned on the remaining
/// branches ("reroll until ..."), and its total no longer corresponds to the
/// input's.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expansion<T>
where
    T: Value,
{
    Outcome(T),
    Die(Die<T>),
}

/// How deep substitution may recurse into the dice it produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Depth {
    /// Stop after this many levels. Outcomes still pending are kept as they are.
    Limit(usize),
    /// Recurse until every branch resolves, failing with [`Error::Unbounded`]
    /// past [`MAX_UNBOUNDED_DEPTH`].
    Unbounded,
}

#[derive(Clone, Copy, Debug, Builder)]
pub struct Substitution {
    #[builder(default = Depth::Limit(1))]
    depth: Depth,
}

impl<T> From<Die<T>> for Expansion<T>
where
    T: Value,
{
    fn from(value: Die<T>) -> Self {
        Expansion::Die(value)
    }
}

impl Default for Substitution {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Substitution {
    #[must_use]
    pub fn depth(&self) -> Depth {
        self.depth
    }
}

impl<T> Die<T>
where
    T: Value,
{
    /// Replaces every outcome with what `f` returns for it.
    ///
    /// `f` sees the die currently being expanded and one of its outcomes. When
    /// it returns a die, that die is expanded in turn, up to the configured
    /// depth. Dice returned at the last permitted level are kept unexpanded.
    pub fn substitute<F>(&self, f: F, options: Substitution) -> Result<Die<T>>
    where
        F: Fn(&Die<T>, &T) -> Expansion<T>,
    {
        self.substitute_coalesce(f, |die, _| die, options)
    }

    /// Like [`Die::substitute`], passing each expanded die through `coalesce`
    /// together with the outcome it replaced.
    pub fn substitute_coalesce<F, C>(&self, f: F, coalesce: C, options: Substitution) -> Result<Die<T>>
    where
        F: Fn(&Die<T>, &T) -> Expansion<T>,
        C: Fn(Die<T>, &T) -> Die<T>,
    {
        match options.depth {
            Depth::Limit(max) => {
                let result = substitute_limited(self, 0, max, &f, &coalesce);
                Ok(match result {
                    Ok(die) => die,
                    Err(never) => match never {},
                })
            }
            Depth::Unbounded => substitute_unbounded(self, 0, &f, &coalesce),
        }
    }

    /// Rerolls the highest face and adds, at most `max_depth` times.
    #[must_use]
    pub fn explode(&self, max_depth: usize) -> Die<T>
    where
        T: Add<Output = T>,
    {
        let expand = |die: &Die<T>, outcome: &T| match die.max_value() {
            Some(top) if top == outcome => Expansion::Die(die.clone()),
            _ => Expansion::Outcome(outcome.clone()),
        };
        let coalesce = |die: Die<T>, outcome: &T| die.map(|x| add(x, outcome));
        match substitute_limited(self, 0, max_depth, &expand, &coalesce) {
            Ok(die) => die,
            Err(never) => match never {},
        }
    }
}

fn substitute_limited<T, F, C>(
    die: &Die<T>,
    level: usize,
    max: usize,
    f: &F,
    coalesce: &C,
) -> core::result::Result<Die<T>, Infallible>
where
    T: Value,
    F: Fn(&Die<T>, &T) -> Expansion<T>,
    C: Fn(Die<T>, &T) -> Die<T>,
{
    if level >= max {
        return Ok(die.clone());
    }
    expand_level(die, f, coalesce, |next| {
        substitute_limited(next, level + 1, max, f, coalesce)
    })
}

fn substitute_unbounded<T, F, C>(die: &Die<T>, level: usize, f: &F, coalesce: &C) -> Result<Die<T>>
where
    T: Value,
    F: Fn(&Die<T>, &T) -> Expansion<T>,
    C: Fn(Die<T>, &T) -> Die<T>,
{
    expand_level(die, f, coalesce, |next| {
        if level + 1 > MAX_UNBOUNDED_DEPTH {
            return Err(Error::Unbounded { depth: level + 1 });
        }
        substitute_unbounded(next, level + 1, f, coalesce)
    })
}

fn expand_level<T, F, C, D, E>(die: &Die<T>, f: &F, coalesce: &C, mut deeper: D) -> core::result::Result<Die<T>, E>
where
    T: Value,
    F: Fn(&Die<T>, &T) -> Expansion<T>,
    C: Fn(Die<T>, &T) -> Die<T>,
    D: FnMut(&Die<T>) -> core::result::Result<Die<T>, E>,
{
    log::trace!("{:<32}{:<32}", "substituting outcomes", die.len());
    let mut items = Vec::with_capacity(die.len());
    for (outcome, count) in die {
        let expansion = match f(die, outcome) {
            Expansion::Die(next) if next.is_empty() => Expansion::Die(next),
            Expansion::Die(next) => Expansion::Die(coalesce(deeper(&next)?, outcome)),
            scalar => scalar,
        };
        items.push((expansion, count.clone()));
    }
    Ok(reassemble(items))
}

/// Merges weighted expansions into one die.
///
/// Each expanded die is scaled so its outcomes share exactly the weight of the
/// branch it replaces: counts are brought to the lcm of the expanded totals.
/// Empty dice contribute nothing.
pub(crate) fn reassemble<T, I>(items: I) -> Die<T>
where
    T: Value,
    I: IntoIterator<Item = (Expansion<T>, Count)>,
{
    let items: Vec<_> = items.into_iter().collect();
    let scale = items
        .iter()
        .filter_map(|(e, _)| match e {
            Expansion::Die(d) if !d.is_empty() => Some(d.total()),
            _ => None,
        })
        .fold(Count::one(), |acc, t| acc.lcm(t));

    let mut map = Map::new();
    for (expansion, weight) in items {
        match expansion {
            Expansion::Outcome(value) => {
                *map.entry(value).or_default() += &weight * &scale;
            }
            Expansion::Die(die) => {
                if die.total().is_zero() {
                    continue;
                }
                let factor = &weight * (&scale / die.total());
                for (value, count) in &die {
                    *map.entry(value.clone()).or_default() += count * &factor;
                }
            }
        }
    }
    Die::from_inner(DieInner::from_map(map))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(d: &Die) -> Vec<(i32, u64)> {
        d.iter()
            .map(|(v, c)| (*v, u64::try_from(c.clone()).unwrap()))
            .collect()
    }

    #[test]
    fn scalar_substitution_is_a_map() {
        let d6 = Die::numeric(6);
        let halved = d6
            .substitute(|_, x| Expansion::Outcome(x / 2), Substitution::default())
            .unwrap();
        assert_eq!(halved, d6.map(|x| x / 2));
    }

    #[test]
    fn reroll_ones_once() {
        let d6 = Die::numeric(6);
        let reroll = d6
            .substitute(
                |d, &x| if x == 1 { d.clone().into() } else { Expansion::Outcome(x) },
                Substitution::default(),
            )
            .unwrap();
        assert_eq!(pairs(&reroll), vec![(1, 1), (2, 7), (3, 7), (4, 7), (5, 7), (6, 7)]);
    }

    #[test]
    fn empty_die_discards_branch() {
        let d6 = Die::numeric(6);
        let no_ones = d6
            .substitute(
                |_, &x| if x == 1 { Expansion::Die(Die::empty()) } else { Expansion::Outcome(x) },
                Substitution::default(),
            )
            .unwrap();
        assert_eq!(pairs(&no_ones), vec![(2, 1), (3, 1), (4, 1), (5, 1), (6, 1)]);
        assert!(no_ones.total() < d6.total());
    }

    #[test]
    fn depth_zero_is_identity() {
        let d4 = Die::numeric(4);
        let options = Substitution::builder().depth(Depth::Limit(0)).build();
        let same = d4.substitute(|d, _| d.clone().into(), options).unwrap();
        assert_eq!(same, d4);
    }

    #[test]
    fn explode_once() {
        let d6 = Die::numeric(6);
        let e = d6.explode(1);
        assert_eq!(
            pairs(&e),
            vec![
                (1, 6),
                (2, 6),
                (3, 6),
                (4, 6),
                (5, 6),
                (7, 1),
                (8, 1),
                (9, 1),
                (10, 1),
                (11, 1),
                (12, 1)
            ]
        );
        assert_eq!(d6.explode(0), d6);
    }

    #[test]
    fn explode_twice_keeps_terminal_max() {
        let d2 = Die::numeric(2);
        assert_eq!(pairs(&d2.explode(2)), vec![(1, 4), (3, 2), (5, 1), (6, 1)]);
    }

    #[test]
    fn unbounded_terminates_when_branches_resolve() {
        let d6 = Die::numeric(6);
        let options = Substitution::builder().depth(Depth::Unbounded).build();
        let once = d6
            .substitute(
                |d, &x| {
                    if x == 6 && d.len() == 6 {
                        Die::numeric(5).into()
                    } else {
                        Expansion::Outcome(x)
                    }
                },
                options,
            )
            .unwrap();
        assert_eq!(pairs(&once), vec![(1, 6), (2, 6), (3, 6), (4, 6), (5, 6)]);
    }

    #[test]
    fn unbounded_recursion_is_reported() {
        let d6 = Die::numeric(6);
        let options = Substitution::builder().depth(Depth::Unbounded).build();
        let err = d6
            .substitute(
                |d, &x| if x == 6 { d.clone().into() } else { Expansion::Outcome(x) },
                options,
            )
            .unwrap_err();
        assert_eq!(err, Error::Unbounded { depth: MAX_UNBOUNDED_DEPTH + 1 });
    }
}
