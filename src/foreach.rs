//! Dependent terms: a user function resolved over the joint outcomes of several
//! independent dice and pools.
//!
//! The function is called once per element of the Cartesian product of the
//! terms' spaces, with a [`Realized`] handle per term, and the weights of the
//! combined elements multiply. It may return an outcome or a die; dice are
//! merged the way [`Die::substitute`] merges them, and an empty die discards
//! the branch. The function may call back into this module, callers memoize
//! repeated states themselves.

use itertools::{iproduct, Itertools};
use num::One;

use crate::substitute::reassemble;
use crate::{Count, Die, Expansion, Pool, Result, Roll, Value};

/// Something with a finite weighted space of keys: a die's outcomes or a
/// pool's sorted rolls.
pub trait Term {
    type Key;

    fn space(&self) -> Result<Vec<(Self::Key, Count)>>;
}

/// One element of a term's space, together with the term it came from.
pub struct Realized<'a, A>
where
    A: Term,
{
    term: &'a A,
    key: &'a A::Key,
}

pub type DieResult<'a, T> = Realized<'a, Die<T>>;
pub type PoolResult<'a, T> = Realized<'a, Pool<T>>;

impl<T> Term for Die<T>
where
    T: Value,
{
    type Key = T;

    fn space(&self) -> Result<Vec<(T, Count)>> {
        Ok(self.iter().map(|(v, c)| (v.clone(), c.clone())).collect())
    }
}

impl<T> Term for Pool<T>
where
    T: Value,
{
    type Key = Vec<T>;

    fn space(&self) -> Result<Vec<Roll<T>>> {
        Ok(self.rolls_with_counts())
    }
}

impl<'a, A> Realized<'a, A>
where
    A: Term,
{
    fn new(term: &'a A, key: &'a A::Key) -> Self {
        Self { term, key }
    }

    #[must_use]
    pub fn term(&self) -> &'a A {
        self.term
    }

    #[must_use]
    pub fn key(&self) -> &'a A::Key {
        self.key
    }
}

impl<'a, T> Realized<'a, Die<T>>
where
    T: Value,
{
    /// The die this outcome was drawn from.
    #[must_use]
    pub fn h(&self) -> &'a Die<T> {
        self.term
    }

    #[must_use]
    pub fn outcome(&self) -> &'a T {
        self.key
    }
}

impl<'a, T> Realized<'a, Pool<T>>
where
    T: Value,
{
    /// The pool this roll was drawn from.
    #[must_use]
    pub fn p(&self) -> &'a Pool<T> {
        self.term
    }

    /// The roll, sorted lowest first.
    #[must_use]
    pub fn roll(&self) -> &'a [T] {
        self.key
    }
}

impl<A> Clone for Realized<'_, A>
where
    A: Term,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Realized<'_, A> where A: Term {}

impl<A> std::fmt::Debug for Realized<'_, A>
where
    A: Term,
    A::Key: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Realized").field(self.key).finish()
    }
}

pub fn foreach<A, O, F>(a: &A, f: F) -> Result<Die<O>>
where
    A: Term,
    O: Value,
    F: Fn(Realized<'_, A>) -> Expansion<O>,
{
    let sa = a.space()?;
    log::trace!("{:<32}{:<32}", "resolving dependent term", sa.len());
    let items = sa
        .iter()
        .map(|(ka, ca)| (f(Realized::new(a, ka)), ca.clone()))
        .collect_vec();
    Ok(reassemble(items))
}

pub fn foreach2<A, B, O, F>(a: &A, b: &B, f: F) -> Result<Die<O>>
where
    A: Term,
    B: Term,
    O: Value,
    F: Fn(Realized<'_, A>, Realized<'_, B>) -> Expansion<O>,
{
    let (sa, sb) = (a.space()?, b.space()?);
    log::trace!("{:<32}{:<32}", "resolving dependent terms", sa.len() * sb.len());
    let items = iproduct!(&sa, &sb)
        .map(|((ka, ca), (kb, cb))| {
            let expansion = f(Realized::new(a, ka), Realized::new(b, kb));
            (expansion, ca * cb)
        })
        .collect_vec();
    Ok(reassemble(items))
}

pub fn foreach3<A, B, C, O, F>(a: &A, b: &B, c: &C, f: F) -> Result<Die<O>>
where
    A: Term,
    B: Term,
    C: Term,
    O: Value,
    F: Fn(Realized<'_, A>, Realized<'_, B>, Realized<'_, C>) -> Expansion<O>,
{
    let (sa, sb, sc) = (a.space()?, b.space()?, c.space()?);
    let items = iproduct!(&sa, &sb, &sc)
        .map(|((ka, ca), (kb, cb), (kc, cc))| {
            let expansion = f(
                Realized::new(a, ka),
                Realized::new(b, kb),
                Realized::new(c, kc),
            );
            (expansion, ca * cb * cc)
        })
        .collect_vec();
    Ok(reassemble(items))
}

pub fn foreach4<A, B, C, D, O, F>(a: &A, b: &B, c: &C, d: &D, f: F) -> Result<Die<O>>
where
    A: Term,
    B: Term,
    C: Term,
    D: Term,
    O: Value,
    F: Fn(Realized<'_, A>, Realized<'_, B>, Realized<'_, C>, Realized<'_, D>) -> Expansion<O>,
{
    let (sa, sb, sc, sd) = (a.space()?, b.space()?, c.space()?, d.space()?);
    let items = iproduct!(&sa, &sb, &sc, &sd)
        .map(|((ka, ca), (kb, cb), (kc, cc), (kd, cd))| {
            let expansion = f(
                Realized::new(a, ka),
                Realized::new(b, kb),
                Realized::new(c, kc),
                Realized::new(d, kd),
            );
            (expansion, ca * cb * cc * cd)
        })
        .collect_vec();
    Ok(reassemble(items))
}

/// [`foreach`] over any number of terms of one kind.
pub fn foreach_n<A, O, F>(terms: &[A], f: F) -> Result<Die<O>>
where
    A: Term,
    O: Value,
    F: Fn(&[Realized<'_, A>]) -> Expansion<O>,
{
    if terms.is_empty() {
        return Ok(reassemble([(f(&[]), Count::one())]));
    }

    let spaces = terms.iter().map(Term::space).collect::<Result<Vec<_>>>()?;
    let mut items = Vec::new();
    for combo in spaces.iter().map(|s| s.iter()).multi_cartesian_product() {
        let mut count = Count::one();
        let mut realized = Vec::with_capacity(terms.len());
        for (term, (key, c)) in terms.iter().zip(combo) {
            count *= c;
            realized.push(Realized::new(term, key));
        }
        items.push((f(&realized), count));
    }
    log::trace!("{:<32}{:<32}", "resolving dependent terms", items.len());
    Ok(reassemble(items))
}
