use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::{Error, Result};

/// A position selector into a sorted roll, lowest outcome first.
///
/// Indices and slices behave like Python's: `-1` is the highest outcome, a
/// slice clamps to the roll and may be empty, an index outside the roll is an
/// error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Which {
    Index(isize),
    Slice(Slice),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: isize,
}

impl Slice {
    #[must_use]
    pub fn new(start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        Self { start, stop, step }
    }

    #[must_use]
    pub fn full() -> Self {
        Self::new(None, None, 1)
    }

    #[must_use]
    pub fn with_step(self, step: isize) -> Self {
        Self { step, ..self }
    }

    /// Positions selected in a roll of `len` outcomes.
    pub fn indices(&self, len: usize) -> Result<Vec<usize>> {
        if self.step == 0 {
            return Err(Error::ZeroStep);
        }
        let n = len as isize;
        let step = self.step;
        let (lower, upper) = if step < 0 { (-1, n - 1) } else { (0, n) };
        let clamp = |bound: Option<isize>, default: isize| match bound {
            None => default,
            Some(i) if i < 0 => (i + n).max(lower),
            Some(i) => i.min(upper),
        };
        let start = clamp(self.start, if step < 0 { upper } else { lower });
        let stop = clamp(self.stop, if step < 0 { lower } else { upper });

        let mut out = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            out.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
        Ok(out)
    }
}

impl Which {
    /// Resolves selectors to positions, in selector order, duplicates kept.
    pub fn positions(which: &[Which], len: usize) -> Result<Vec<usize>> {
        let mut out = Vec::new();
        for w in which {
            match *w {
                Which::Index(index) => {
                    let resolved = if index < 0 { index + len as isize } else { index };
                    if resolved < 0 || resolved >= len as isize {
                        return Err(Error::IndexOutOfRange { index, len });
                    }
                    out.push(resolved as usize);
                }
                Which::Slice(slice) => out.extend(slice.indices(len)?),
            }
        }
        Ok(out)
    }
}

/// Whether `positions` is exactly `0..len`, in ascending order.
pub(crate) fn is_identity(positions: &[usize], len: usize) -> bool {
    positions.iter().copied().eq(0..len)
}

/// Whether `positions` names each of `0..len` exactly once, in any order.
pub(crate) fn covers_all(positions: &[usize], len: usize) -> bool {
    if positions.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &p in positions {
        if seen[p] {
            return false;
        }
        seen[p] = true;
    }
    true
}

impl From<isize> for Which {
    fn from(value: isize) -> Self {
        Which::Index(value)
    }
}

impl From<Slice> for Which {
    fn from(value: Slice) -> Self {
        Which::Slice(value)
    }
}

impl From<Range<isize>> for Which {
    fn from(value: Range<isize>) -> Self {
        Which::Slice(Slice::new(Some(value.start), Some(value.end), 1))
    }
}

impl From<RangeFrom<isize>> for Which {
    fn from(value: RangeFrom<isize>) -> Self {
        Which::Slice(Slice::new(Some(value.start), None, 1))
    }
}

impl From<RangeTo<isize>> for Which {
    fn from(value: RangeTo<isize>) -> Self {
        Which::Slice(Slice::new(None, Some(value.end), 1))
    }
}

impl From<RangeFull> for Which {
    fn from(_: RangeFull) -> Self {
        Which::Slice(Slice::full())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(which: &[Which], len: usize) -> Vec<usize> {
        Which::positions(which, len).unwrap()
    }

    #[test]
    fn negative_indices_count_from_the_top() {
        assert_eq!(pos(&[(-1).into()], 4), vec![3]);
        assert_eq!(pos(&[(-4).into(), 0.into()], 4), vec![0, 0]);
    }

    #[test]
    fn index_out_of_range() {
        assert_eq!(
            Which::positions(&[4.into()], 4),
            Err(Error::IndexOutOfRange { index: 4, len: 4 })
        );
        assert_eq!(
            Which::positions(&[(-5).into()], 4),
            Err(Error::IndexOutOfRange { index: -5, len: 4 })
        );
    }

    #[test]
    fn slices_clamp() {
        assert_eq!(pos(&[(-2..).into()], 5), vec![3, 4]);
        assert_eq!(pos(&[(..2).into()], 5), vec![0, 1]);
        assert_eq!(pos(&[(1..100).into()], 3), vec![1, 2]);
        assert_eq!(pos(&[(-100..1).into()], 3), vec![0]);
        assert_eq!(pos(&[(3..1).into()], 5), Vec::<usize>::new());
        assert_eq!(pos(&[(..).into()], 3), vec![0, 1, 2]);
    }

    #[test]
    fn stepped_slices() {
        assert_eq!(pos(&[Slice::full().with_step(2).into()], 5), vec![0, 2, 4]);
        assert_eq!(pos(&[Slice::full().with_step(-1).into()], 3), vec![2, 1, 0]);
        assert_eq!(
            pos(&[Slice::new(Some(-1), Some(-4), -2).into()], 6),
            vec![5, 3]
        );
        assert_eq!(
            Slice::full().with_step(0).indices(3),
            Err(Error::ZeroStep)
        );
    }

    #[test]
    fn coverage() {
        assert!(covers_all(&[2, 0, 1], 3));
        assert!(!covers_all(&[0, 0, 1], 3));
        assert!(!covers_all(&[0, 1], 3));
        assert!(covers_all(&[], 0));
        assert!(is_identity(&[0, 1, 2], 3));
        assert!(!is_identity(&[1, 0, 2], 3));
        assert!(!is_identity(&[0, 1], 3));
        assert!(is_identity(&[], 0));
    }

    #[test]
    fn huge_steps_stop_instead_of_wrapping() {
        assert_eq!(pos(&[Slice::new(Some(1), None, isize::MAX).into()], 3), vec![1]);
        assert_eq!(pos(&[Slice::full().with_step(isize::MAX).into()], 3), vec![0]);
        assert_eq!(pos(&[Slice::new(Some(-2), None, isize::MIN).into()], 3), vec![1]);
        assert_eq!(pos(&[Slice::full().with_step(isize::MIN).into()], 3), vec![2]);
    }
}
