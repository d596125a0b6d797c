mod inner;
mod ptr;

use std::iter::Zip;
use std::slice;

pub(crate) use inner::DieInner;
pub use ptr::Die;

use crate::Count;

/// Outcomes paired with their counts, in outcome order.
pub type Iter<'a, T> = Zip<slice::Iter<'a, T>, slice::Iter<'a, Count>>;
