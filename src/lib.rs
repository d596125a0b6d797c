//! Exact discrete probability distributions for dice, computed by enumeration.
//!
//! A [`Die`] maps outcomes to integer counts. A [`Pool`] holds several dice and
//! enumerates their sorted joint rolls, which is what order statistics such as
//! "sum of the two highest of four d6" need. The [`foreach`] family resolves a
//! user function over several dice and pools at once.

pub mod defs;
mod die;
mod error;
mod foreach;
pub mod ops;
mod pool;
mod substitute;
mod value;

use std::sync::Arc;

use ahash::AHashMap;
pub use die::{Die, Iter};
pub use error::{Error, Result};
pub use foreach::{foreach, foreach2, foreach3, foreach4, foreach_n, DieResult, PoolResult, Realized, Term};
pub use pool::{Enumeration, Pool, Roll, Slice, Which};
pub use substitute::{Depth, Expansion, Substitution};
pub use value::{ComputableValue, ComputedValue, DefaultValue, Lexical, Value};

/// Number of ways an outcome can occur.
pub type Count = num::BigUint;

type Map<T> = AHashMap<T, Count>;
type Ptr<T> = Arc<T>;

/// Ceiling for [`Depth::Unbounded`] substitutions.
pub const MAX_UNBOUNDED_DEPTH: usize = 256;
