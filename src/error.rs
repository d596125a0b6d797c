use thiserror::Error;

pub type Result<T> = ::core::result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Selection needs sorted rolls but the outcome type only has the string fallback.
    #[error("outcomes have no total order, selection must cover every position")]
    Unordered,
    #[error("index {index} out of range for roll of {len} dice")]
    IndexOutOfRange { index: isize, len: usize },
    #[error("slice step cannot be zero")]
    ZeroStep,
    #[error("substitution still expanding after {depth} levels")]
    Unbounded { depth: usize },
    #[error("division by zero")]
    DivisionByZero,
}
