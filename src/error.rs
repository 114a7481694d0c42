//! Error types for symnmf-core.
//!
//! Core operations never recover locally: whatever a stage owns is dropped on
//! the way out and the error is handed to the caller unchanged.

use thiserror::Error;

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or factorizing matrices.
#[derive(Error, Debug)]
pub enum Error {
    /// The backing buffer for a matrix could not be reserved, or
    /// `rows * cols` does not fit in `usize`.
    #[error("failed to allocate a {rows}x{cols} matrix")]
    Allocation {
        /// Requested row count
        rows: usize,
        /// Requested column count
        cols: usize,
    },

    /// Operand shapes are incompatible for the named operation.
    #[error("dimension mismatch in {op}: {lhs:?} vs {rhs:?}")]
    DimensionMismatch {
        /// Operation that rejected the operands
        op: &'static str,
        /// Shape of the left operand as (rows, cols)
        lhs: (usize, usize),
        /// Shape of the right operand as (rows, cols)
        rhs: (usize, usize),
    },

    /// A points source could not be turned into a well-formed matrix.
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput {
        /// 1-based line number of the offending record (0 for whole-input problems)
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// A caller-supplied parameter cannot be used.
    #[error("invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// I/O failure while reading points or writing a matrix.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::DimensionMismatch`].
    pub(crate) fn mismatch(op: &'static str, lhs: (usize, usize), rhs: (usize, usize)) -> Self {
        Self::DimensionMismatch { op, lhs, rhs }
    }

    /// Returns `true` for [`Error::Allocation`].
    pub fn is_allocation(&self) -> bool {
        matches!(self, Self::Allocation { .. })
    }
}
