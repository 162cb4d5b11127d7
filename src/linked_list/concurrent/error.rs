use thiserror::Error;

/// Errors reported by the positional operations of a concurrent list.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ListError {
    /// The index does not address a live position of the list.
    ///
    /// `len` is the length observed when the index was rejected, which may
    /// already be stale by the time the caller sees it.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

impl ListError {
    /// Create an out-of-range error for `index` against the observed `len`.
    #[inline]
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}

/// Result type for list operations.
pub type Result<T, E = ListError> = core::result::Result<T, E>;
