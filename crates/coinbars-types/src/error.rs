//! Dataset errors.

use thiserror::Error;

/// Error for operations that would break dataset ordering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    /// A bar was not strictly later than its predecessor.
    #[error("bar at {time} is not after the previous bar at {last}")]
    NotAscending {
        /// Time of the preceding bar.
        last: i64,
        /// Time of the offending bar.
        time: i64,
    },
}
