use alloc::collections::TryReserveError;
use core::fmt;

use thiserror::Error;

/// The tree could not obtain storage for another node.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum AllocError {
    /// Every node handle is in use.
    #[error("node storage is at maximum capacity ({max} nodes)")]
    CapacityOverflow { max: usize },

    /// The allocator refused to grow node storage.
    #[error("node storage could not be allocated: {0}")]
    Exhausted(#[from] TryReserveError),
}

/// An insertion that failed because a node could not be allocated.
///
/// The tree is left untouched and the record is handed back through
/// [`into_record`](InsertError::into_record).
///
/// # Examples
///
/// ```
/// use sapling::{Insert, OrderedTree};
///
/// let mut tree = OrderedTree::new();
/// match tree.insert(7, |_| {}) {
///     Ok(Insert::Inserted) => {}
///     Ok(Insert::Merged(_)) => unreachable!(),
///     Err(e) => {
///         let record = e.into_record();
///         assert_eq!(record, 7);
///     }
/// }
/// ```
#[derive(Error)]
#[error("failed to insert record: {source}")]
pub struct InsertError<T> {
    record: T,
    source: AllocError,
}

impl<T> InsertError<T> {
    pub(crate) fn new(record: T, source: AllocError) -> Self {
        Self { record, source }
    }

    /// Returns the reason no node could be allocated.
    #[must_use]
    pub fn alloc_error(&self) -> &AllocError {
        &self.source
    }

    /// Returns the record that was not inserted.
    #[must_use]
    pub fn record(&self) -> &T {
        &self.record
    }

    /// Gives ownership of the record back to the caller.
    #[must_use]
    pub fn into_record(self) -> T {
        self.record
    }
}

impl<T> fmt::Debug for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError").field("source", &self.source).finish_non_exhaustive()
    }
}
