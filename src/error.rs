use thiserror::Error;

/// The error type for table operations.
///
/// Every failure leaves the table exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// An insert into a full table, or of a new key with no free slot along its
    /// probe sequence. The table stays full until an entry is removed or it is
    /// cleared.
    #[error("hash table capacity of {capacity} slots exhausted")]
    CapacityExhausted {
        /// The fixed capacity of the table.
        capacity: usize,
    },

    /// The key to remove is not present in the table.
    #[error("key not found")]
    NotFound,
}
