use std::collections::TryReserveError;

use thiserror::Error;

/// Errors that can occur when a buffer needs to acquire a new byte region.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested byte region could not be obtained from the allocator.
    ///
    /// When this is returned, no instance was created and the target of an assignment
    /// still owns exactly the region it owned before the call.
    #[error("failed to allocate a byte region of {requested_len} bytes")]
    AllocationFailure {
        /// The number of bytes that was requested.
        requested_len: usize,

        /// The underlying reason reported by the allocator.
        #[source]
        source: TryReserveError,
    },
}

/// A specialized `Result` type for buffer operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::error::Error as _;
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    fn capacity_overflow() -> TryReserveError {
        Vec::<u8>::new()
            .try_reserve_exact(usize::MAX)
            .expect_err("usize::MAX bytes can never be reserved")
    }

    #[test]
    fn allocation_failure_names_requested_len() {
        let error = Error::AllocationFailure {
            requested_len: 1234,
            source: capacity_overflow(),
        };

        assert_eq!(
            error.to_string(),
            "failed to allocate a byte region of 1234 bytes"
        );
    }

    #[test]
    fn allocation_failure_exposes_source() {
        let error = Error::AllocationFailure {
            requested_len: usize::MAX,
            source: capacity_overflow(),
        };

        assert!(error.source().is_some());
    }
}
