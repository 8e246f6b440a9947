//! Error types returned by `Fifo` construction and transfers.

use core::fmt;

use thiserror::Error;

/// Error value indicating insufficient capacity
///
/// Returned by a single-element push on a full `Fifo`; the rejected element is
/// handed back so the caller can retry it.
#[derive(Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Error)]
#[error("insufficient capacity")]
pub struct CapacityError<T = ()> {
    /// The element that caused the error.
    pub element: T,
}

impl<T> CapacityError<T> {
    /// Extracts the element that could not be pushed.
    #[inline]
    pub fn into_element(self) -> T {
        self.element
    }
}

impl<T> fmt::Debug for CapacityError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", "CapacityError", "insufficient capacity")
    }
}

/// Error value returned when a `Fifo` cannot be built on the given storage.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum InitError {
    /// The requested capacity was zero.
    #[error("capacity must be greater than zero")]
    ZeroCapacity,
    /// The requested capacity was not a power of two.
    #[error("capacity {0} is not a power of two")]
    NotPowerOfTwo(usize),
    /// The caller-supplied buffer is shorter than the requested capacity.
    #[error("buffer of {len} elements cannot hold a capacity of {capacity}")]
    BufferTooSmall {
        /// Requested capacity.
        capacity: usize,
        /// Length of the supplied buffer.
        len: usize,
    },
    /// The caller-supplied buffer pointer was null.
    #[error("buffer pointer is null")]
    NullBuffer,
}

/// Error value returned by the all-or-nothing bulk operations.
///
/// A bulk call that fails has not moved any element nor advanced any index.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum TransferError {
    /// Not enough free slots to accept the whole slice.
    #[error("requested {requested} slots but only {available} are free")]
    InsufficientSpace {
        /// Number of elements the call tried to push.
        requested: usize,
        /// Free slots at the time of the call.
        available: usize,
    },
    /// Not enough stored elements to satisfy the whole request.
    #[error("requested {requested} elements but only {available} are stored")]
    InsufficientData {
        /// Number of elements the call tried to take.
        requested: usize,
        /// Stored elements at the time of the call.
        available: usize,
    },
}

impl TransferError {
    /// Number of elements the failed call asked for.
    pub fn requested(&self) -> usize {
        match *self {
            TransferError::InsufficientSpace { requested, .. }
            | TransferError::InsufficientData { requested, .. } => requested,
        }
    }

    /// Number of slots or elements that were available instead.
    pub fn available(&self) -> usize {
        match *self {
            TransferError::InsufficientSpace { available, .. }
            | TransferError::InsufficientData { available, .. } => available,
        }
    }
}
