//! Producer and consumer ends of a split `Fifo`.
//!
//! - [`Producer`] - write end, the only one allowed to advance `head`
//! - [`Consumer`] - read end, the only one allowed to advance `tail`
//!
//! Both are wait-free: every call either completes or fails immediately.
//! Neither spins nor blocks; a caller that wants to wait retries on its own.

use core::cell::Cell;
use core::marker::PhantomData;

use crate::error::{CapacityError, TransferError};
use crate::storage::Storage;
use crate::Fifo;

/// Marker type to opt-out of `Sync` while remaining `Send`.
type PhantomUnsync = PhantomData<Cell<&'static ()>>;

/// Write end of a split [`Fifo`].
///
/// # Thread Safety
///
/// `Producer` is [`Send`] but **not** [`Sync`]:
/// - Can transfer ownership to another thread
/// - Cannot share `&Producer` (no concurrent `push()`)
pub struct Producer<'a, S: Storage> {
    fifo: &'a Fifo<S>,
    _unsync: PhantomUnsync,
}

/// Read end of a split [`Fifo`].
///
/// See [`Producer`] for thread safety details (same semantics apply).
pub struct Consumer<'a, S: Storage> {
    fifo: &'a Fifo<S>,
    _unsync: PhantomUnsync,
}

impl<'a, S: Storage> Producer<'a, S> {
    pub(crate) fn new(fifo: &'a Fifo<S>) -> Self {
        Producer {
            fifo,
            _unsync: PhantomData,
        }
    }

    /// Attempts to push an element (wait-free).
    ///
    /// # Errors
    ///
    /// Returns the element inside a [`CapacityError`] if the `Fifo` is full.
    #[inline]
    pub fn push(&self, element: S::Item) -> Result<(), CapacityError<S::Item>> {
        // SAFETY: this is the only producer of the split.
        unsafe { self.fifo.enqueue(element) }
    }

    /// Attempts to push every element of `items`, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InsufficientSpace`] without writing anything
    /// if fewer than `items.len()` slots are free.
    #[inline]
    pub fn push_array(&self, items: &[S::Item]) -> Result<(), TransferError> {
        // SAFETY: this is the only producer of the split.
        unsafe { self.fifo.enqueue_slice(items) }
    }

    /// Returns the number of elements the `Fifo` can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.fifo.capacity()
    }

    /// Returns the number of stored elements.
    ///
    /// The consumer may take elements concurrently, so this is a lower
    /// bound on the free space by the time the caller looks at it.
    #[inline]
    pub fn count(&self) -> usize {
        self.fifo.producer_count()
    }

    /// Returns the number of free slots.
    #[inline]
    pub fn free(&self) -> usize {
        self.capacity() - self.count()
    }

    /// Returns true if no slot is free.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count() == self.capacity()
    }
}

impl<'a, S: Storage> Consumer<'a, S> {
    pub(crate) fn new(fifo: &'a Fifo<S>) -> Self {
        Consumer {
            fifo,
            _unsync: PhantomData,
        }
    }

    /// Attempts to pop an element (wait-free).
    ///
    /// Returns `None` if the `Fifo` is empty.
    #[inline]
    #[must_use]
    pub fn pop(&self) -> Option<S::Item> {
        // SAFETY: this is the only consumer of the split.
        unsafe { self.fifo.dequeue() }
    }

    /// Attempts to pop exactly `out.len()` elements into `out`, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InsufficientData`] without touching `out` if
    /// fewer than `out.len()` elements are stored.
    #[inline]
    pub fn pop_array(&self, out: &mut [S::Item]) -> Result<(), TransferError> {
        // SAFETY: this is the only consumer of the split.
        unsafe { self.fifo.dequeue_slice(out) }
    }

    /// Discards the front element. Returns false if the `Fifo` is empty.
    #[inline]
    pub fn drop_one(&self) -> bool {
        // SAFETY: this is the only consumer of the split.
        unsafe { self.fifo.discard(1).is_ok() }
    }

    /// Discards the `n` front elements, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InsufficientData`] without discarding anything
    /// if fewer than `n` elements are stored.
    #[inline]
    pub fn drop_multi(&self, n: usize) -> Result<(), TransferError> {
        // SAFETY: this is the only consumer of the split.
        unsafe { self.fifo.discard(n) }
    }

    /// Returns a copy of the front element without removing it.
    #[inline]
    pub fn peek(&self) -> Option<S::Item> {
        self.peek_at(0)
    }

    /// Returns a copy of the element `offset` places behind the front.
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<S::Item> {
        // SAFETY: this is the only consumer of the split.
        unsafe { self.fifo.read_at(offset) }
    }

    /// Returns the number of elements the `Fifo` can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.fifo.capacity()
    }

    /// Returns the number of stored elements.
    ///
    /// The producer may add elements concurrently, so this is a lower bound
    /// by the time the caller looks at it.
    #[inline]
    pub fn count(&self) -> usize {
        self.fifo.consumer_count()
    }

    /// Returns true if no element is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}
