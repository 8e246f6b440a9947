//! A lock-free single-producer single-consumer ring FIFO with fixed capacity.
//!
//! The FIFO can live directly on the stack with its slots embedded in the
//! value, or it can run on a buffer borrowed from the caller. Both flavors
//! share the same engine: two monotonic counters over a power-of-two mask,
//! and a bulk transfer that never needs more than two contiguous copies.
//!
//! Elements are `Copy`; they are moved in and out by plain memory copies and
//! never dropped by the FIFO.
//!
//! # Feature Flags
//! The **ringfifo** crate has the following cargo feature flags:
//!
//! - `std`
//!   - Optional, enabled by default
//!   - Use libstd
//!
//!
//! - `tracing`
//!   - Optional
//!   - Emit construction and admission-failure events through the `tracing`
//!     crate, and enable [`init_tracing`]
//!
//!
//! - `use_generic_array`
//!   - Optional
//!   - Depend on generic-array and allow using it just like a fixed
//!     size array for `Fifo` storage.
//!
//! # Capacity
//!
//! The capacity is always a power of two and every slot is usable:
//! a `Fifo` of capacity 8 holds 8 elements.
//!
//! # Examples
//! ```
//! use ringfifo::{Fifo, InlineFifo};
//!
//! let mut fifo: InlineFifo<u32, 8> = Fifo::new();
//! assert_eq!(fifo.capacity(), 8);
//!
//! fifo.push(1).unwrap();
//! fifo.push_array(&[2, 3, 4]).unwrap();
//! assert_eq!(fifo.count(), 4);
//!
//! assert_eq!(fifo.pop(), Some(1));
//! let mut out = [0; 3];
//! fifo.pop_array(&mut out).unwrap();
//! assert_eq!(out, [2, 3, 4]);
//! assert!(fifo.is_empty());
//! ```
//!
//! # Caller supplied buffer
//! ```
//! use ringfifo::{Fifo, InitError};
//!
//! let mut buf = [0u8; 1000];
//! assert_eq!(Fifo::with_buffer(&mut buf).err(), Some(InitError::NotPowerOfTwo(1000)));
//!
//! let mut fifo = Fifo::with_capacity(&mut buf, 512).unwrap();
//! fifo.push_array(b"hello").unwrap();
//! assert_eq!(fifo.peek_at(4), Some(b'o'));
//! ```
//!
//! # Producer & Consumer
//! ```
//! use ringfifo::{Fifo, InlineFifo};
//!
//! let mut fifo: InlineFifo<u64, 64> = Fifo::new();
//! let (producer, consumer) = fifo.split();
//!
//! std::thread::scope(|s| {
//!     s.spawn(move || {
//!         for i in 0..1000 {
//!             while producer.push(i).is_err() {
//!                 std::thread::yield_now();
//!             }
//!         }
//!     });
//!
//!     let mut expected = 0;
//!     while expected < 1000 {
//!         match consumer.pop() {
//!             Some(value) => {
//!                 assert_eq!(value, expected);
//!                 expected += 1;
//!             }
//!             None => std::thread::yield_now(),
//!         }
//!     }
//! });
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(missing_docs)]

use core::fmt;
use core::ops::Deref;
use core::sync::atomic::{AtomicUsize, Ordering};

mod logic;
mod split;
mod storage;
mod trace;
mod utils;
pub mod error;

pub use error::{CapacityError, InitError, TransferError};
pub use split::{Consumer, Producer};
#[cfg(feature = "use_generic_array")]
pub use storage::GenericInline;
pub use storage::{External, Inline, Storage};
pub use trace::init_tracing;

use logic::copy::{Parameters, Wrapping};
use logic::CircularBuffer;
use trace::{debug, trace, warn};
use utils::{count, free, slot};

/// A `Fifo` whose `N` slots are embedded in the value.
pub type InlineFifo<T, const N: usize> = Fifo<Inline<T, N>>;

/// A `Fifo` running on a caller supplied buffer.
pub type BufferFifo<'a, T> = Fifo<External<'a, T>>;

/// Monotonic counter kept on its own cache line.
#[repr(align(64))]
struct Counter(AtomicUsize);

impl Counter {
    const fn new() -> Self {
        Counter(AtomicUsize::new(0))
    }
}

impl Deref for Counter {
    type Target = AtomicUsize;

    #[inline(always)]
    fn deref(&self) -> &AtomicUsize {
        &self.0
    }
}

/// A fixed capacity single-producer single-consumer ring FIFO.
///
/// `head` counts every element ever pushed and `tail` every element ever
/// taken out; both only grow (wrapping at `usize::MAX`) until [`reset`].
/// The element for logical position `p` lives in slot `p & (capacity - 1)`.
///
/// Every mutating method on `Fifo` itself takes `&mut self`. To drive the two
/// ends from different threads, [`split`] the FIFO into a [`Producer`] and a
/// [`Consumer`].
///
/// [`reset`]: #method.reset
/// [`split`]: #method.split
pub struct Fifo<S: Storage> {
    head: Counter,
    tail: Counter,
    mask: usize,
    storage: S,
}

// SAFETY: a shared `&Fifo` only reads, unless it is held by a `Producer` or a
// `Consumer`. Those handles are `!Sync`, there is at most one of each per
// `split`, `head` is only stored by the producer and `tail` only by the
// consumer, and slot ownership is handed over with Release/Acquire pairs on
// those counters.
unsafe impl<S: Storage + Send> Sync for Fifo<S> where S::Item: Send {}

impl<T: Copy, const N: usize> Fifo<Inline<T, N>> {
    /// Creates an empty `Fifo` with `N` embedded slots.
    ///
    /// `N` must be a non-zero power of two; other values fail to compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::{Fifo, InlineFifo};
    ///
    /// let fifo: InlineFifo<u8, 1024> = Fifo::new();
    /// assert_eq!(fifo.capacity(), 1024);
    /// assert!(fifo.is_empty());
    /// ```
    ///
    /// ```compile_fail
    /// use ringfifo::{Fifo, InlineFifo};
    ///
    /// let fifo: InlineFifo<u8, 1000> = Fifo::new();
    /// ```
    #[inline]
    pub const fn new() -> Self {
        let storage = Inline::new();
        Fifo {
            head: Counter::new(),
            tail: Counter::new(),
            mask: N - 1,
            storage,
        }
    }
}

impl<T: Copy, const N: usize> Default for Fifo<Inline<T, N>> {
    #[inline]
    fn default() -> Self {
        Fifo::new()
    }
}

impl<'a, T: Copy> Fifo<External<'a, T>> {
    /// Creates an empty `Fifo` on the whole of `buffer`.
    ///
    /// Fails if `buffer.len()` is zero or not a power of two.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::Fifo;
    ///
    /// let mut buf = [0u16; 16];
    /// let fifo = Fifo::with_buffer(&mut buf).unwrap();
    /// assert_eq!(fifo.capacity(), 16);
    /// ```
    pub fn with_buffer(buffer: &'a mut [T]) -> Result<Self, InitError> {
        let capacity = buffer.len();
        Self::with_capacity(buffer, capacity)
    }

    /// Creates an empty `Fifo` on the first `capacity` elements of `buffer`.
    ///
    /// Fails if `capacity` is zero, not a power of two, or larger than
    /// `buffer.len()`.
    pub fn with_capacity(buffer: &'a mut [T], capacity: usize) -> Result<Self, InitError> {
        let storage = External::new(buffer, capacity).map_err(|err| {
            warn!(capacity, error = %err, "rejected fifo buffer");
            err
        })?;
        debug!(capacity, "fifo ready on external buffer");
        Ok(Fifo::from_storage(storage))
    }

    /// Creates an empty `Fifo` on `capacity` elements starting at `ptr`.
    ///
    /// Fails if `capacity` is zero or not a power of two, or if `ptr` is null.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must be valid for reads and writes of `capacity`
    /// initialized elements for `'a`, and nothing else may access that memory
    /// while the `Fifo` is alive.
    pub unsafe fn from_raw_parts(ptr: *mut T, capacity: usize) -> Result<Self, InitError> {
        let storage = External::from_raw_parts(ptr, capacity).map_err(|err| {
            warn!(capacity, error = %err, "rejected fifo buffer");
            err
        })?;
        debug!(capacity, "fifo ready on raw buffer");
        Ok(Fifo::from_storage(storage))
    }
}

impl<S: Storage> Fifo<S> {
    /// Creates an empty `Fifo` on any validated storage.
    #[inline]
    pub fn from_storage(storage: S) -> Self {
        let capacity = storage.capacity();
        debug_assert!(capacity.is_power_of_two());
        Fifo {
            head: Counter::new(),
            tail: Counter::new(),
            mask: capacity - 1,
            storage,
        }
    }

    /// Returns the number of elements the `Fifo` can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// Returns the number of stored elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::{Fifo, InlineFifo};
    ///
    /// let mut fifo: InlineFifo<i32, 4> = Fifo::new();
    /// assert_eq!(fifo.count(), 0);
    /// fifo.push(1).unwrap();
    /// assert_eq!(fifo.count(), 1);
    /// ```
    #[inline]
    pub fn count(&self) -> usize {
        self.producer_count()
    }

    /// Returns the number of free slots.
    #[inline]
    pub fn free(&self) -> usize {
        self.capacity() - self.count()
    }

    /// Returns true if the `Fifo` contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns true if the `Fifo` is full.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::{Fifo, InlineFifo};
    ///
    /// let mut fifo: InlineFifo<i32, 2> = Fifo::new();
    /// fifo.push(1).unwrap();
    /// assert!(!fifo.is_full());
    /// fifo.push(2).unwrap();
    /// assert!(fifo.is_full());
    /// ```
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count() == self.capacity()
    }

    /// Empties the `Fifo` by rewinding both counters to zero.
    ///
    /// Slot contents are not erased; they just become unreachable.
    #[inline]
    pub fn reset(&mut self) {
        self.head.store(0, Ordering::Relaxed);
        self.tail.store(0, Ordering::Relaxed);
    }

    /// Adds an element to the back of the `Fifo`.
    ///
    /// Returns the element back inside a [`CapacityError`] if the `Fifo` is
    /// full; nothing is modified in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::{Fifo, InlineFifo};
    ///
    /// let mut fifo: InlineFifo<i32, 2> = Fifo::new();
    /// fifo.push(1).unwrap();
    /// fifo.push(2).unwrap();
    /// let overflow = fifo.push(3);
    ///
    /// assert_eq!(overflow.unwrap_err().element, 3);
    /// ```
    #[inline]
    pub fn push(&mut self, element: S::Item) -> Result<(), CapacityError<S::Item>> {
        // SAFETY: `&mut self` excludes any other producer or consumer.
        unsafe { self.enqueue(element) }
    }

    /// Removes the front element and returns it, or `None` if the `Fifo` is
    /// empty.
    #[inline]
    #[must_use]
    pub fn pop(&mut self) -> Option<S::Item> {
        // SAFETY: `&mut self` excludes any other producer or consumer.
        unsafe { self.dequeue() }
    }

    /// Removes the front element without returning it.
    ///
    /// Returns false if the `Fifo` is empty.
    #[inline]
    pub fn drop_one(&mut self) -> bool {
        // SAFETY: `&mut self` excludes any other producer or consumer.
        unsafe { self.discard(1).is_ok() }
    }

    /// Removes the `n` front elements without returning them.
    ///
    /// Fails without removing anything if fewer than `n` elements are stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::{Fifo, InlineFifo, TransferError};
    ///
    /// let mut fifo: InlineFifo<i32, 8> = Fifo::new();
    /// fifo.push_array(&[1, 2, 3]).unwrap();
    /// assert_eq!(
    ///     fifo.drop_multi(4),
    ///     Err(TransferError::InsufficientData { requested: 4, available: 3 })
    /// );
    /// fifo.drop_multi(2).unwrap();
    /// assert_eq!(fifo.pop(), Some(3));
    /// ```
    #[inline]
    pub fn drop_multi(&mut self, n: usize) -> Result<(), TransferError> {
        // SAFETY: `&mut self` excludes any other producer or consumer.
        unsafe { self.discard(n) }
    }

    /// Returns a copy of the front element without removing it.
    #[inline]
    pub fn peek(&self) -> Option<S::Item> {
        self.peek_at(0)
    }

    /// Returns a copy of the element `offset` places behind the front, without
    /// removing anything.
    ///
    /// Returns `None` if `offset` is not below [`count`](#method.count).
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<S::Item> {
        // SAFETY: while `&self` is alive no `Producer` exists, so no slot is
        // being written.
        unsafe { self.read_at(offset) }
    }

    /// Appends every element of `items`, in order.
    ///
    /// All or nothing: if fewer than `items.len()` slots are free, fails
    /// without writing anything.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::{Fifo, InlineFifo, TransferError};
    ///
    /// let mut fifo: InlineFifo<u8, 4> = Fifo::new();
    /// fifo.push_array(&[1, 2, 3]).unwrap();
    /// assert_eq!(
    ///     fifo.push_array(&[4, 5]),
    ///     Err(TransferError::InsufficientSpace { requested: 2, available: 1 })
    /// );
    /// assert_eq!(fifo.count(), 3);
    /// ```
    #[inline]
    pub fn push_array(&mut self, items: &[S::Item]) -> Result<(), TransferError> {
        // SAFETY: `&mut self` excludes any other producer or consumer.
        unsafe { self.enqueue_slice(items) }
    }

    /// Removes `out.len()` front elements into `out`, in order.
    ///
    /// All or nothing: if fewer than `out.len()` elements are stored, fails
    /// without touching `out` or the `Fifo`.
    #[inline]
    pub fn pop_array(&mut self, out: &mut [S::Item]) -> Result<(), TransferError> {
        // SAFETY: `&mut self` excludes any other producer or consumer.
        unsafe { self.dequeue_slice(out) }
    }

    /// Splits the `Fifo` into its producer and consumer ends.
    ///
    /// Each end is `Send` but not `Sync`, so each can be moved to its own
    /// thread while the type system keeps one producer and one consumer.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::{Fifo, InlineFifo};
    ///
    /// let mut fifo: InlineFifo<u32, 4> = Fifo::new();
    /// {
    ///     let (producer, consumer) = fifo.split();
    ///     producer.push(7).unwrap();
    ///     assert_eq!(consumer.pop(), Some(7));
    /// }
    /// assert!(fifo.is_empty());
    /// ```
    #[inline]
    pub fn split(&mut self) -> (Producer<'_, S>, Consumer<'_, S>) {
        let fifo = &*self;
        (Producer::new(fifo), Consumer::new(fifo))
    }

    /// Occupancy as seen by the producer: own `head` first, then `tail`.
    #[inline]
    pub(crate) fn producer_count(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        count(head, tail)
    }

    /// Occupancy as seen by the consumer: own `tail` first, then `head`.
    #[inline]
    pub(crate) fn consumer_count(&self) -> usize {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        count(head, tail)
    }

    /// Attempts to push an element.
    ///
    /// # Safety
    ///
    /// Caller must be the only producer.
    #[inline]
    pub(crate) unsafe fn enqueue(&self, element: S::Item) -> Result<(), CapacityError<S::Item>> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        if count(head, tail) >= self.capacity() {
            return Err(CapacityError { element });
        }

        // The slot at `head` is not visible to the consumer until `head` is
        // published below.
        self.slot_ptr(slot(head, self.mask)).write(element);

        self.head.store(head.wrapping_add(1), Ordering::Release);
        Ok(())
    }

    /// Attempts to pop an element.
    ///
    /// # Safety
    ///
    /// Caller must be the only consumer.
    #[inline]
    pub(crate) unsafe fn dequeue(&self) -> Option<S::Item> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if count(head, tail) == 0 {
            return None;
        }

        // The producer won't overwrite this slot until `tail` moves past it.
        let element = self.slot_ptr(slot(tail, self.mask)).read();

        self.tail.store(tail.wrapping_add(1), Ordering::Release);
        Some(element)
    }

    /// Copies the element `offset` places behind the front.
    ///
    /// # Safety
    ///
    /// Caller must be the only consumer.
    #[inline]
    pub(crate) unsafe fn read_at(&self, offset: usize) -> Option<S::Item> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if offset >= count(head, tail) {
            return None;
        }

        Some(self.slot_ptr(slot(tail.wrapping_add(offset), self.mask)).read())
    }

    /// Attempts to discard `n` elements.
    ///
    /// # Safety
    ///
    /// Caller must be the only consumer.
    pub(crate) unsafe fn discard(&self, n: usize) -> Result<(), TransferError> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if n == 0 {
            return Ok(());
        }

        let available = count(head, tail);
        if n > available {
            trace!(requested = n, available, "drop underrun");
            return Err(TransferError::InsufficientData { requested: n, available });
        }

        self.tail.store(tail.wrapping_add(n), Ordering::Release);
        Ok(())
    }

    /// Attempts to push all of `items`.
    ///
    /// # Safety
    ///
    /// Caller must be the only producer.
    pub(crate) unsafe fn enqueue_slice(&self, items: &[S::Item]) -> Result<(), TransferError> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        let n = items.len();
        if n == 0 {
            return Ok(());
        }

        let available = free(head, tail, self.capacity());
        if n > available {
            trace!(requested = n, available, "push_array rejected");
            return Err(TransferError::InsufficientSpace { requested: n, available });
        }

        let params = Parameters::new(slot(head, self.mask), n, self.capacity());
        Wrapping::write(self, params, items);

        self.head.store(head.wrapping_add(n), Ordering::Release);
        Ok(())
    }

    /// Attempts to pop exactly `out.len()` elements.
    ///
    /// # Safety
    ///
    /// Caller must be the only consumer.
    pub(crate) unsafe fn dequeue_slice(&self, out: &mut [S::Item]) -> Result<(), TransferError> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        let n = out.len();
        if n == 0 {
            return Ok(());
        }

        let available = count(head, tail);
        if n > available {
            trace!(requested = n, available, "pop_array underrun");
            return Err(TransferError::InsufficientData { requested: n, available });
        }

        let params = Parameters::new(slot(tail, self.mask), n, self.capacity());
        Wrapping::read(self, params, out);

        self.tail.store(tail.wrapping_add(n), Ordering::Release);
        Ok(())
    }
}

impl<S: Storage> CircularBuffer for Fifo<S> {
    type Item = S::Item;

    #[inline(always)]
    fn array_len(&self) -> usize {
        self.capacity()
    }

    #[inline(always)]
    unsafe fn slot_ptr(&self, index: usize) -> *mut S::Item {
        debug_assert!(index < self.array_len());
        self.storage.as_mut_ptr().add(index)
    }
}

impl<S: Storage> fmt::Debug for Fifo<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Fifo")
            .field("capacity", &self.capacity())
            .field("head", &self.head.load(Ordering::Relaxed))
            .field("tail", &self.tail.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    // Runs `$body` once on an inline and once on an external `Fifo` of the
    // same capacity.
    macro_rules! both_flavors {
        ($cap:expr, |$fifo:ident| $body:block) => {{
            {
                let mut $fifo: Fifo<Inline<u32, { $cap }>> = Fifo::new();
                $body
            }
            {
                let mut buf = [0u32; $cap];
                let mut $fifo = Fifo::with_buffer(&mut buf).unwrap();
                $body
            }
        }};
    }

    fn counters<S: Storage>(fifo: &Fifo<S>) -> (usize, usize) {
        (fifo.head.load(Ordering::Relaxed), fifo.tail.load(Ordering::Relaxed))
    }

    fn set_counters<S: Storage>(fifo: &mut Fifo<S>, head: usize, tail: usize) {
        fifo.head.store(head, Ordering::Relaxed);
        fifo.tail.store(tail, Ordering::Relaxed);
    }

    // Every slot, occupied or not. Only for storage whose slots are all
    // initialized.
    fn raw_slots<S: Storage>(fifo: &Fifo<S>) -> Vec<S::Item> {
        (0..fifo.capacity())
            .map(|i| unsafe { fifo.slot_ptr(i).read() })
            .collect()
    }

    #[test]
    fn capacity_validity() {
        let mut buf = [0u8; 1024];
        assert_eq!(Fifo::with_capacity(&mut buf, 0).err(), Some(InitError::ZeroCapacity));
        assert_eq!(Fifo::with_capacity(&mut buf, 3).err(), Some(InitError::NotPowerOfTwo(3)));
        assert_eq!(
            Fifo::with_capacity(&mut buf, 1000).err(),
            Some(InitError::NotPowerOfTwo(1000))
        );
        for &cap in &[1, 2, 4, 1024] {
            let fifo = Fifo::with_capacity(&mut buf, cap).unwrap();
            assert_eq!(fifo.capacity(), cap);
            assert!(fifo.is_empty());
            assert_eq!(counters(&fifo), (0, 0));
        }
    }

    #[test]
    fn inline_capacities() {
        assert_eq!(InlineFifo::<u8, 1>::new().capacity(), 1);
        assert_eq!(InlineFifo::<u8, 2>::new().capacity(), 2);
        assert_eq!(InlineFifo::<u8, 4>::new().capacity(), 4);
        assert_eq!(InlineFifo::<u8, 1024>::default().capacity(), 1024);
    }

    #[test]
    fn any_round_trip() {
        both_flavors!(8, |fifo| {
            for i in 1..=8 {
                assert!(fifo.push(i).is_ok());
                assert_eq!(fifo.count(), i as usize);
            }
            assert!(fifo.is_full());

            let before = counters(&fifo);
            assert_eq!(fifo.push(9).map_err(CapacityError::into_element), Err(9));
            assert_eq!(counters(&fifo), before);
            assert!(fifo.is_full());

            for i in 1..=8 {
                assert_eq!(fifo.pop(), Some(i));
            }
            assert!(fifo.is_empty());
            assert_eq!(fifo.pop(), None);
        });
    }

    #[test]
    fn any_interleaved() {
        both_flavors!(4, |fifo| {
            for round in 0..10u32 {
                fifo.push(round * 10).unwrap();
                fifo.push(round * 10 + 1).unwrap();
                assert_eq!(fifo.pop(), Some(round * 10));
                assert_eq!(fifo.pop(), Some(round * 10 + 1));
                assert!(fifo.is_empty());
            }
            assert_eq!(counters(&fifo), (20, 20));
        });
    }

    #[test]
    fn any_occupancy_bound() {
        both_flavors!(4, |fifo| {
            for step in 0..64u32 {
                if step % 3 == 0 {
                    let _ = fifo.pop();
                } else {
                    let _ = fifo.push(step);
                }
                let n = fifo.count();
                assert!(n <= fifo.capacity());
                assert_eq!(fifo.is_empty(), n == 0);
                assert_eq!(fifo.is_full(), n == fifo.capacity());
                assert_eq!(fifo.free(), fifo.capacity() - n);
            }
        });
    }

    #[test]
    fn any_wrap_crossing_bulk_transfer() {
        both_flavors!(4, |fifo| {
            fifo.push(10).unwrap();
            fifo.push(11).unwrap();
            fifo.push(12).unwrap();
            assert_eq!(fifo.pop(), Some(10));
            assert_eq!(fifo.pop(), Some(11));
            assert_eq!(counters(&fifo), (3, 2));

            assert_eq!(fifo.free(), 3);
            fifo.push_array(&[20, 21, 22]).unwrap();
            assert_eq!(counters(&fifo), (6, 2));
            assert!(fifo.is_full());

            // slot 3, then slots 0 and 1
            unsafe {
                assert_eq!(fifo.slot_ptr(3).read(), 20);
                assert_eq!(fifo.slot_ptr(0).read(), 21);
                assert_eq!(fifo.slot_ptr(1).read(), 22);
            }

            assert!(fifo.drop_one());
            let mut out = [0; 3];
            fifo.pop_array(&mut out).unwrap();
            assert_eq!(out, [20, 21, 22]);
            assert!(fifo.is_empty());
        });
    }

    #[test]
    fn bulk_failure_leaves_everything_untouched() {
        let mut buf = [0xAAu32; 4];
        let mut fifo = Fifo::with_buffer(&mut buf).unwrap();
        fifo.push_array(&[1, 2, 3]).unwrap();
        assert_eq!(fifo.pop(), Some(1));

        let before = (counters(&fifo), raw_slots(&fifo));

        assert_eq!(
            fifo.push_array(&[7, 7, 7]),
            Err(TransferError::InsufficientSpace { requested: 3, available: 2 })
        );
        assert_eq!((counters(&fifo), raw_slots(&fifo)), before);

        let mut out = [0xFFu32; 3];
        assert_eq!(
            fifo.pop_array(&mut out),
            Err(TransferError::InsufficientData { requested: 3, available: 2 })
        );
        assert_eq!(out, [0xFF; 3]);
        assert_eq!((counters(&fifo), raw_slots(&fifo)), before);

        assert_eq!(
            fifo.drop_multi(3),
            Err(TransferError::InsufficientData { requested: 3, available: 2 })
        );
        assert_eq!((counters(&fifo), raw_slots(&fifo)), before);

        drop(fifo);
        assert_eq!(buf, [1, 2, 3, 0xAA]);
    }

    #[test]
    fn any_zero_length_is_noop() {
        both_flavors!(2, |fifo| {
            let empty: [u32; 0] = [];
            assert!(fifo.push_array(&empty).is_ok());
            assert!(fifo.pop_array(&mut []).is_ok());
            assert!(fifo.drop_multi(0).is_ok());
            assert_eq!(counters(&fifo), (0, 0));

            fifo.push_array(&[1, 2]).unwrap();
            assert!(fifo.push_array(&empty).is_ok());
            assert!(fifo.pop_array(&mut []).is_ok());
            assert!(fifo.drop_multi(0).is_ok());
            assert_eq!(counters(&fifo), (2, 0));
        });
    }

    #[test]
    fn any_peek_is_pure() {
        both_flavors!(4, |fifo| {
            assert_eq!(fifo.peek(), None);
            assert_eq!(fifo.peek_at(0), None);

            fifo.push_array(&[5, 6, 7]).unwrap();
            let before = counters(&fifo);

            assert_eq!(fifo.peek(), Some(5));
            assert_eq!(fifo.peek(), Some(5));
            assert_eq!(fifo.peek_at(0), Some(5));
            assert_eq!(fifo.peek_at(2), Some(7));
            assert_eq!(fifo.peek_at(3), None);
            assert_eq!(fifo.peek_at(usize::MAX), None);

            assert_eq!(counters(&fifo), before);
            assert_eq!(fifo.count(), 3);
            assert_eq!(fifo.pop(), Some(5));
            assert_eq!(fifo.pop(), Some(6));
            assert_eq!(fifo.pop(), Some(7));
        });
    }

    #[test]
    fn any_drop() {
        both_flavors!(4, |fifo| {
            assert!(!fifo.drop_one());
            fifo.push_array(&[1, 2, 3, 4]).unwrap();
            assert!(fifo.drop_one());
            assert_eq!(fifo.peek(), Some(2));
            fifo.drop_multi(3).unwrap();
            assert!(fifo.is_empty());
            assert!(!fifo.drop_one());
            assert_eq!(counters(&fifo), (4, 4));
        });
    }

    #[test]
    fn any_reset() {
        both_flavors!(4, |fifo| {
            fifo.reset();
            assert_eq!(fifo.count(), 0);

            fifo.push_array(&[1, 2, 3]).unwrap();
            fifo.drop_one();
            fifo.reset();
            assert_eq!(fifo.count(), 0);
            assert_eq!(counters(&fifo), (0, 0));
            assert_eq!(fifo.peek(), None);

            fifo.reset();
            assert_eq!(fifo.count(), 0);

            fifo.push_array(&[1, 2, 3, 4]).unwrap();
            assert!(fifo.is_full());
            fifo.reset();
            assert!(fifo.is_empty());
            assert_eq!(fifo.free(), 4);
        });
    }

    #[test]
    fn reset_keeps_stale_contents() {
        let mut buf = [0u8; 4];
        {
            let mut fifo = Fifo::with_buffer(&mut buf).unwrap();
            fifo.push_array(&[9, 8]).unwrap();
            fifo.reset();
            assert!(fifo.is_empty());
        }
        assert_eq!(buf, [9, 8, 0, 0]);
    }

    #[test]
    fn any_counter_wraparound() {
        both_flavors!(8, |fifo| {
            set_counters(&mut fifo, usize::MAX - 2, usize::MAX - 2);
            assert!(fifo.is_empty());

            fifo.push_array(&[1, 2, 3, 4, 5]).unwrap();
            assert_eq!(fifo.count(), 5);
            assert_eq!(counters(&fifo).0, 2);

            fifo.push(6).unwrap();
            fifo.push(7).unwrap();
            fifo.push(8).unwrap();
            assert!(fifo.is_full());
            assert!(fifo.push(9).is_err());

            assert_eq!(fifo.peek_at(7), Some(8));
            let mut out = [0; 6];
            fifo.pop_array(&mut out).unwrap();
            assert_eq!(out, [1, 2, 3, 4, 5, 6]);
            assert_eq!(fifo.pop(), Some(7));
            assert_eq!(fifo.pop(), Some(8));
            assert!(fifo.is_empty());
            assert_eq!(counters(&fifo), (5, 5));
        });
    }

    #[test]
    fn capacity_one() {
        let mut fifo: InlineFifo<u32, 1> = Fifo::new();
        for i in 0..5 {
            fifo.push(i).unwrap();
            assert!(fifo.is_full());
            assert!(fifo.push(i).is_err());
            assert_eq!(fifo.pop(), Some(i));
        }
        fifo.push_array(&[42]).unwrap();
        let mut out = [0];
        fifo.pop_array(&mut out).unwrap();
        assert_eq!(out, [42]);
    }

    #[test]
    fn debug_shows_counters() {
        let mut fifo: InlineFifo<u8, 4> = Fifo::new();
        fifo.push_array(&[1, 2, 3]).unwrap();
        fifo.drop_one();
        assert_eq!(format!("{:?}", fifo), "Fifo { capacity: 4, head: 3, tail: 1 }");
    }
}
