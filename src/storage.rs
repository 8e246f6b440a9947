//! Slot arrays a `Fifo` can run on.

use core::cell::UnsafeCell;
use core::marker::PhantomData;
use core::mem::MaybeUninit;
use core::ptr::NonNull;

use crate::error::InitError;
use crate::utils::check_capacity;

/// Trait for contiguous, fixed size slot arrays.
///
/// # Safety
///
/// Implementors must guarantee that:
/// - `capacity()` is a non-zero power of two and never changes;
/// - `as_mut_ptr()` points to `capacity()` slots that stay valid for reads
///   and writes of `Self::Item` for as long as `self` is alive;
/// - writing through that pointer while only `&self` is held is sound, i.e.
///   the slots sit behind interior mutability or an exclusive borrow.
pub unsafe trait Storage {
    /// The array’s element type
    type Item: Copy;

    /// Returns number of elements the array can hold
    fn capacity(&self) -> usize;

    /// Returns an unsafe mutable pointer to the first slot.
    fn as_mut_ptr(&self) -> *mut Self::Item;
}

/// Slot array embedded in the `Fifo` value, with a capacity fixed at compile
/// time.
///
/// `N` must be a non-zero power of two; any other value is rejected when
/// [`Inline::new`] is instantiated, before an instance can exist.
pub struct Inline<T, const N: usize> {
    slots: UnsafeCell<[MaybeUninit<T>; N]>,
}

impl<T: Copy, const N: usize> Inline<T, N> {
    const CAPACITY_OK: () = assert!(
        N.is_power_of_two(),
        "inline capacity must be a non-zero power of two"
    );

    /// Creates an uninitialized slot array.
    #[inline]
    pub const fn new() -> Self {
        let () = Self::CAPACITY_OK;
        Inline {
            slots: UnsafeCell::new([MaybeUninit::uninit(); N]),
        }
    }
}

impl<T: Copy, const N: usize> Default for Inline<T, N> {
    #[inline]
    fn default() -> Self {
        Inline::new()
    }
}

unsafe impl<T: Copy, const N: usize> Storage for Inline<T, N> {
    type Item = T;

    #[inline(always)]
    fn capacity(&self) -> usize {
        N
    }

    #[inline(always)]
    fn as_mut_ptr(&self) -> *mut T {
        self.slots.get() as *mut T
    }
}

/// Slot array borrowed from the caller, with a capacity chosen at runtime.
pub struct External<'a, T> {
    ptr: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<&'a mut [T]>,
}

impl<'a, T: Copy> External<'a, T> {
    /// Wraps the first `capacity` elements of `buffer`.
    ///
    /// Fails if `capacity` is zero, not a power of two, or larger than
    /// `buffer.len()`. The buffer is left untouched either way.
    pub fn new(buffer: &'a mut [T], capacity: usize) -> Result<Self, InitError> {
        check_capacity(capacity)?;
        if buffer.len() < capacity {
            return Err(InitError::BufferTooSmall {
                capacity,
                len: buffer.len(),
            });
        }
        Ok(External {
            ptr: NonNull::from(buffer).cast(),
            capacity,
            _marker: PhantomData,
        })
    }

    /// Wraps `capacity` elements starting at `ptr`.
    ///
    /// Fails if `capacity` is zero or not a power of two, or if `ptr` is null.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must be valid for reads and writes of `capacity`
    /// initialized elements for `'a`, and nothing else may access that memory
    /// while the returned value is alive.
    pub unsafe fn from_raw_parts(ptr: *mut T, capacity: usize) -> Result<Self, InitError> {
        check_capacity(capacity)?;
        let ptr = NonNull::new(ptr).ok_or(InitError::NullBuffer)?;
        Ok(External {
            ptr,
            capacity,
            _marker: PhantomData,
        })
    }
}

unsafe impl<'a, T: Copy> Storage for External<'a, T> {
    type Item = T;

    #[inline(always)]
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    fn as_mut_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }
}

// SAFETY: External stands in for the `&'a mut [T]` it was built from.
unsafe impl<'a, T: Send> Send for External<'a, T> {}

#[cfg(feature = "use_generic_array")]
pub use self::generic_impl::GenericInline;

#[cfg(feature = "use_generic_array")]
mod generic_impl {
    use super::Storage;
    use core::cell::UnsafeCell;
    use core::mem::MaybeUninit;
    use generic_array::sequence::GenericSequence;
    use generic_array::{ArrayLength, GenericArray};

    /// Embedded slot array whose length is a `typenum` type-level integer.
    pub struct GenericInline<T, N>
    where
        N: ArrayLength<MaybeUninit<T>>,
    {
        slots: UnsafeCell<GenericArray<MaybeUninit<T>, N>>,
    }

    impl<T: Copy, N> GenericInline<T, N>
    where
        N: ArrayLength<MaybeUninit<T>>,
    {
        const CAPACITY_OK: () = assert!(
            N::USIZE.is_power_of_two(),
            "inline capacity must be a non-zero power of two"
        );

        /// Creates an uninitialized slot array.
        pub fn new() -> Self {
            let () = Self::CAPACITY_OK;
            GenericInline {
                slots: UnsafeCell::new(GenericArray::generate(|_| MaybeUninit::uninit())),
            }
        }
    }

    impl<T: Copy, N> Default for GenericInline<T, N>
    where
        N: ArrayLength<MaybeUninit<T>>,
    {
        fn default() -> Self {
            GenericInline::new()
        }
    }

    unsafe impl<T: Copy, N> Storage for GenericInline<T, N>
    where
        N: ArrayLength<MaybeUninit<T>>,
    {
        type Item = T;

        #[inline(always)]
        fn capacity(&self) -> usize {
            N::USIZE
        }

        #[inline(always)]
        fn as_mut_ptr(&self) -> *mut T {
            self.slots.get() as *mut T
        }
    }
}
