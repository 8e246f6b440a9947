pub mod copy;

/// Raw view of a power-of-two ring of slots.
pub trait CircularBuffer {
    type Item: Copy;

    fn array_len(&self) -> usize;

    /// Pointer to physical slot `index`.
    ///
    /// # Safety
    ///
    /// `index` must be below `array_len()`.
    unsafe fn slot_ptr(&self, index: usize) -> *mut Self::Item;
}
