use crate::error::InitError;

/// Number of elements between the two monotonic counters.
///
/// Counters are free to wrap past `usize::MAX`; the distance stays exact as
/// long as it never exceeds the capacity.
#[inline]
pub fn count(head: usize, tail: usize) -> usize {
    head.wrapping_sub(tail)
}

/// Number of free slots left between the two monotonic counters.
#[inline]
pub fn free(head: usize, tail: usize, capacity: usize) -> usize {
    debug_assert!(count(head, tail) <= capacity);
    capacity - count(head, tail)
}

/// Physical slot for a logical position.
#[inline]
pub fn slot(index: usize, mask: usize) -> usize {
    index & mask
}

#[inline]
pub fn check_capacity(capacity: usize) -> Result<(), InitError> {
    if capacity == 0 {
        Err(InitError::ZeroCapacity)
    } else if !capacity.is_power_of_two() {
        Err(InitError::NotPowerOfTwo(capacity))
    } else {
        Ok(())
    }
}
