use core::cmp;
use core::ptr;

use super::CircularBuffer;

/// Placement of a linear run of `len` slots starting at physical `offset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parameters {
    pub offset: usize,
    pub len: usize,
    pub pre_wrap_len: usize,
}

impl Parameters {
    /// `len` must not exceed `array_len`, so at most one wrap boundary is crossed.
    #[inline]
    pub fn new(offset: usize, len: usize, array_len: usize) -> Self {
        debug_assert!(offset < array_len);
        debug_assert!(len <= array_len);
        let run = array_len - offset;
        Parameters {
            offset,
            len,
            pre_wrap_len: cmp::min(len, run),
        }
    }

    #[inline]
    pub fn wraps(&self) -> bool {
        self.len > self.pre_wrap_len
    }

    #[inline]
    pub fn post_wrap_len(&self) -> usize {
        self.len - self.pre_wrap_len
    }
}

pub struct Wrapping;

impl Wrapping {
    /// Copies `src` into the ring starting at `params.offset`, wrapping to
    /// slot 0 at most once.
    ///
    /// # Safety
    ///
    /// The caller must own the `params.len` destination slots: no other
    /// thread may read or write them for the duration of the call.
    pub unsafe fn write<B: CircularBuffer>(buffer: &B, params: Parameters, src: &[B::Item]) {
        debug_assert_eq!(src.len(), params.len);
        let Parameters { offset, pre_wrap_len, .. } = params;

        // doesn't wrap
        //
        //        O . .
        // 1 [_ _ _ _ _ _ _ _]
        // 2 [_ _ A B C _ _ _]
        //
        ptr::copy_nonoverlapping(src.as_ptr(), buffer.slot_ptr(offset), pre_wrap_len);

        if params.wraps() {
            // wraps
            //
            //    . .       O .
            // 1 [_ _ _ _ _ _ _ _]
            // 2 [_ _ _ _ _ _ A B]
            // 3 [C D _ _ _ _ A B]
            //
            ptr::copy_nonoverlapping(
                src.as_ptr().add(pre_wrap_len),
                buffer.slot_ptr(0),
                params.post_wrap_len(),
            );
        }
    }

    /// Copies `params.len` elements out of the ring starting at
    /// `params.offset` into `dst`, wrapping to slot 0 at most once.
    ///
    /// # Safety
    ///
    /// The `params.len` source slots must hold initialized elements that no
    /// other thread writes for the duration of the call.
    pub unsafe fn read<B: CircularBuffer>(buffer: &B, params: Parameters, dst: &mut [B::Item]) {
        debug_assert_eq!(dst.len(), params.len);
        let Parameters { offset, pre_wrap_len, .. } = params;

        ptr::copy_nonoverlapping(buffer.slot_ptr(offset), dst.as_mut_ptr(), pre_wrap_len);

        if params.wraps() {
            ptr::copy_nonoverlapping(
                buffer.slot_ptr(0),
                dst.as_mut_ptr().add(pre_wrap_len),
                params.post_wrap_len(),
            );
        }
    }
}
