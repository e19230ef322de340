//! Millisecond time source used to bound busy polling.

/// Monotonic 32-bit millisecond counter.
///
/// The counter may wrap; [`elapsed_millis32`](Clock::elapsed_millis32) stays
/// correct across one wrap inside a single poll window.
pub trait Clock {
    /// Current counter value in milliseconds.
    fn now_millis32(&mut self) -> u32;

    /// Milliseconds elapsed since `start`.
    fn elapsed_millis32(&mut self, start: u32) -> u32 {
        elapsed_millis32(start, self.now_millis32())
    }

    /// Called once per busy-poll iteration.
    ///
    /// The default is a non-yielding spin hint. Implementations hosted under a
    /// general-purpose scheduler may override this to yield instead.
    fn relax(&mut self) {
        core::hint::spin_loop();
    }
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_millis32(&mut self) -> u32 {
        T::now_millis32(self)
    }

    fn elapsed_millis32(&mut self, start: u32) -> u32 {
        T::elapsed_millis32(self, start)
    }

    fn relax(&mut self) {
        T::relax(self)
    }
}

/// Wrap-safe difference between two counter readings.
#[inline]
pub const fn elapsed_millis32(start: u32, now: u32) -> u32 {
    now.wrapping_sub(start)
}
