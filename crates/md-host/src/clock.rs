//! Frame pacing against wall-clock time.

/// Any single gap between updates is masked to this window (~4.19 s),
/// so a host stall can never queue up a proportional catch-up burst.
pub const ELAPSED_MASK: u32 = 0x003F_FFFF;

/// Accumulates elapsed wall-clock time and converts it into due frames.
///
/// The caller samples time in microseconds and feeds it to
/// [`advance`](FrameClock::advance). Whole frames are consumed, the
/// remainder is kept, so after every call the accumulator is strictly
/// less than one frame period.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    micros_per_frame: u32,
    accumulated: u32,
    last: u64,
}

impl FrameClock {
    /// Create a clock targeting the given refresh rate.
    #[must_use]
    pub const fn new(refresh_hz: u32) -> Self {
        Self {
            micros_per_frame: 1_000_000 / refresh_hz,
            accumulated: 0,
            last: 0,
        }
    }

    /// Reset the timing reference to `now` and drop any accumulated time.
    pub fn restart(&mut self, now_micros: u64) {
        self.last = now_micros;
        self.accumulated = 0;
    }

    /// Advance to `now` and return how many frames fell due.
    pub fn advance(&mut self, now_micros: u64) -> u32 {
        let elapsed = (now_micros.wrapping_sub(self.last) as u32) & ELAPSED_MASK;
        self.last = now_micros;
        self.accumulated += elapsed;
        let due = self.accumulated / self.micros_per_frame;
        self.accumulated %= self.micros_per_frame;
        due
    }

    /// Microseconds until the next frame falls due.
    #[must_use]
    pub const fn micros_to_next_frame(&self) -> u32 {
        self.micros_per_frame - self.accumulated
    }

    /// One frame period in microseconds.
    #[must_use]
    pub const fn micros_per_frame(&self) -> u32 {
        self.micros_per_frame
    }

    /// Leftover time carried into the next update.
    #[must_use]
    pub const fn accumulated_micros(&self) -> u32 {
        self.accumulated
    }
}
