//! Elapsed-time bookkeeping for the animation scheduler.

/// Monotonic animation clock.
///
/// The host supplies the current time each frame; the clock only ever moves
/// forward. A time earlier than the last one seen is ignored (and logged), so
/// every update rule observes a non-decreasing `elapsed`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    elapsed: f32,
    delta: f32,
    ticks: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances to `now` seconds and returns the new elapsed time.
    pub fn advance_to(&mut self, now: f32) -> f32 {
        if now.is_finite() && now >= self.elapsed {
            self.delta = now - self.elapsed;
            self.elapsed = now;
        } else {
            log::warn!(
                "clock asked to go from {:.4}s to {now}s, holding",
                self.elapsed
            );
            self.delta = 0.0;
        }
        self.ticks = self.ticks.wrapping_add(1);
        self.elapsed
    }

    /// Seconds since the clock started.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds between the last two ticks.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Number of ticks since the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Back to zero. Only for full scene re-initialisation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
