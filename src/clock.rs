use std::time::Instant;

/// Measures the wall time between consecutive frames.
#[derive(Debug, Default)]
pub struct FrameClock {
    /// Timestamp of the previous tick, unset until the first frame
    last_timestamp: Option<Instant>,
    /// Seconds between the last two ticks
    elapsed_seconds: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the monotonic clock and return the seconds elapsed since the previous tick.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// Advance the clock to `now`.
    ///
    /// The first tick has no previous timestamp and reports zero. Instants earlier than the
    /// previous one saturate to zero rather than going negative.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        self.elapsed_seconds = match self.last_timestamp {
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last_timestamp = Some(now);
        self.elapsed_seconds
    }

    /// Seconds measured by the most recent tick.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }
}
