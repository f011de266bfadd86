#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Frame clock: delta since the previous tick and time since start.
///
/// `elapsed` is the clock every fly-away timestamp is taken on: a key's
/// `started_at` and the `now` it is compared against both come from
/// [`elapsed_seconds`](Self::elapsed_seconds). Sampled once per frame, so
/// input handled between two ticks shares the earlier tick's time.
pub struct Timer {
    start_time: Instant,
    last_update: Instant,
    /// Time between the last two ticks.
    pub delta: Duration,
    /// Time from creation to the last tick.
    pub elapsed: Duration,
    pub frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_update: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Samples the clock. Called once per frame before the update.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_update;
        self.elapsed = now - self.start_time;
        self.last_update = now;
        self.frame_count += 1;
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Fly-away time base. As an `f32` it keeps millisecond resolution for
    /// a few hours; after days of uptime frame deltas start to round.
    #[must_use]
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_the_sum_of_deltas() {
        let mut timer = Timer::new();
        let mut total = Duration::ZERO;
        for _ in 0..5 {
            std::thread::sleep(Duration::from_millis(2));
            timer.tick();
            total += timer.delta;
        }
        assert_eq!(timer.elapsed, total);
        assert_eq!(timer.frame_count, 5);
        assert!(timer.elapsed_seconds() >= 0.01);
    }
}
