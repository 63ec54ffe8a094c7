use std::time::{Duration, Instant};

/// Timing snapshot for one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Monotonic timestamp of the tick.
    pub now: Instant,

    /// Number of frames ticked before this one.
    pub frame_index: u64,
}

/// Produces clamped delta times.
///
/// A window that was minimised or stopped in a debugger would otherwise hand
/// the scenes one enormous step and spin the structures half a turn.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(100))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Moves the baseline to now. Call after resuming from suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Ticks against an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_at(start: Instant) -> FrameClock {
        let mut c = FrameClock::new();
        c.last = start;
        c
    }

    #[test]
    fn regular_frame_passes_through() {
        let t0 = Instant::now();
        let mut c = clock_at(t0);
        let ft = c.tick_at(t0 + Duration::from_millis(16));
        assert!((ft.dt - 0.016).abs() < 1e-6);
        assert_eq!(ft.frame_index, 0);
    }

    #[test]
    fn long_stall_is_clamped() {
        let t0 = Instant::now();
        let mut c = clock_at(t0);
        let ft = c.tick_at(t0 + Duration::from_secs(5));
        assert!((ft.dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn zero_step_is_raised_to_minimum() {
        let t0 = Instant::now();
        let mut c = clock_at(t0);
        let ft = c.tick_at(t0);
        assert!(ft.dt > 0.0);
    }

    #[test]
    fn frame_index_counts_up() {
        let t0 = Instant::now();
        let mut c = clock_at(t0);
        c.tick_at(t0 + Duration::from_millis(10));
        let ft = c.tick_at(t0 + Duration::from_millis(20));
        assert_eq!(ft.frame_index, 1);
    }
}
