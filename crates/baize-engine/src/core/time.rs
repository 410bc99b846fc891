/// Fixed-step simulation clock.
///
/// Variable frame deltas from `requestAnimationFrame` are accumulated and
/// converted into a whole number of fixed ticks. The number of ticks per
/// frame is capped so that a backgrounded tab does not replay minutes of
/// simulation when it comes back.
#[derive(Debug, Clone)]
pub struct SimClock {
    dt: f32,
    accumulator: f32,
    max_steps: u32,
    ticks: u64,
}

impl SimClock {
    pub fn new(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
            ticks: 0,
        }
    }

    /// Feed one frame's elapsed time. Returns how many fixed ticks to run.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator = (self.accumulator + frame_dt).min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        self.ticks += steps as u64;
        steps
    }

    /// Interpolation factor between the last two ticks, in [0, 1).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Total fixed ticks run since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds since creation.
    pub fn elapsed(&self) -> f64 {
        self.ticks as f64 * self.dt as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut clock = SimClock::new(1.0 / 60.0, 8);
        assert_eq!(clock.advance(1.0 / 60.0), 1);
        assert_eq!(clock.ticks(), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut clock = SimClock::new(1.0 / 60.0, 8);
        assert_eq!(clock.advance(0.008), 0);
        assert_eq!(clock.advance(0.010), 1);
    }

    #[test]
    fn caps_catch_up() {
        let mut clock = SimClock::new(0.25, 4);
        assert_eq!(clock.advance(10.0), 4);
        // Backlog beyond the cap is dropped, not replayed later.
        assert_eq!(clock.advance(0.0001), 0);
    }

    #[test]
    fn ignores_bad_deltas() {
        let mut clock = SimClock::new(1.0 / 60.0, 5);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.ticks(), 0);
    }

    #[test]
    fn elapsed_tracks_ticks() {
        let mut clock = SimClock::new(0.5, 10);
        clock.advance(1.6);
        assert_eq!(clock.ticks(), 3);
        assert!((clock.elapsed() - 1.5).abs() < 1e-9);
        let a = clock.alpha();
        assert!((0.0..1.0).contains(&a), "alpha was {}", a);
    }
}
