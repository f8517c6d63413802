/// Per-frame increment applied to `cloud_shift`.
pub const DEFAULT_SHIFT_STEP: f32 = 0.02;

/// Default wrap period for `cloud_shift`.
///
/// At this period every octave's lattice offset (`0.15`, `0.25`, `0.5`,
/// `0.05`, `0.1` per unit of shift) lands on a whole number of cells.
pub const DEFAULT_WRAP_PERIOD: f32 = 20_000.0;

/// Owns the animation parameter fed to the fragment shader.
///
/// The value is derived from a frame counter instead of being accumulated, so
/// it does not pick up rounding drift over long sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClock {
    step: f32,
    wrap_period: Option<f32>,
    frames: u64,
}

impl AnimationClock {
    /// Creates a clock at `cloud_shift == 0`.
    ///
    /// A `wrap_period` of `None` (or a non-positive value) lets the shift
    /// grow without bound.
    pub fn new(step: f32, wrap_period: Option<f32>) -> Self {
        Self {
            step,
            wrap_period: wrap_period.filter(|period| *period > 0.0),
            frames: 0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn wrap_period(&self) -> Option<f32> {
        self.wrap_period
    }

    /// Number of times [`advance`](Self::advance) has been called.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Current value of `cloud_shift`.
    pub fn cloud_shift(&self) -> f32 {
        let shift = self.frames as f64 * f64::from(self.step);
        match self.wrap_period {
            Some(period) => shift.rem_euclid(f64::from(period)) as f32,
            None => shift as f32,
        }
    }

    /// Moves one frame forward and returns the new `cloud_shift`.
    pub fn advance(&mut self) -> f32 {
        self.frames = self.frames.saturating_add(1);
        self.cloud_shift()
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(DEFAULT_SHIFT_STEP, Some(DEFAULT_WRAP_PERIOD))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let clock = AnimationClock::default();
        assert_eq!(clock.cloud_shift(), 0.0);
        assert_eq!(clock.frames(), 0);
    }

    #[test]
    fn n_steps_yield_step_times_n() {
        let mut clock = AnimationClock::default();
        for n in 1..=5_000u32 {
            let shift = clock.advance();
            let expected = 0.02 * n as f32;
            assert!(
                (shift - expected).abs() <= expected * 1.0e-6 + 1.0e-6,
                "frame {n}: {shift} vs {expected}"
            );
        }
    }

    #[test]
    fn wraps_at_period() {
        let mut clock = AnimationClock::new(0.5, Some(2.0));
        let values: Vec<f32> = (0..6).map(|_| clock.advance()).collect();
        assert_eq!(values, vec![0.5, 1.0, 1.5, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn unbounded_without_period() {
        let mut clock = AnimationClock::new(1.0, None);
        for _ in 0..30_000 {
            clock.advance();
        }
        assert_eq!(clock.cloud_shift(), 30_000.0);

        let clock = AnimationClock::new(1.0, Some(0.0));
        assert_eq!(clock.wrap_period(), None);
    }

    #[test]
    fn default_period_aligns_octave_offsets() {
        for rate in [0.15_f32, 0.25, 0.5, 0.05, 0.1] {
            let cells = f64::from(DEFAULT_WRAP_PERIOD) * f64::from(rate);
            assert!((cells - cells.round()).abs() < 1.0e-3, "rate {rate}");
        }
    }
}
