//! Accumulated animation time.

/// Monotonic clock advanced by speed-scaled elapsed time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    time: f32,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `elapsed_s * speed`
    ///
    /// Negative or NaN elapsed time and speed both count as zero, so the
    /// clock never runs backwards.
    pub fn advance(&mut self, elapsed_s: f32, speed: f32) -> f32 {
        self.time += elapsed_s.max(0.0) * speed.max(0.0);
        self.time
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_scales_by_speed() {
        let mut clock = AnimationClock::new();
        clock.advance(0.5, 2.0);
        clock.advance(0.25, 2.0);
        assert!((clock.time() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_negative_and_nan_ignored() {
        let mut clock = AnimationClock::new();
        clock.advance(1.0, 1.0);
        clock.advance(-3.0, 1.0);
        clock.advance(f32::NAN, 1.0);
        assert_eq!(clock.time(), 1.0);
    }

    #[test]
    fn test_negative_speed_holds_time() {
        let mut clock = AnimationClock::new();
        clock.advance(2.0, 1.5);
        clock.advance(1.0, -4.0);
        clock.advance(1.0, f32::NAN);
        assert_eq!(clock.time(), 3.0);
    }
}
