//! Frame delta from requestAnimationFrame timestamps

use crate::consts::MAX_FRAME_DT_MS;

/// Nominal 60 Hz frame in milliseconds
pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous call, capped so a backgrounded tab
    /// does not produce one huge step. The first call returns a nominal frame.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_DT_MS as f64),
            None => NOMINAL_FRAME_MS,
        };
        self.last = Some(now_ms);
        dt as f32
    }

    /// Forget the previous timestamp, e.g. after resuming from pause
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_nominal() {
        let mut clock = FrameClock::new();
        assert!((clock.delta(5000.0) - 16.666_666).abs() < 1e-3);
        assert_eq!(clock.delta(5020.0), 20.0);
    }

    #[test]
    fn test_delta_capped() {
        let mut clock = FrameClock::new();
        clock.delta(0.0);
        assert_eq!(clock.delta(2500.0), MAX_FRAME_DT_MS);
        // Clock going backwards never yields a negative step
        assert_eq!(clock.delta(2000.0), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new();
        clock.delta(0.0);
        clock.reset();
        assert!((clock.delta(9000.0) - 16.666_666).abs() < 1e-3);
    }
}
