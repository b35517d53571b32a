//! Cosmetic upload progress.
//!
//! Progress accumulates fractional increments and is displayed floored to a
//! whole percentage. It completes exactly when the accumulated value is
//! clamped to 100. The increments come from the caller so this stays
//! deterministic under test.

/// Upper bound of a single tick's increment, in percentage points.
pub const DEFAULT_MAX_STEP: f64 = 15.0;

/// Completion value.
pub const PROGRESS_COMPLETE: u8 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSimulation {
    value: f64,
    max_step: f64,
}

impl ProgressSimulation {
    pub fn new(max_step: f64) -> Self {
        Self {
            value: 0.0,
            max_step: max_step.max(f64::MIN_POSITIVE),
        }
    }

    pub fn max_step(&self) -> f64 {
        self.max_step
    }

    /// Displayed percentage.
    pub fn percent(&self) -> u8 {
        self.value.floor() as u8
    }

    pub fn is_complete(&self) -> bool {
        self.value >= f64::from(PROGRESS_COMPLETE)
    }

    /// Apply one tick. `increment` is clamped into `(0, max_step]` so the
    /// accumulated value always grows; the result is clamped to 100.
    ///
    /// Returns the displayed percentage after the tick.
    pub fn advance(&mut self, increment: f64) -> u8 {
        let step = if increment.is_finite() && increment > 0.0 {
            increment.min(self.max_step)
        } else {
            f64::MIN_POSITIVE
        };
        self.value = (self.value + step).min(f64::from(PROGRESS_COMPLETE));
        self.percent()
    }
}

impl Default for ProgressSimulation {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let p = ProgressSimulation::default();
        assert_eq!(p.percent(), 0);
        assert!(!p.is_complete());
    }

    #[test]
    fn floors_fractional_progress() {
        let mut p = ProgressSimulation::default();
        assert_eq!(p.advance(7.9), 7);
        assert_eq!(p.advance(0.2), 8);
    }

    #[test]
    fn clamps_to_hundred_exactly() {
        let mut p = ProgressSimulation::default();
        for _ in 0..6 {
            p.advance(15.0);
        }
        assert_eq!(p.percent(), 90);
        assert_eq!(p.advance(15.0), 100);
        assert!(p.is_complete());
        assert_eq!(p.advance(15.0), 100);
    }

    #[test]
    fn increment_capped_at_max_step() {
        let mut p = ProgressSimulation::new(15.0);
        assert_eq!(p.advance(40.0), 15);
    }

    #[test]
    fn non_positive_increment_still_moves_forward() {
        let mut p = ProgressSimulation::default();
        p.advance(0.0);
        p.advance(-3.0);
        p.advance(f64::NAN);
        assert!(p.value > 0.0);
        assert_eq!(p.percent(), 0);
    }

    #[test]
    fn max_step_ticks_needed() {
        let mut p = ProgressSimulation::default();
        let mut ticks = 0;
        while !p.is_complete() {
            p.advance(DEFAULT_MAX_STEP);
            ticks += 1;
        }
        assert_eq!(ticks, 7);
    }
}
