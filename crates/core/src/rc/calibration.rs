//! Receiver idle calibration

use crate::protocol::CalibrationFrame;

/// Idle pulse midpoint used when auto-calibration is disabled
pub const FIXED_IDLE_US: i32 = 1500;

/// Idle pulse widths for throttle and steering
///
/// Starts unset under auto-calibration and is only ever written by
/// calibration frames; it is never cleared within a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalibrationState {
    pub throttle_idle: Option<i32>,
    pub steering_idle: Option<i32>,
}

impl CalibrationState {
    /// Unset state, waiting for the first calibration frame
    pub const fn auto() -> Self {
        Self {
            throttle_idle: None,
            steering_idle: None,
        }
    }

    /// Preset to the fixed midpoint
    pub const fn fixed() -> Self {
        Self {
            throttle_idle: Some(FIXED_IDLE_US),
            steering_idle: Some(FIXED_IDLE_US),
        }
    }

    pub fn apply(&mut self, frame: &CalibrationFrame) {
        self.throttle_idle = Some(frame.throttle_idle);
        self.steering_idle = Some(frame.steering_idle);
    }

    pub fn is_calibrated(&self) -> bool {
        self.throttle_idle.is_some() && self.steering_idle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_starts_unset() {
        let cal = CalibrationState::auto();
        assert!(!cal.is_calibrated());
        assert_eq!(cal.throttle_idle, None);
    }

    #[test]
    fn test_fixed_is_midpoint() {
        let cal = CalibrationState::fixed();
        assert_eq!(cal.throttle_idle, Some(1500));
        assert_eq!(cal.steering_idle, Some(1500));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let frame = CalibrationFrame {
            throttle_idle: 1490,
            steering_idle: 1512,
        };
        let mut once = CalibrationState::auto();
        once.apply(&frame);
        let mut twice = once;
        twice.apply(&frame);
        assert_eq!(once, twice);
        assert!(twice.is_calibrated());
    }
}
