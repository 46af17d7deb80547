//! Odometry normalizer
//!
//! The hat reports the interval between wheel encoder pulses: a long
//! interval means slow. Speed is that interval mapped onto [0, 1], with
//! anything at or above the configured maximum reading as stopped.

use crate::parameters::OdomParams;
use crate::protocol::FrameSnapshot;
use crate::rc::map_range;

/// Normalized speed from Sensors frames
#[derive(Debug, Clone)]
pub struct OdometryNormalizer {
    max_pulses: i32,
    speed: f32,
    /// Sensors generation consumed by the last update
    seen: Option<u32>,
}

impl OdometryNormalizer {
    pub fn new(params: &OdomParams) -> Self {
        Self {
            max_pulses: params.max_pulses.max(1),
            speed: 0.0,
            seen: None,
        }
    }

    /// Update from the latest snapshot, holding the last value when the
    /// Sensors slot has not changed
    pub fn tick(&mut self, frames: &FrameSnapshot) -> f32 {
        let generation = frames.generations.sensors;
        if let Some(sensors) = frames.sensors {
            if self.seen != Some(generation) {
                self.seen = Some(generation);
                self.speed = self.normalize(sensors.pulses);
            }
        }
        self.speed
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    fn normalize(&self, pulses: i32) -> f32 {
        let max = self.max_pulses as f32;
        let interval = (pulses.unsigned_abs() as f32).min(max);
        map_range(interval, 0.0, max, 1.0, 0.0)
    }
}
