//! Drivetrain parameter definitions
//!
//! # Parameters
//!
//! - `ACC_WINDOW` - Number of samples in the ACC vote window
//! - `ACC_THRESH_HIGH` - Window sum at or above which the vote is "accelerate"
//! - `ACC_THRESH_LOW` - Window sum at or below which the vote is "decelerate"
//! - `ACC_THR_ENABLE` - Let ACC votes change the throttle regime
//! - `ACC_THR_REGULAR` / `ACC_THR_FULL` / `ACC_THR_BRAKE` - Fixed throttles
//! - `ACC_BRAKE_CYC` - Ticks spent braking before returning to regular speed
//! - `LANE_STEER_ADJ` - Steering magnitude per lane offset (index 0 = same lane)
//! - `LANE_OBSTACLE` - Enable obstacle avoidance lane requests

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore, MAX_LIST_LEN};
use crate::drivetrain::ACC_WINDOW_MAX;
use heapless::Vec;

const DEFAULT_WINDOW: i32 = 10;
const DEFAULT_THRESH_HIGH: i32 = 8;
const DEFAULT_THRESH_LOW: i32 = 2;
const DEFAULT_REGULAR_THROTTLE: f32 = 0.3;
const DEFAULT_FULL_THROTTLE: f32 = 0.5;
const DEFAULT_BRAKE_THROTTLE: f32 = -0.2;
const DEFAULT_BRAKE_CYCLES: i32 = 3;
const MAX_BRAKE_CYCLES: i32 = 1000;
const DEFAULT_LANE_TABLE: [f32; 3] = [0.0, 0.2, 0.4];

/// Drivetrain parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct DrivetrainParams {
    pub acc_window: usize,
    pub acc_threshold_high: i32,
    pub acc_threshold_low: i32,
    /// When false, every regime drives at the regular throttle
    pub throttle_on_acc: bool,
    pub regular_throttle: f32,
    pub full_throttle: f32,
    pub brake_throttle: f32,
    pub brake_cycles: u32,
    pub lane_steering: Vec<f32, MAX_LIST_LEN>,
    pub obstacle_avoidance: bool,
}

impl Default for DrivetrainParams {
    fn default() -> Self {
        let mut lane_steering = Vec::new();
        for step in DEFAULT_LANE_TABLE {
            let _ = lane_steering.push(step);
        }
        Self {
            acc_window: DEFAULT_WINDOW as usize,
            acc_threshold_high: DEFAULT_THRESH_HIGH,
            acc_threshold_low: DEFAULT_THRESH_LOW,
            throttle_on_acc: true,
            regular_throttle: DEFAULT_REGULAR_THROTTLE,
            full_throttle: DEFAULT_FULL_THROTTLE,
            brake_throttle: DEFAULT_BRAKE_THROTTLE,
            brake_cycles: DEFAULT_BRAKE_CYCLES as u32,
            lane_steering,
            obstacle_avoidance: false,
        }
    }
}

impl DrivetrainParams {
    /// Register drivetrain parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let none = ParamFlags::empty();
        store.register("ACC_WINDOW", ParamValue::Int(DEFAULT_WINDOW), none)?;
        store.register("ACC_THRESH_HIGH", ParamValue::Int(DEFAULT_THRESH_HIGH), none)?;
        store.register("ACC_THRESH_LOW", ParamValue::Int(DEFAULT_THRESH_LOW), none)?;
        store.register("ACC_THR_ENABLE", ParamValue::Bool(true), none)?;
        store.register(
            "ACC_THR_REGULAR",
            ParamValue::Float(DEFAULT_REGULAR_THROTTLE),
            none,
        )?;
        store.register("ACC_THR_FULL", ParamValue::Float(DEFAULT_FULL_THROTTLE), none)?;
        store.register("ACC_THR_BRAKE", ParamValue::Float(DEFAULT_BRAKE_THROTTLE), none)?;
        store.register("ACC_BRAKE_CYC", ParamValue::Int(DEFAULT_BRAKE_CYCLES), none)?;
        store.register("LANE_STEER_ADJ", ParamValue::list(&DEFAULT_LANE_TABLE)?, none)?;
        store.register("LANE_OBSTACLE", ParamValue::Bool(false), none)?;
        Ok(())
    }

    /// Load drivetrain parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        let d = Self::default();
        let throttle = |name: &str, default: f32| {
            store.float(name).unwrap_or(default).clamp(-1.0, 1.0)
        };

        let lane_steering = match store.list("LANE_STEER_ADJ") {
            Some(table) if !table.is_empty() => {
                Vec::from_slice(table).unwrap_or_else(|_| d.lane_steering.clone())
            }
            _ => d.lane_steering.clone(),
        };

        Self {
            acc_window: store
                .int("ACC_WINDOW")
                .unwrap_or(DEFAULT_WINDOW)
                .clamp(1, ACC_WINDOW_MAX as i32) as usize,
            acc_threshold_high: store.int("ACC_THRESH_HIGH").unwrap_or(DEFAULT_THRESH_HIGH),
            acc_threshold_low: store.int("ACC_THRESH_LOW").unwrap_or(DEFAULT_THRESH_LOW),
            throttle_on_acc: store.flag("ACC_THR_ENABLE").unwrap_or(d.throttle_on_acc),
            regular_throttle: throttle("ACC_THR_REGULAR", DEFAULT_REGULAR_THROTTLE),
            full_throttle: throttle("ACC_THR_FULL", DEFAULT_FULL_THROTTLE),
            brake_throttle: throttle("ACC_THR_BRAKE", DEFAULT_BRAKE_THROTTLE),
            brake_cycles: store
                .int("ACC_BRAKE_CYC")
                .unwrap_or(DEFAULT_BRAKE_CYCLES)
                .clamp(0, MAX_BRAKE_CYCLES) as u32,
            lane_steering,
            obstacle_avoidance: store.flag("LANE_OBSTACLE").unwrap_or(d.obstacle_avoidance),
        }
    }

    /// Validate drivetrain parameters
    ///
    /// The high threshold must sit above the low one (hysteresis band), the
    /// lane table must start at zero and never decrease.
    pub fn is_valid(&self) -> bool {
        if self.acc_window == 0 || self.acc_window > ACC_WINDOW_MAX {
            return false;
        }

        if self.acc_threshold_high <= self.acc_threshold_low {
            return false;
        }

        match self.lane_steering.first() {
            Some(first) if *first == 0.0 => {}
            _ => return false,
        }

        if self
            .lane_steering
            .windows(2)
            .any(|pair| pair[1] < pair[0] || pair[1] > 1.0)
        {
            return false;
        }

        true
    }
}
