//! RC input parameter definitions
//!
//! Receiver pulse ranges, calibration mode, aux channel features and the
//! stick-shaping options applied by the control signal normalizer.
//!
//! # Parameters
//!
//! - `RCIN_THR_MIN` / `RCIN_THR_MAX` - Throttle pulse range (μs)
//! - `RCIN_STR_MIN` / `RCIN_STR_MAX` - Steering pulse range (μs)
//! - `RCIN_AUX_MIN` / `RCIN_AUX_MAX` - Aux channel pulse range (μs)
//! - `RCIN_AUTOCAL` - Learn idle pulses from calibration frames
//! - `RCIN_PILOT_MODE` - Mode label selected by pilot switches
//! - `RCIN_AUX1_FEAT` / `RCIN_AUX2_FEAT` - Aux channel feature names
//! - `RCIN_THR_DISC` - Throttle buckets (empty = no discretization)
//! - `RCIN_THR_FLANGE` - Throttle remap `[low, high]` (empty = off)
//! - `RCIN_THR_EXP_INC` / `RCIN_STR_EXP_INC` - Exploration steps
//! - `RCIN_TRIM_INC` - Output steering trim step (μs)
//! - `RCIN_STR_FIX_EN` / `RCIN_STR_FIX` - Fixed steering override
//! - `RCIN_BRK_EN` / `RCIN_BRK_THR` / `RCIN_BRK_CYC` - Brake when handing back to user
//! - `RCIN_AREC_THR` - Record whenever throttle is applied

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore, MAX_LIST_LEN, MAX_STRING_LEN};
use crate::rc::{AuxFeature, AuxFeatureError, AuxSlot, DriveMode, PwmRange};
use heapless::{String, Vec};

const DEFAULT_PWM_MIN: i32 = 1000;
const DEFAULT_PWM_MAX: i32 = 2000;
const DEFAULT_PILOT_MODE: DriveMode = DriveMode::Local;
const DEFAULT_EXPLORATION_STEP: f32 = 0.01;
const DEFAULT_TRIM_STEP: i32 = 10;
const MAX_TRIM_STEP: i32 = 500;
const DEFAULT_BRAKE_THROTTLE: f32 = -0.2;
const DEFAULT_BRAKE_CYCLES: i32 = 10;
const MAX_BRAKE_CYCLES: i32 = 1000;

/// RC input parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct RcParams {
    pub throttle_range: PwmRange,
    pub steering_range: PwmRange,
    pub aux_range: PwmRange,
    pub auto_calibration: bool,
    /// Mode entered when a pilot switch is high
    pub pilot_mode: DriveMode,
    pub aux1_feature: String<MAX_STRING_LEN>,
    pub aux2_feature: String<MAX_STRING_LEN>,
    /// Throttle buckets, empty when discretization is off
    pub throttle_buckets: Vec<f32, MAX_LIST_LEN>,
    /// `(low, high)` outputs for full reverse / full forward stick
    pub throttle_flanger: Option<(f32, f32)>,
    pub throttle_exploration_step: f32,
    pub steering_exploration_step: f32,
    pub trim_step: u16,
    pub steering_fix: Option<f32>,
    /// Brake throttle applied after handing control back to the user
    pub brake_throttle: Option<f32>,
    pub brake_cycles: u32,
    pub autorecord_on_throttle: bool,
}

impl Default for RcParams {
    fn default() -> Self {
        Self {
            throttle_range: PwmRange::new(DEFAULT_PWM_MIN, DEFAULT_PWM_MAX),
            steering_range: PwmRange::new(DEFAULT_PWM_MIN, DEFAULT_PWM_MAX),
            aux_range: PwmRange::new(DEFAULT_PWM_MIN, DEFAULT_PWM_MAX),
            auto_calibration: true,
            pilot_mode: DEFAULT_PILOT_MODE,
            aux1_feature: String::new(),
            aux2_feature: String::new(),
            throttle_buckets: Vec::new(),
            throttle_flanger: None,
            throttle_exploration_step: DEFAULT_EXPLORATION_STEP,
            steering_exploration_step: DEFAULT_EXPLORATION_STEP,
            trim_step: DEFAULT_TRIM_STEP as u16,
            steering_fix: None,
            brake_throttle: None,
            brake_cycles: DEFAULT_BRAKE_CYCLES as u32,
            autorecord_on_throttle: false,
        }
    }
}

impl RcParams {
    /// Register RC input parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let none = ParamFlags::empty();
        store.register("RCIN_THR_MIN", ParamValue::Int(DEFAULT_PWM_MIN), none)?;
        store.register("RCIN_THR_MAX", ParamValue::Int(DEFAULT_PWM_MAX), none)?;
        store.register("RCIN_STR_MIN", ParamValue::Int(DEFAULT_PWM_MIN), none)?;
        store.register("RCIN_STR_MAX", ParamValue::Int(DEFAULT_PWM_MAX), none)?;
        store.register("RCIN_AUX_MIN", ParamValue::Int(DEFAULT_PWM_MIN), none)?;
        store.register("RCIN_AUX_MAX", ParamValue::Int(DEFAULT_PWM_MAX), none)?;
        store.register("RCIN_AUTOCAL", ParamValue::Bool(true), none)?;
        store.register(
            "RCIN_PILOT_MODE",
            ParamValue::string(DEFAULT_PILOT_MODE.as_str())?,
            none,
        )?;
        store.register("RCIN_AUX1_FEAT", ParamValue::string("none")?, none)?;
        store.register("RCIN_AUX2_FEAT", ParamValue::string("none")?, none)?;
        store.register("RCIN_THR_DISC", ParamValue::list(&[])?, none)?;
        store.register("RCIN_THR_FLANGE", ParamValue::list(&[])?, none)?;
        store.register(
            "RCIN_THR_EXP_INC",
            ParamValue::Float(DEFAULT_EXPLORATION_STEP),
            none,
        )?;
        store.register(
            "RCIN_STR_EXP_INC",
            ParamValue::Float(DEFAULT_EXPLORATION_STEP),
            none,
        )?;
        store.register("RCIN_TRIM_INC", ParamValue::Int(DEFAULT_TRIM_STEP), none)?;
        store.register("RCIN_STR_FIX_EN", ParamValue::Bool(false), none)?;
        store.register("RCIN_STR_FIX", ParamValue::Float(0.0), none)?;
        store.register("RCIN_BRK_EN", ParamValue::Bool(false), none)?;
        store.register(
            "RCIN_BRK_THR",
            ParamValue::Float(DEFAULT_BRAKE_THROTTLE),
            none,
        )?;
        store.register("RCIN_BRK_CYC", ParamValue::Int(DEFAULT_BRAKE_CYCLES), none)?;
        store.register("RCIN_AREC_THR", ParamValue::Bool(false), none)?;
        Ok(())
    }

    /// Load RC input parameters from parameter store
    ///
    /// Missing or mistyped entries fall back to defaults; numeric values are
    /// clamped to their legal range.
    pub fn from_store(store: &ParameterStore) -> Self {
        let d = Self::default();

        let range = |min: &str, max: &str, default: PwmRange| {
            PwmRange::new(
                store.int(min).unwrap_or(default.min),
                store.int(max).unwrap_or(default.max),
            )
        };

        let pilot_mode = store
            .string("RCIN_PILOT_MODE")
            .and_then(|label| label.parse().ok())
            .unwrap_or(DEFAULT_PILOT_MODE);

        let feature = |name: &str| {
            store
                .string(name)
                .and_then(|s| String::try_from(s).ok())
                .unwrap_or_default()
        };

        let throttle_buckets = store
            .list("RCIN_THR_DISC")
            .and_then(|l| Vec::from_slice(l).ok())
            .unwrap_or_default();

        let throttle_flanger = match store.list("RCIN_THR_FLANGE") {
            Some([low, high]) => Some((low.clamp(-1.0, 1.0), high.clamp(-1.0, 1.0))),
            _ => None,
        };

        let steering_fix = if store.flag("RCIN_STR_FIX_EN").unwrap_or(false) {
            Some(store.float("RCIN_STR_FIX").unwrap_or(0.0).clamp(-1.0, 1.0))
        } else {
            None
        };

        let brake_throttle = if store.flag("RCIN_BRK_EN").unwrap_or(false) {
            Some(
                store
                    .float("RCIN_BRK_THR")
                    .unwrap_or(DEFAULT_BRAKE_THROTTLE)
                    .clamp(-1.0, 1.0),
            )
        } else {
            None
        };

        Self {
            throttle_range: range("RCIN_THR_MIN", "RCIN_THR_MAX", d.throttle_range),
            steering_range: range("RCIN_STR_MIN", "RCIN_STR_MAX", d.steering_range),
            aux_range: range("RCIN_AUX_MIN", "RCIN_AUX_MAX", d.aux_range),
            auto_calibration: store.flag("RCIN_AUTOCAL").unwrap_or(d.auto_calibration),
            pilot_mode,
            aux1_feature: feature("RCIN_AUX1_FEAT"),
            aux2_feature: feature("RCIN_AUX2_FEAT"),
            throttle_buckets,
            throttle_flanger,
            throttle_exploration_step: store
                .float("RCIN_THR_EXP_INC")
                .unwrap_or(DEFAULT_EXPLORATION_STEP)
                .clamp(0.0, 1.0),
            steering_exploration_step: store
                .float("RCIN_STR_EXP_INC")
                .unwrap_or(DEFAULT_EXPLORATION_STEP)
                .clamp(0.0, 1.0),
            trim_step: store
                .int("RCIN_TRIM_INC")
                .unwrap_or(DEFAULT_TRIM_STEP)
                .clamp(0, MAX_TRIM_STEP) as u16,
            steering_fix,
            brake_throttle,
            brake_cycles: store
                .int("RCIN_BRK_CYC")
                .unwrap_or(DEFAULT_BRAKE_CYCLES)
                .clamp(0, MAX_BRAKE_CYCLES) as u32,
            autorecord_on_throttle: store
                .flag("RCIN_AREC_THR")
                .unwrap_or(d.autorecord_on_throttle),
        }
    }

    /// Feature configured for an aux slot
    pub fn aux_feature(&self, slot: AuxSlot) -> Result<AuxFeature, AuxFeatureError> {
        match slot {
            AuxSlot::Aux1 => self.aux1_feature.parse(),
            AuxSlot::Aux2 => self.aux2_feature.parse(),
        }
    }

    /// Validate RC input parameters
    pub fn is_valid(&self) -> bool {
        for range in [self.throttle_range, self.steering_range, self.aux_range] {
            if range.min >= range.max {
                return false;
            }
        }

        if self.pilot_mode.is_user() {
            return false;
        }

        if self
            .throttle_buckets
            .iter()
            .any(|b| !(-1.0..=1.0).contains(b))
        {
            return false;
        }

        if self.throttle_exploration_step <= 0.0 || self.steering_exploration_step <= 0.0 {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_defaults() -> ParameterStore {
        let mut store = ParameterStore::new();
        RcParams::register_defaults(&mut store).unwrap();
        store
    }

    #[test]
    fn test_rc_params_defaults() {
        let params = RcParams::from_store(&store_with_defaults());

        assert_eq!(params.throttle_range, PwmRange::new(1000, 2000));
        assert!(params.auto_calibration);
        assert_eq!(params.pilot_mode, DriveMode::Local);
        assert_eq!(params.aux_feature(AuxSlot::Aux1), Ok(AuxFeature::None));
        assert!(params.throttle_buckets.is_empty());
        assert!(params.throttle_flanger.is_none());
        assert!(params.steering_fix.is_none());
        assert!(params.brake_throttle.is_none());
        assert_eq!(params.brake_cycles, 10);
        assert!(params.is_valid());
    }

    #[test]
    fn test_rc_params_custom() {
        let mut store = store_with_defaults();
        store
            .set("RCIN_PILOT_MODE", ParamValue::string("local_angle").unwrap())
            .unwrap();
        store
            .set("RCIN_AUX1_FEAT", ParamValue::string("record/pilot").unwrap())
            .unwrap();
        store
            .set("RCIN_AUX2_FEAT", ParamValue::string("warp").unwrap())
            .unwrap();
        store
            .set("RCIN_THR_FLANGE", ParamValue::list(&[-0.5, 0.6]).unwrap())
            .unwrap();
        store
            .set("RCIN_THR_DISC", ParamValue::list(&[0.1, 0.3, 0.5]).unwrap())
            .unwrap();
        store.set("RCIN_BRK_EN", ParamValue::Bool(true)).unwrap();
        store.set("RCIN_BRK_CYC", ParamValue::Int(4)).unwrap();

        let params = RcParams::from_store(&store);
        assert_eq!(params.pilot_mode, DriveMode::LocalAngle);
        assert_eq!(params.aux_feature(AuxSlot::Aux1), Ok(AuxFeature::RecordAndPilot));
        assert_eq!(params.aux_feature(AuxSlot::Aux2), Err(AuxFeatureError));
        assert_eq!(params.throttle_flanger, Some((-0.5, 0.6)));
        assert_eq!(params.throttle_buckets.as_slice(), &[0.1, 0.3, 0.5]);
        assert_eq!(params.brake_throttle, Some(-0.2));
        assert_eq!(params.brake_cycles, 4);
    }

    #[test]
    fn test_rc_params_flanger_needs_two_values() {
        let mut store = store_with_defaults();
        store
            .set("RCIN_THR_FLANGE", ParamValue::list(&[0.5]).unwrap())
            .unwrap();
        assert!(RcParams::from_store(&store).throttle_flanger.is_none());
    }

    #[test]
    fn test_rc_params_clamping() {
        let mut store = store_with_defaults();
        store.set("RCIN_TRIM_INC", ParamValue::Int(-5)).unwrap();
        store.set("RCIN_STR_FIX_EN", ParamValue::Bool(true)).unwrap();
        store.set("RCIN_STR_FIX", ParamValue::Float(3.0)).unwrap();

        let params = RcParams::from_store(&store);
        assert_eq!(params.trim_step, 0);
        assert_eq!(params.steering_fix, Some(1.0));
    }

    #[test]
    fn test_rc_params_validation() {
        let mut params = RcParams::default();
        assert!(params.is_valid());

        params.throttle_range = PwmRange::new(2000, 1000);
        assert!(!params.is_valid());

        let mut params = RcParams::default();
        params.pilot_mode = DriveMode::User;
        assert!(!params.is_valid());

        let mut params = RcParams::default();
        params.throttle_buckets = Vec::from_slice(&[0.5, 2.0]).unwrap();
        assert!(!params.is_valid());
    }
}
