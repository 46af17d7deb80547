//! Pipeline configuration
//!
//! Bundles the typed parameter groups loaded from a [`ParameterStore`] and
//! resolves the aux channel feature names. Problems that only degrade
//! behavior (unknown feature names, two channels claiming one feature) are
//! logged once here rather than on every tick.

use crate::error::HatError;
use robocars_hat_core::parameters::{
    self, DrivetrainParams, OdomParams, ParameterStore, RcParams,
};
use robocars_hat_core::rc::{AuxBinding, AuxFeature, AuxSlot};

/// Validated configuration for one [`ControlPipeline`](crate::pipeline::ControlPipeline)
#[derive(Debug, Clone)]
pub struct HatConfig {
    pub rc: RcParams,
    pub drivetrain: DrivetrainParams,
    pub odometry: OdomParams,
    /// Aux features resolved from `rc`
    pub binding: AuxBinding,
}

impl HatConfig {
    /// Parameter store holding every group's defaults
    pub fn default_store() -> Result<ParameterStore, HatError> {
        let mut store = ParameterStore::new();
        parameters::register_all(&mut store)?;
        store.clear_dirty();
        Ok(store)
    }

    /// Load and validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`HatError::InvalidConfig`] naming the first group that
    /// fails validation.
    pub fn from_store(store: &ParameterStore) -> Result<Self, HatError> {
        let rc = RcParams::from_store(store);
        if !rc.is_valid() {
            return Err(HatError::InvalidConfig("rc input"));
        }

        let drivetrain = DrivetrainParams::from_store(store);
        if !drivetrain.is_valid() {
            return Err(HatError::InvalidConfig("drivetrain"));
        }

        let odometry = OdomParams::from_store(store);
        if !odometry.is_valid() {
            return Err(HatError::InvalidConfig("odometry"));
        }

        let binding = resolve_binding(&rc);
        let config = Self {
            rc,
            drivetrain,
            odometry,
            binding,
        };
        config.log_summary();
        Ok(config)
    }

    fn log_summary(&self) {
        crate::log_info!(
            "aux1: {}, aux2: {}, pilot mode: {}",
            self.binding.aux1.as_str(),
            self.binding.aux2.as_str(),
            self.rc.pilot_mode.as_str()
        );
        if self.rc.auto_calibration {
            crate::log_info!("waiting for receiver idle calibration");
        }
        if !self.rc.throttle_buckets.is_empty() {
            crate::log_info!("throttle buckets: {:?}", self.rc.throttle_buckets.as_slice());
        }
        if self.drivetrain.obstacle_avoidance {
            crate::log_info!(
                "obstacle avoidance on, lane steering {:?}",
                self.drivetrain.lane_steering.as_slice()
            );
        }
    }
}

impl Default for HatConfig {
    fn default() -> Self {
        Self {
            rc: RcParams::default(),
            drivetrain: DrivetrainParams::default(),
            odometry: OdomParams::default(),
            binding: AuxBinding::default(),
        }
    }
}

fn resolve_binding(rc: &RcParams) -> AuxBinding {
    let resolve = |slot: AuxSlot, name: &str| {
        rc.aux_feature(slot).unwrap_or_else(|_| {
            crate::log_warn!("unknown aux feature {:?} on {:?}, ignoring", name, slot);
            AuxFeature::None
        })
    };

    let binding = AuxBinding::new(
        resolve(AuxSlot::Aux1, rc.aux1_feature.as_str()),
        resolve(AuxSlot::Aux2, rc.aux2_feature.as_str()),
    );

    if binding.has_conflict() {
        crate::log_warn!(
            "aux1 and aux2 both bound to {}, aux2 is ignored",
            binding.aux1.as_str()
        );
    }

    binding
}

#[cfg(test)]
mod tests {
    use super::*;
    use robocars_hat_core::parameters::ParamValue;
    use robocars_hat_core::rc::DriveMode;

    #[test]
    fn test_default_store_loads() {
        let store = HatConfig::default_store().unwrap();
        assert!(!store.is_dirty());

        let config = HatConfig::from_store(&store).unwrap();
        assert_eq!(config.binding, AuxBinding::default());
        assert_eq!(config.rc.pilot_mode, DriveMode::Local);
        assert_eq!(config.drivetrain.acc_window, 10);
        assert_eq!(config.odometry.max_pulses, 20000);
    }

    #[test]
    fn test_unknown_feature_resolves_to_none() {
        let mut store = HatConfig::default_store().unwrap();
        store
            .set("RCIN_AUX1_FEAT", ParamValue::string("turbo").unwrap())
            .unwrap();
        store
            .set("RCIN_AUX2_FEAT", ParamValue::string("drive_on_lane").unwrap())
            .unwrap();

        let config = HatConfig::from_store(&store).unwrap();
        assert_eq!(config.binding.aux1, AuxFeature::None);
        assert_eq!(config.binding.aux2, AuxFeature::DriveOnLane);
    }

    #[test]
    fn test_conflicting_binding_kept() {
        let mut store = HatConfig::default_store().unwrap();
        for name in ["RCIN_AUX1_FEAT", "RCIN_AUX2_FEAT"] {
            store.set(name, ParamValue::string("pilot").unwrap()).unwrap();
        }
        let config = HatConfig::from_store(&store).unwrap();
        assert!(config.binding.has_conflict());
    }

    #[test]
    fn test_invalid_groups_rejected() {
        let mut store = HatConfig::default_store().unwrap();
        store
            .set("RCIN_PILOT_MODE", ParamValue::string("user").unwrap())
            .unwrap();
        assert!(matches!(
            HatConfig::from_store(&store),
            Err(HatError::InvalidConfig("rc input"))
        ));

        let mut store = HatConfig::default_store().unwrap();
        store.set("ACC_THRESH_LOW", ParamValue::Int(9)).unwrap();
        assert!(matches!(
            HatConfig::from_store(&store),
            Err(HatError::InvalidConfig("drivetrain"))
        ));

        let mut store = HatConfig::default_store().unwrap();
        store.set("ODOM_MAX", ParamValue::Int(0)).unwrap();
        assert!(matches!(
            HatConfig::from_store(&store),
            Err(HatError::InvalidConfig("odometry"))
        ));
    }
}
