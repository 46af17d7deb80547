//! Odometry parameter definitions
//!
//! # Parameters
//!
//! - `ODOM_MAX` - Pulse count at (or above) which speed reads as zero

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

const DEFAULT_MAX_PULSES: i32 = 20000;

/// Odometry parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OdomParams {
    /// Pulse interval mapped to speed 0.0
    pub max_pulses: i32,
}

impl Default for OdomParams {
    fn default() -> Self {
        Self {
            max_pulses: DEFAULT_MAX_PULSES,
        }
    }
}

impl OdomParams {
    /// Register odometry parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "ODOM_MAX",
            ParamValue::Int(DEFAULT_MAX_PULSES),
            ParamFlags::empty(),
        )
    }

    /// Load odometry parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            max_pulses: store.int("ODOM_MAX").unwrap_or(DEFAULT_MAX_PULSES),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.max_pulses > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odom_params_defaults() {
        let mut store = ParameterStore::new();
        OdomParams::register_defaults(&mut store).unwrap();
        let params = OdomParams::from_store(&store);
        assert_eq!(params.max_pulses, 20000);
        assert!(params.is_valid());
    }

    #[test]
    fn test_odom_params_validation() {
        let params = OdomParams { max_pulses: 0 };
        assert!(!params.is_valid());
    }
}
