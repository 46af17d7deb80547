//! RC input processing
//!
//! Pulse-width mapping, receiver idle calibration, aux channel feature
//! bindings and the stateful [`ControlNormalizer`] that combines them.

pub mod aux;
pub mod calibration;
pub mod mapping;
pub mod mode;
pub mod normalizer;

pub use aux::{AuxBinding, AuxFeature, AuxFeatureError, AuxSlot};
pub use calibration::{CalibrationState, FIXED_IDLE_US};
pub use mapping::{dual_map, map_range, PwmRange};
pub use mode::{DriveMode, DriveModeError};
pub use normalizer::{
    discretize, ControlEvent, ControlNormalizer, ControlOutput, NormalizedControl,
    AUX_CHANGE_THRESHOLD, MAX_CONTROL_EVENTS,
};
