//! Platform-agnostic trait abstractions
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing

pub mod actuator;

pub use actuator::{
    ActuatorWrite, HatActuator, MockActuator, MOCK_ACTUATOR_CAPACITY, STEERING_PULSE_MAX,
    STEERING_PULSE_MIN, STEERING_PULSE_NEUTRAL,
};
