//! Actuator sink abstraction
//!
//! The hat's output stage accepts steering trim and fixed steering pulse
//! widths. Writes are fire-and-forget: there is no acknowledgement and a lost
//! write is simply superseded by the next one.

use heapless::Vec;

/// Steering pulse lower bound (μs)
pub const STEERING_PULSE_MIN: u16 = 1000;

/// Steering pulse neutral (μs)
pub const STEERING_PULSE_NEUTRAL: u16 = 1500;

/// Steering pulse upper bound (μs)
pub const STEERING_PULSE_MAX: u16 = 2000;

/// Hat actuator command sink
pub trait HatActuator {
    /// Set the steering trim pulse (μs, 1000-2000)
    fn set_steering_trim(&mut self, pulse_us: u16);

    /// Force the steering output to a fixed pulse (μs, 1000-2000)
    fn set_fix_steering(&mut self, pulse_us: u16);
}

/// Actuator write recorded by [`MockActuator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorWrite {
    SteeringTrim(u16),
    FixSteering(u16),
}

/// Maximum writes kept by [`MockActuator`]
pub const MOCK_ACTUATOR_CAPACITY: usize = 32;

/// Recording actuator for host testing
///
/// Keeps the first [`MOCK_ACTUATOR_CAPACITY`] writes; later writes still
/// update the last-value fields.
#[derive(Debug, Default)]
pub struct MockActuator {
    writes: Vec<ActuatorWrite, MOCK_ACTUATOR_CAPACITY>,
    pub last_trim: Option<u16>,
    pub last_fix_steering: Option<u16>,
}

impl MockActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> &[ActuatorWrite] {
        &self.writes
    }
}

impl HatActuator for MockActuator {
    fn set_steering_trim(&mut self, pulse_us: u16) {
        let _ = self.writes.push(ActuatorWrite::SteeringTrim(pulse_us));
        self.last_trim = Some(pulse_us);
    }

    fn set_fix_steering(&mut self, pulse_us: u16) {
        let _ = self.writes.push(ActuatorWrite::FixSteering(pulse_us));
        self.last_fix_steering = Some(pulse_us);
    }
}
