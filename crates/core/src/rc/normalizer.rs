//! Control signal normalizer
//!
//! Turns the latest Channels/Calibration frames into normalized stick values
//! and the derived drive mode, recording flag and lane registers. Aux
//! channels are dispatched to their configured [`AuxFeature`]; edge-driven
//! features compare against the previous tick's aux value.
//!
//! # Tick Order
//!
//! 1. Apply the cached calibration frame
//! 2. Recompute channels from the cached Channels frame
//! 3. Dispatch aux features (fixed order, see [`ControlNormalizer::tick`])
//! 4. Post-process throttle/steering (fix, flanger, buckets, auto-record, brake)
//! 5. Remember mode and aux values for the next tick

use super::aux::{AuxBinding, AuxFeature, AuxSlot};
use super::calibration::CalibrationState;
use super::mapping::dual_map;
use super::mode::DriveMode;
use crate::drivetrain::{Lane, LaneRequest};
use crate::parameters::RcParams;
use crate::protocol::{ChannelsFrame, FrameSnapshot};
use crate::traits::{HatActuator, STEERING_PULSE_MAX, STEERING_PULSE_MIN, STEERING_PULSE_NEUTRAL};
use heapless::Vec;

/// Aux delta above which a slot counts as changed since the last tick
pub const AUX_CHANGE_THRESHOLD: f32 = 0.1;

/// Switch position thresholds on a normalized aux value
const SWITCH_HIGH: f32 = 0.5;
const SWITCH_LOW: f32 = -0.5;

/// Throttle above which auto-record starts recording
const AUTORECORD_THROTTLE: f32 = 0.05;

/// Previous aux value before the first tick
const AUX_INITIAL: f32 = -1.0;

/// Maximum events reported by one tick
pub const MAX_CONTROL_EVENTS: usize = 8;

/// Normalized receiver channels, each in [-1, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizedControl {
    pub throttle: f32,
    pub steering: f32,
    pub aux1: f32,
    pub aux2: f32,
}

impl NormalizedControl {
    pub fn aux(&self, slot: AuxSlot) -> f32 {
        match slot {
            AuxSlot::Aux1 => self.aux1,
            AuxSlot::Aux2 => self.aux2,
        }
    }
}

/// Notable state changes during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// Idle points learned or changed
    Calibrated {
        throttle_idle: i32,
        steering_idle: i32,
    },
    FixedThrottleChanged(f32),
    FixedSteeringChanged(f32),
    SteeringTrimChanged(u16),
    FixSteeringChanged(u16),
    LaneChanged(Lane),
    RequestedLaneChanged(Lane),
    /// Handing back to the user armed the brake for `cycles` ticks
    BrakeArmed { cycles: u32 },
}

/// Result of one normalizer tick
#[derive(Debug, Clone, PartialEq)]
pub struct ControlOutput {
    pub throttle: f32,
    pub steering: f32,
    pub mode: DriveMode,
    pub recording: bool,
    pub lane: LaneRequest,
    pub events: Vec<ControlEvent, MAX_CONTROL_EVENTS>,
}

/// Stateful control signal normalizer
///
/// Owns calibration, aux history, exploration registers and the brake
/// countdown. One instance per pipeline.
pub struct ControlNormalizer {
    params: RcParams,
    binding: AuxBinding,
    calibration: CalibrationState,
    control: NormalizedControl,
    last_aux: [f32; 2],
    last_mode: DriveMode,
    autorecord_latch: bool,
    fixed_throttle: f32,
    fixed_steering: f32,
    /// Present only while the matching output feature is bound
    steering_trim: Option<u16>,
    fix_steering: Option<u16>,
    brake_remaining: u32,
}

impl ControlNormalizer {
    pub fn new(params: RcParams, binding: AuxBinding) -> Self {
        let calibration = if params.auto_calibration {
            CalibrationState::auto()
        } else {
            CalibrationState::fixed()
        };
        let register = |feature| binding.is_bound(feature).then_some(STEERING_PULSE_NEUTRAL);

        Self {
            calibration,
            control: NormalizedControl::default(),
            last_aux: [AUX_INITIAL; 2],
            last_mode: DriveMode::User,
            autorecord_latch: false,
            fixed_throttle: 0.0,
            fixed_steering: 0.0,
            steering_trim: register(AuxFeature::OutputSteeringTrim),
            fix_steering: register(AuxFeature::OutputSteeringExploration),
            brake_remaining: 0,
            params,
            binding,
        }
    }

    pub fn calibration(&self) -> CalibrationState {
        self.calibration
    }

    /// Last normalized channel values
    pub fn control(&self) -> NormalizedControl {
        self.control
    }

    pub fn binding(&self) -> AuxBinding {
        self.binding
    }

    /// Run one tick over the latest cached frames
    ///
    /// Aux features are evaluated in this order: record/pilot, autorecord,
    /// record, pilot, throttle exploration, steering exploration, output
    /// trim, output steering exploration, lane annotation, drive on lane.
    /// Mode and recording are derived fresh each tick (user, not recording
    /// unless a feature says otherwise).
    pub fn tick(
        &mut self,
        frames: &FrameSnapshot,
        lane: &mut LaneRequest,
        actuator: &mut impl HatActuator,
    ) -> ControlOutput {
        let mut events = Vec::new();

        if let Some(frame) = frames.calibration {
            let before = self.calibration;
            self.calibration.apply(&frame);
            if before != self.calibration {
                push(
                    &mut events,
                    ControlEvent::Calibrated {
                        throttle_idle: frame.throttle_idle,
                        steering_idle: frame.steering_idle,
                    },
                );
            }
        }

        if let Some(frame) = frames.channels {
            self.update_channels(&frame);
        }

        let mut mode = DriveMode::User;
        let mut recording = false;
        let mut throttle = self.control.throttle;
        let mut steering = self.control.steering;
        let pilot_mode = self.params.pilot_mode;

        if let Some((value, _)) = self.aux_for(AuxFeature::RecordAndPilot) {
            if value < SWITCH_LOW {
                recording = true;
            } else if value > SWITCH_HIGH {
                mode = pilot_mode;
            }
        }

        // A non-high autorecord switch also cancels a record/pilot request.
        // The pilot feature is evaluated afterwards and is not affected.
        if let Some((value, _)) = self.aux_for(AuxFeature::AutoRecord) {
            if value > SWITCH_HIGH {
                self.autorecord_latch = true;
            } else {
                mode = DriveMode::User;
            }
        }

        if let Some((value, _)) = self.aux_for(AuxFeature::Record) {
            if value > SWITCH_HIGH {
                recording = true;
            }
        }

        if let Some((value, _)) = self.aux_for(AuxFeature::Pilot) {
            if value > SWITCH_HIGH {
                mode = pilot_mode;
            }
        }

        if let Some((value, changed)) = self.aux_for(AuxFeature::ThrottleExploration) {
            if changed {
                let increment = self.params.throttle_exploration_step;
                if let Some(next) = step(self.fixed_throttle, value, increment, 0.0, 1.0) {
                    self.fixed_throttle = next;
                    push(&mut events, ControlEvent::FixedThrottleChanged(next));
                }
            }
            throttle = self.fixed_throttle;
        }

        if let Some((value, changed)) = self.aux_for(AuxFeature::SteeringExploration) {
            if changed {
                let increment = self.params.steering_exploration_step;
                if let Some(next) = step(self.fixed_steering, value, increment, -1.0, 1.0) {
                    self.fixed_steering = next;
                    push(&mut events, ControlEvent::FixedSteeringChanged(next));
                }
            }
            steering = self.fixed_steering;
        }

        if let Some((value, true)) = self.aux_for(AuxFeature::OutputSteeringTrim) {
            let pulse = step_pulse(self.steering_trim, value, self.params.trim_step);
            self.steering_trim = Some(pulse);
            actuator.set_steering_trim(pulse);
            push(&mut events, ControlEvent::SteeringTrimChanged(pulse));
        }

        if let Some((value, true)) = self.aux_for(AuxFeature::OutputSteeringExploration) {
            let pulse = step_pulse(self.fix_steering, value, self.params.trim_step);
            self.fix_steering = Some(pulse);
            actuator.set_fix_steering(pulse);
            push(&mut events, ControlEvent::FixSteeringChanged(pulse));
        }

        if let Some((value, true)) = self.aux_for(AuxFeature::LaneAnnotation) {
            lane.current = Lane::from_aux(value);
            push(&mut events, ControlEvent::LaneChanged(lane.current));
        }

        if let Some((value, true)) = self.aux_for(AuxFeature::DriveOnLane) {
            lane.requested = Lane::from_aux(value);
            push(&mut events, ControlEvent::RequestedLaneChanged(lane.requested));
        }

        if let Some(fix) = self.params.steering_fix {
            steering = fix;
        }

        if mode.is_user() {
            if let Some((low, high)) = self.params.throttle_flanger {
                throttle = dual_map(throttle, -1.0, 0.0, 1.0, low, 0.0, high);
            }
            if !self.params.throttle_buckets.is_empty() {
                throttle = discretize(throttle, &self.params.throttle_buckets);
            }
        }

        if (self.params.autorecord_on_throttle || self.autorecord_latch)
            && throttle > AUTORECORD_THROTTLE
        {
            recording = true;
        }

        if let Some(brake) = self.params.brake_throttle {
            if mode.is_user() && !self.last_mode.is_user() {
                self.brake_remaining = self.params.brake_cycles;
                push(
                    &mut events,
                    ControlEvent::BrakeArmed {
                        cycles: self.params.brake_cycles,
                    },
                );
            }
            if self.brake_remaining > 0 {
                throttle = brake;
                self.brake_remaining -= 1;
            }
        }

        self.last_mode = mode;
        self.last_aux = [self.control.aux1, self.control.aux2];

        ControlOutput {
            throttle: throttle.clamp(-1.0, 1.0),
            steering: steering.clamp(-1.0, 1.0),
            mode,
            recording,
            lane: *lane,
            events,
        }
    }

    fn update_channels(&mut self, frame: &ChannelsFrame) {
        let params = &self.params;
        if params.auto_calibration {
            if let Some(idle) = self.calibration.throttle_idle {
                self.control.throttle = params.throttle_range.normalize_around(frame.throttle, idle);
            }
            if let Some(idle) = self.calibration.steering_idle {
                self.control.steering = params.steering_range.normalize_around(frame.steering, idle);
            }
        } else {
            self.control.throttle = params.throttle_range.normalize(frame.throttle);
            self.control.steering = params.steering_range.normalize(frame.steering);
        }
        self.control.aux1 = params.aux_range.normalize(frame.aux1);
        self.control.aux2 = params.aux_range.normalize(frame.aux2);
    }

    /// Current value of the slot bound to `feature` and whether it changed
    fn aux_for(&self, feature: AuxFeature) -> Option<(f32, bool)> {
        let slot = self.binding.slot_for(feature)?;
        let value = self.control.aux(slot);
        let last = match slot {
            AuxSlot::Aux1 => self.last_aux[0],
            AuxSlot::Aux2 => self.last_aux[1],
        };
        Some((value, libm::fabsf(last - value) > AUX_CHANGE_THRESHOLD))
    }
}

fn push(events: &mut Vec<ControlEvent, MAX_CONTROL_EVENTS>, event: ControlEvent) {
    let _ = events.push(event);
}

/// Step a register up on a high switch, down on a low one, within bounds
fn step(current: f32, switch: f32, increment: f32, min: f32, max: f32) -> Option<f32> {
    if switch > SWITCH_HIGH {
        Some((current + increment).min(max))
    } else if switch < SWITCH_LOW {
        Some((current - increment).max(min))
    } else {
        None
    }
}

/// Step a steering pulse register; a centered switch rewrites the same value
fn step_pulse(current: Option<u16>, switch: f32, increment: u16) -> u16 {
    let pulse = current.unwrap_or(STEERING_PULSE_NEUTRAL);
    if switch > SWITCH_HIGH {
        pulse.saturating_add(increment).min(STEERING_PULSE_MAX)
    } else if switch < SWITCH_LOW {
        pulse.saturating_sub(increment).max(STEERING_PULSE_MIN)
    } else {
        pulse
    }
}

/// Snap a throttle onto one of `buckets.len()` levels
///
/// Thresholds are `k / n` for `k = 0..=n`; the bucket index is the number
/// of thresholds at or below the throttle, clamped to `[1, n]`.
pub fn discretize(throttle: f32, buckets: &[f32]) -> f32 {
    let n = buckets.len();
    if n == 0 {
        return throttle;
    }
    let below = (0..=n).filter(|k| *k as f32 / n as f32 <= throttle).count();
    buckets[below.clamp(1, n) - 1]
}
