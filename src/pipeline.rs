//! Control pipeline
//!
//! One [`ControlPipeline`] owns all per-session control state: calibration,
//! aux history, exploration registers, the drivetrain state machine, the
//! ACC window and the lane registers. The control task calls
//! [`ControlPipeline::tick`] once per period with the latest frame snapshot.
//!
//! ```text
//! FrameSnapshot ─┬─▶ ControlNormalizer ──┐
//!                │          ▲ lane       ├─▶ Drivetrain ──▶ VehicleCommand
//!                │          ▼            │       ▲ lane
//!                │     LaneRequest ◀─────┼───────┘
//!                └─▶ OdometryNormalizer ─┴────────────────▶ speed
//! ```

use crate::config::HatConfig;
use robocars_hat_core::drivetrain::{
    DriveEvent, DriveInput, DriveState, Drivetrain, LaneRequest, ObstacleIndicators,
};
use robocars_hat_core::odometry::OdometryNormalizer;
use robocars_hat_core::protocol::FrameSnapshot;
use robocars_hat_core::rc::{ControlEvent, ControlNormalizer, DriveMode};
use robocars_hat_core::traits::HatActuator;

/// Final drive command published to downstream consumers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleCommand {
    pub throttle: f32,
    pub steering: f32,
    pub mode: DriveMode,
    pub recording: bool,
    pub lane: LaneRequest,
    pub state: DriveState,
}

impl Default for VehicleCommand {
    fn default() -> Self {
        Self {
            throttle: 0.0,
            steering: 0.0,
            mode: DriveMode::User,
            recording: false,
            lane: LaneRequest::default(),
            state: DriveState::Stopped,
        }
    }
}

/// Latest outputs of the perception stack
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerceptionInput {
    /// ACC sample; consumed once per publication
    pub acc: Option<i32>,
    pub obstacles: ObstacleIndicators,
    /// Autopilot steering, used instead of the stick outside user mode
    pub pilot_steering: Option<f32>,
}

/// Result of one pipeline tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOutput {
    pub command: VehicleCommand,
    pub speed: f32,
}

/// Normalizers and drivetrain wired together
pub struct ControlPipeline {
    normalizer: ControlNormalizer,
    odometry: OdometryNormalizer,
    drivetrain: Drivetrain,
    lane: LaneRequest,
}

impl ControlPipeline {
    pub fn new(config: &HatConfig) -> Self {
        Self {
            normalizer: ControlNormalizer::new(config.rc.clone(), config.binding),
            odometry: OdometryNormalizer::new(&config.odometry),
            drivetrain: Drivetrain::new(config.drivetrain.clone()),
            lane: LaneRequest::default(),
        }
    }

    pub fn lane(&self) -> LaneRequest {
        self.lane
    }

    pub fn normalizer(&self) -> &ControlNormalizer {
        &self.normalizer
    }

    pub fn drivetrain(&self) -> &Drivetrain {
        &self.drivetrain
    }

    /// Run one control tick
    ///
    /// The normalizer runs first (it may rewrite the lane registers from the
    /// aux switches), then the drivetrain (obstacle avoidance may overwrite
    /// the requested lane again). Never fails.
    pub fn tick(
        &mut self,
        frames: &FrameSnapshot,
        perception: &PerceptionInput,
        actuator: &mut impl HatActuator,
    ) -> PipelineOutput {
        let control = self.normalizer.tick(frames, &mut self.lane, actuator);
        for event in &control.events {
            log_control_event(event);
        }

        let speed = self.odometry.tick(frames);

        let steering = match perception.pilot_steering {
            Some(pilot) if !control.mode.is_user() => pilot,
            _ => control.steering,
        };

        let drive = self.drivetrain.tick(
            DriveInput {
                throttle: control.throttle,
                steering,
                mode: control.mode,
                acc: perception.acc,
                obstacles: perception.obstacles,
            },
            &mut self.lane,
        );
        for event in &drive.events {
            log_drive_event(event);
        }

        PipelineOutput {
            command: VehicleCommand {
                throttle: drive.throttle,
                steering: drive.steering,
                mode: control.mode,
                recording: control.recording,
                lane: self.lane,
                state: drive.state,
            },
            speed,
        }
    }
}

fn log_control_event(event: &ControlEvent) {
    match event {
        ControlEvent::Calibrated {
            throttle_idle,
            steering_idle,
        } => crate::log_info!(
            "receiver idle calibrated: throttle {} us, steering {} us",
            throttle_idle,
            steering_idle
        ),
        ControlEvent::FixedThrottleChanged(v) => {
            crate::log_info!("fixed throttle set to {:.3}", v)
        }
        ControlEvent::FixedSteeringChanged(v) => {
            crate::log_info!("fixed steering set to {:.3}", v)
        }
        ControlEvent::SteeringTrimChanged(us) => {
            crate::log_info!("output steering trim set to {} us", us)
        }
        ControlEvent::FixSteeringChanged(us) => {
            crate::log_info!("fixed output steering set to {} us", us)
        }
        ControlEvent::LaneChanged(lane) => crate::log_info!("lane set to {}", lane.as_str()),
        ControlEvent::RequestedLaneChanged(lane) => {
            crate::log_info!("requested lane set to {}", lane.as_str())
        }
        ControlEvent::BrakeArmed { cycles } => {
            crate::log_debug!("back to user mode, braking for {} ticks", cycles)
        }
    }
}

fn log_drive_event(event: &DriveEvent) {
    match event {
        DriveEvent::StateChanged { from, to, trigger } => crate::log_info!(
            "drivetrain {} -> {} on {:?}",
            from.as_str(),
            to.as_str(),
            trigger
        ),
        DriveEvent::LaneRequested { from, to } => crate::log_info!(
            "obstacle avoidance: lane {} -> {}",
            from.as_str(),
            to.as_str()
        ),
    }
}
