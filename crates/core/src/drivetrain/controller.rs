//! Drivetrain controller
//!
//! Runs the state machine once per control tick. Phases are evaluated in a
//! fixed order so that transitions cascade within a single tick:
//!
//! 1. Stopped and a non-user mode: Drive
//! 2. Driving: push the ACC sample, output the regime's fixed throttle, and
//!    Stop if the mode is back to user
//! 3. RegularSpeed and an accelerate vote: Accelerate
//! 4. FullSpeed and a decelerate vote: Brake
//! 5. Braking: count down, Drive when exhausted
//! 6. Lane avoidance and steering correction
//!
//! The throttle is latched in phase 2, so a regime change made later in the
//! tick (including Stop) shows up in the output one tick later.

use super::acc::{AccFilter, AccVote};
use super::lane::{avoid_obstacles, correct_steering, Lane, LaneRequest, ObstacleIndicators};
use super::state::{transition, DriveState, DriveTrigger, DrivingState, EntryAction};
use crate::parameters::DrivetrainParams;
use crate::rc::DriveMode;
use heapless::Vec;

/// Maximum events reported by one tick
pub const MAX_DRIVE_EVENTS: usize = 8;

/// Inputs for one drivetrain tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveInput {
    pub throttle: f32,
    pub steering: f32,
    pub mode: DriveMode,
    /// ACC sample for this tick, if perception produced one
    pub acc: Option<i32>,
    pub obstacles: ObstacleIndicators,
}

/// Notable drivetrain changes during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveEvent {
    StateChanged {
        from: DriveState,
        to: DriveState,
        trigger: DriveTrigger,
    },
    /// Obstacle avoidance changed the requested lane
    LaneRequested { from: Lane, to: Lane },
}

/// Result of one drivetrain tick
#[derive(Debug, Clone, PartialEq)]
pub struct DriveOutput {
    pub throttle: f32,
    pub steering: f32,
    pub state: DriveState,
    pub events: Vec<DriveEvent, MAX_DRIVE_EVENTS>,
}

/// Hierarchical drivetrain state machine with ACC voting and lane keeping
pub struct Drivetrain {
    params: DrivetrainParams,
    state: DriveState,
    acc: AccFilter,
    fixed_throttle: f32,
    brake_remaining: u32,
}

impl Drivetrain {
    pub fn new(params: DrivetrainParams) -> Self {
        Self {
            acc: AccFilter::new(
                params.acc_window,
                params.acc_threshold_high,
                params.acc_threshold_low,
            ),
            state: DriveState::Stopped,
            fixed_throttle: 0.0,
            brake_remaining: 0,
            params,
        }
    }

    pub fn state(&self) -> DriveState {
        self.state
    }

    pub fn acc(&self) -> &AccFilter {
        &self.acc
    }

    /// Throttle of the current driving regime
    pub fn fixed_throttle(&self) -> f32 {
        self.fixed_throttle
    }

    pub fn tick(&mut self, input: DriveInput, lane: &mut LaneRequest) -> DriveOutput {
        let mut events = Vec::new();
        let mut throttle = input.throttle;

        if self.state == DriveState::Stopped && !input.mode.is_user() {
            self.fire(DriveTrigger::Drive, &mut events);
        }

        if self.state.is_driving() {
            if let Some(sample) = input.acc {
                self.acc.push(sample);
            }
            throttle = self.fixed_throttle;
            if input.mode.is_user() {
                self.fire(DriveTrigger::Stop, &mut events);
            }
        }

        let vote = self.acc.vote();

        if self.state == DriveState::Driving(DrivingState::RegularSpeed)
            && vote == Some(AccVote::Accelerate)
        {
            self.fire(DriveTrigger::Accelerate, &mut events);
        }

        if self.state == DriveState::Driving(DrivingState::FullSpeed)
            && vote == Some(AccVote::Decelerate)
        {
            self.fire(DriveTrigger::Brake, &mut events);
        }

        if self.state == DriveState::Driving(DrivingState::Braking) {
            if self.brake_remaining == 0 {
                self.fire(DriveTrigger::Drive, &mut events);
            } else {
                self.brake_remaining -= 1;
            }
        }

        let mut steering = input.steering;
        if self.params.obstacle_avoidance {
            let requested = avoid_obstacles(lane.requested, input.obstacles);
            if requested != lane.requested {
                let _ = events.push(DriveEvent::LaneRequested {
                    from: lane.requested,
                    to: requested,
                });
                lane.requested = requested;
            }
            steering = correct_steering(steering, lane, &self.params.lane_steering);
        }

        DriveOutput {
            throttle: throttle.clamp(-1.0, 1.0),
            steering: steering.clamp(-1.0, 1.0),
            state: self.state,
            events,
        }
    }

    fn fire(&mut self, trigger: DriveTrigger, events: &mut Vec<DriveEvent, MAX_DRIVE_EVENTS>) {
        let Some(edge) = transition(self.state, trigger, &self.params) else {
            return;
        };

        match edge.action {
            EntryAction::None => {}
            EntryAction::SetThrottle(throttle) => self.fixed_throttle = throttle,
            EntryAction::SetThrottleAndBrake { throttle, cycles } => {
                self.fixed_throttle = throttle;
                self.brake_remaining = cycles;
            }
        }

        let _ = events.push(DriveEvent::StateChanged {
            from: self.state,
            to: edge.to,
            trigger,
        });
        self.state = edge.to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGULAR: DriveState = DriveState::Driving(DrivingState::RegularSpeed);
    const FULL: DriveState = DriveState::Driving(DrivingState::FullSpeed);
    const BRAKING: DriveState = DriveState::Driving(DrivingState::Braking);

    fn input(mode: DriveMode, acc: Option<i32>) -> DriveInput {
        DriveInput {
            throttle: 0.1,
            steering: 0.0,
            mode,
            acc,
            obstacles: ObstacleIndicators::default(),
        }
    }

    fn tick(drivetrain: &mut Drivetrain, mode: DriveMode, acc: Option<i32>) -> DriveOutput {
        let mut lane = LaneRequest::default();
        drivetrain.tick(input(mode, acc), &mut lane)
    }

    /// Drive up to full speed with a window of clear-road votes
    fn at_full_speed() -> Drivetrain {
        let mut drivetrain = Drivetrain::new(DrivetrainParams::default());
        for _ in 0..8 {
            tick(&mut drivetrain, DriveMode::Local, Some(1));
        }
        assert_eq!(drivetrain.state(), FULL);
        drivetrain
    }

    #[test]
    fn test_user_mode_passes_through() {
        let mut drivetrain = Drivetrain::new(DrivetrainParams::default());
        let out = tick(&mut drivetrain, DriveMode::User, Some(1));
        assert_eq!(out.state, DriveState::Stopped);
        assert_eq!(out.throttle, 0.1);
        // Samples are ignored while stopped
        assert!(drivetrain.acc().is_empty());
    }

    #[test]
    fn test_drive_on_pilot_mode() {
        let mut drivetrain = Drivetrain::new(DrivetrainParams::default());
        let out = tick(&mut drivetrain, DriveMode::LocalAngle, None);
        assert_eq!(out.state, REGULAR);
        assert_eq!(out.throttle, 0.3);
        assert_eq!(
            out.events.as_slice(),
            &[DriveEvent::StateChanged {
                from: DriveState::Stopped,
                to: REGULAR,
                trigger: DriveTrigger::Drive,
            }]
        );
    }

    #[test]
    fn test_stop_releases_stick_next_tick() {
        let mut drivetrain = at_full_speed();

        // The stop tick still outputs the regime throttle
        let out = tick(&mut drivetrain, DriveMode::User, Some(1));
        assert_eq!(out.state, DriveState::Stopped);
        assert_eq!(out.throttle, 0.5);

        let out = tick(&mut drivetrain, DriveMode::User, Some(1));
        assert_eq!(out.state, DriveState::Stopped);
        assert_eq!(out.throttle, 0.1);
    }

    #[test]
    fn test_accelerate_on_vote() {
        let mut drivetrain = Drivetrain::new(DrivetrainParams::default());
        for _ in 0..7 {
            let out = tick(&mut drivetrain, DriveMode::Local, Some(1));
            assert_eq!(out.state, REGULAR);
        }

        // Full speed is entered now, its throttle applies from the next tick
        let out = tick(&mut drivetrain, DriveMode::Local, Some(1));
        assert_eq!(out.state, FULL);
        assert_eq!(out.throttle, 0.3);

        let out = tick(&mut drivetrain, DriveMode::Local, Some(1));
        assert_eq!(out.state, FULL);
        assert_eq!(out.throttle, 0.5);
    }

    #[test]
    fn test_brake_lasts_three_ticks() {
        let mut drivetrain = at_full_speed();

        // Push the window sum down to the low threshold
        let mut decelerate_tick = None;
        for i in 0..10 {
            let out = tick(&mut drivetrain, DriveMode::Local, Some(0));
            assert_eq!(out.throttle, 0.5);
            if out.state == BRAKING {
                decelerate_tick = Some(i);
                break;
            }
            assert_eq!(out.state, FULL);
        }
        assert!(decelerate_tick.is_some());

        for _ in 0..2 {
            let out = tick(&mut drivetrain, DriveMode::Local, Some(0));
            assert_eq!(out.state, BRAKING);
            assert_eq!(out.throttle, -0.2);
        }

        // Countdown exhausted: back to regular speed, brake throttle latched
        let out = tick(&mut drivetrain, DriveMode::Local, Some(0));
        assert_eq!(out.state, REGULAR);
        assert_eq!(out.throttle, -0.2);

        let out = tick(&mut drivetrain, DriveMode::Local, Some(0));
        assert_eq!(out.throttle, 0.3);
    }

    #[test]
    fn test_zero_brake_duration_returns_next_tick() {
        let params = DrivetrainParams {
            brake_cycles: 0,
            ..DrivetrainParams::default()
        };
        let mut drivetrain = Drivetrain::new(params);
        for _ in 0..8 {
            tick(&mut drivetrain, DriveMode::Local, Some(1));
        }
        assert_eq!(drivetrain.state(), FULL);

        // Braking entered and left in the same tick
        let mut states = [DriveState::Stopped; 12];
        for state in states.iter_mut() {
            *state = tick(&mut drivetrain, DriveMode::Local, Some(0)).state;
        }
        assert!(!states.contains(&BRAKING));
        assert_eq!(states[11], REGULAR);
    }

    #[test]
    fn test_acc_window_persists_across_stop() {
        let mut drivetrain = at_full_speed();
        tick(&mut drivetrain, DriveMode::User, None);
        assert_eq!(drivetrain.acc().sum(), 8);

        // Window still votes accelerate: drive then accelerate in one tick
        let out = tick(&mut drivetrain, DriveMode::Local, None);
        assert_eq!(out.state, FULL);
        assert_eq!(out.events.len(), 2);
    }

    #[test]
    fn test_extreme_acc_samples() {
        let mut drivetrain = Drivetrain::new(DrivetrainParams::default());
        tick(&mut drivetrain, DriveMode::Local, Some(i32::MAX));
        let out = tick(&mut drivetrain, DriveMode::Local, Some(i32::MAX));
        assert_eq!(out.state, FULL);
    }

    #[test]
    fn test_missing_sample_keeps_window() {
        let mut drivetrain = Drivetrain::new(DrivetrainParams::default());
        tick(&mut drivetrain, DriveMode::Local, Some(1));
        tick(&mut drivetrain, DriveMode::Local, None);
        assert_eq!(drivetrain.acc().len(), 1);
    }

    #[test]
    fn test_obstacle_avoidance() {
        let params = DrivetrainParams {
            obstacle_avoidance: true,
            ..DrivetrainParams::default()
        };
        let mut drivetrain = Drivetrain::new(params);
        let mut lane = LaneRequest::default();

        let out = drivetrain.tick(
            DriveInput {
                obstacles: ObstacleIndicators {
                    left: true,
                    right: false,
                },
                ..input(DriveMode::Local, None)
            },
            &mut lane,
        );
        assert_eq!(lane.requested, Lane::Right);
        // Center to right: one lane, steer right
        assert!((out.steering - 0.2).abs() < 1e-6);
        assert!(out.events.contains(&DriveEvent::LaneRequested {
            from: Lane::Center,
            to: Lane::Right
        }));

        // Both sides blocked: keep the request
        let out = drivetrain.tick(
            DriveInput {
                obstacles: ObstacleIndicators {
                    left: true,
                    right: true,
                },
                ..input(DriveMode::Local, None)
            },
            &mut lane,
        );
        assert_eq!(lane.requested, Lane::Right);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_lane_correction_disabled() {
        let mut drivetrain = Drivetrain::new(DrivetrainParams::default());
        let mut lane = LaneRequest {
            current: Lane::Left,
            requested: Lane::Right,
        };
        let out = drivetrain.tick(
            DriveInput {
                obstacles: ObstacleIndicators {
                    left: false,
                    right: true,
                },
                ..input(DriveMode::User, None)
            },
            &mut lane,
        );
        assert_eq!(out.steering, 0.0);
        assert_eq!(lane.requested, Lane::Right);
    }

    #[test]
    fn test_lane_correction_clamped() {
        let params = DrivetrainParams {
            obstacle_avoidance: true,
            ..DrivetrainParams::default()
        };
        let mut drivetrain = Drivetrain::new(params);
        let mut lane = LaneRequest {
            current: Lane::Right,
            requested: Lane::Left,
        };
        let out = drivetrain.tick(
            DriveInput {
                steering: -0.9,
                ..input(DriveMode::User, None)
            },
            &mut lane,
        );
        assert_eq!(out.steering, -1.0);
    }
}
