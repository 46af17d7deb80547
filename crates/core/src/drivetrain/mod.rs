//! Drivetrain state machine
//!
//! Decides the throttle regime (stopped, regular, full speed, braking) from
//! the drive mode and an adaptive-cruise vote, and corrects steering toward
//! the requested lane.

pub mod acc;
pub mod controller;
pub mod lane;
pub mod state;

pub use acc::{AccFilter, AccVote, ACC_WINDOW_MAX};
pub use controller::{DriveEvent, DriveInput, DriveOutput, Drivetrain, MAX_DRIVE_EVENTS};
pub use lane::{
    avoid_obstacles, correct_steering, steering_adjustment, Lane, LaneRequest, ObstacleIndicators,
};
pub use state::{transition, DriveState, DriveTrigger, DrivingState, EntryAction, Transition};
