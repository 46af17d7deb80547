//! Drivetrain states and the transition table
//!
//! Two-level state: the vehicle is either stopped or driving, and while
//! driving it is in one of three throttle regimes. [`transition`] is a pure
//! lookup; pairs absent from the table are ignored by returning `None`.
//!
//! | From                 | Trigger    | To                   |
//! |----------------------|------------|----------------------|
//! | Stopped              | Drive      | Driving.RegularSpeed |
//! | Driving.*            | Stop       | Stopped              |
//! | Driving.RegularSpeed | Accelerate | Driving.FullSpeed    |
//! | Driving.FullSpeed    | Brake      | Driving.Braking      |
//! | Driving.Braking      | Drive      | Driving.RegularSpeed |

use crate::parameters::DrivetrainParams;

/// Throttle regime while driving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrivingState {
    #[default]
    RegularSpeed,
    FullSpeed,
    Braking,
}

impl DrivingState {
    pub const fn as_str(self) -> &'static str {
        match self {
            DrivingState::RegularSpeed => "regular_speed",
            DrivingState::FullSpeed => "full_speed",
            DrivingState::Braking => "braking",
        }
    }
}

/// Drivetrain state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriveState {
    #[default]
    Stopped,
    Driving(DrivingState),
}

impl DriveState {
    pub const fn is_driving(self) -> bool {
        matches!(self, DriveState::Driving(_))
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DriveState::Stopped => "stopped",
            DriveState::Driving(sub) => sub.as_str(),
        }
    }
}

/// Events that may move the drivetrain between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveTrigger {
    Drive,
    Stop,
    Accelerate,
    Brake,
}

/// Side effect run when entering the target state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryAction {
    None,
    SetThrottle(f32),
    SetThrottleAndBrake { throttle: f32, cycles: u32 },
}

/// An accepted edge of the transition table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub to: DriveState,
    pub action: EntryAction,
}

/// Look up the edge for `trigger` in `state`
///
/// With ACC throttle disabled, the full-speed and braking regimes still
/// exist but drive at the regular throttle and never count down.
pub fn transition(
    state: DriveState,
    trigger: DriveTrigger,
    params: &DrivetrainParams,
) -> Option<Transition> {
    use DriveState::*;
    use DrivingState::*;

    let regular = EntryAction::SetThrottle(params.regular_throttle);

    let (to, action) = match (state, trigger) {
        (Stopped, DriveTrigger::Drive) => (Driving(RegularSpeed), regular),
        (Driving(_), DriveTrigger::Stop) => (Stopped, EntryAction::None),
        (Driving(RegularSpeed), DriveTrigger::Accelerate) => {
            let action = if params.throttle_on_acc {
                EntryAction::SetThrottle(params.full_throttle)
            } else {
                regular
            };
            (Driving(FullSpeed), action)
        }
        (Driving(FullSpeed), DriveTrigger::Brake) => {
            let action = if params.throttle_on_acc {
                EntryAction::SetThrottleAndBrake {
                    throttle: params.brake_throttle,
                    cycles: params.brake_cycles,
                }
            } else {
                EntryAction::SetThrottleAndBrake {
                    throttle: params.regular_throttle,
                    cycles: 0,
                }
            };
            (Driving(Braking), action)
        }
        (Driving(Braking), DriveTrigger::Drive) => (Driving(RegularSpeed), regular),
        _ => return None,
    };

    Some(Transition { to, action })
}
