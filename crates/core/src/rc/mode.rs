//! Drive mode selected from the transmitter

use core::str::FromStr;

/// Who is in control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriveMode {
    /// Human on the sticks
    #[default]
    User,
    /// Autopilot steers, human throttles
    LocalAngle,
    /// Autopilot steers and throttles
    Local,
}

impl DriveMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            DriveMode::User => "user",
            DriveMode::LocalAngle => "local_angle",
            DriveMode::Local => "local",
        }
    }

    pub const fn is_user(self) -> bool {
        matches!(self, DriveMode::User)
    }
}

/// Unknown mode label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveModeError;

impl core::fmt::Display for DriveModeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown drive mode")
    }
}

impl core::error::Error for DriveModeError {}

impl FromStr for DriveMode {
    type Err = DriveModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "user" => Ok(DriveMode::User),
            "local_angle" => Ok(DriveMode::LocalAngle),
            "local" => Ok(DriveMode::Local),
            _ => Err(DriveModeError),
        }
    }
}
