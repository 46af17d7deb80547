//! Hat serial protocol
//!
//! Parses the newline-delimited ASCII records sent by the receiver/sensor hat
//! and caches the latest valid frame of each kind.
//!
//! | Tag | Kind        | Fields (tag included) |
//! |-----|-------------|-----------------------|
//! | 0   | Battery     | 5                     |
//! | 1   | Channels    | 5                     |
//! | 2   | Sensors     | 3                     |
//! | 3   | Calibration | 3                     |

mod cache;
mod decoder;
mod frame;

pub use cache::{FrameCache, FrameGenerations, FrameSnapshot};
pub use decoder::{parse_line, FrameError};
pub use frame::{
    BatteryFrame, CalibrationFrame, ChannelsFrame, FrameKind, ReceiverFrame, SensorsFrame,
};
