//! Receiver frame types
//!
//! One variant per record kind emitted by the hat. Fields are the raw integer
//! values that follow the tag on the wire.

/// Frame kind (wire tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// Battery monitor readings (tag 0)
    Battery,
    /// Radio channel pulse widths (tag 1)
    Channels,
    /// Odometry / auxiliary sensors (tag 2)
    Sensors,
    /// Receiver idle calibration (tag 3)
    Calibration,
}

impl FrameKind {
    /// Map a wire tag to a frame kind, `None` for tags this link does not use
    pub const fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(FrameKind::Battery),
            1 => Some(FrameKind::Channels),
            2 => Some(FrameKind::Sensors),
            3 => Some(FrameKind::Calibration),
            _ => None,
        }
    }

    /// Wire tag
    pub const fn tag(self) -> i32 {
        match self {
            FrameKind::Battery => 0,
            FrameKind::Channels => 1,
            FrameKind::Sensors => 2,
            FrameKind::Calibration => 3,
        }
    }

    /// Number of comma-separated fields on the wire, tag included
    pub const fn arity(self) -> usize {
        match self {
            FrameKind::Battery | FrameKind::Channels => 5,
            FrameKind::Sensors | FrameKind::Calibration => 3,
        }
    }

    /// Short name for logging
    pub const fn as_str(self) -> &'static str {
        match self {
            FrameKind::Battery => "battery",
            FrameKind::Channels => "channels",
            FrameKind::Sensors => "sensors",
            FrameKind::Calibration => "calibration",
        }
    }
}

/// Radio channel pulse widths (microseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelsFrame {
    pub throttle: i32,
    pub steering: i32,
    pub aux1: i32,
    pub aux2: i32,
}

/// Battery readings, passed through untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryFrame {
    pub values: [i32; 4],
}

/// Sensor readings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorsFrame {
    /// First sensor field (not interpreted)
    pub aux: i32,
    /// Odometry pulse count
    pub pulses: i32,
}

/// Idle pulse widths learned by the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationFrame {
    pub throttle_idle: i32,
    pub steering_idle: i32,
}

/// A parsed hat record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverFrame {
    Battery(BatteryFrame),
    Channels(ChannelsFrame),
    Sensors(SensorsFrame),
    Calibration(CalibrationFrame),
}

impl ReceiverFrame {
    pub const fn kind(&self) -> FrameKind {
        match self {
            ReceiverFrame::Battery(_) => FrameKind::Battery,
            ReceiverFrame::Channels(_) => FrameKind::Channels,
            ReceiverFrame::Sensors(_) => FrameKind::Sensors,
            ReceiverFrame::Calibration(_) => FrameKind::Calibration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_mapping_is_bijective() {
        for kind in [
            FrameKind::Battery,
            FrameKind::Channels,
            FrameKind::Sensors,
            FrameKind::Calibration,
        ] {
            assert_eq!(FrameKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(FrameKind::from_tag(4), None);
        assert_eq!(FrameKind::from_tag(-1), None);
    }

    #[test]
    fn test_arity() {
        assert_eq!(FrameKind::Channels.arity(), 5);
        assert_eq!(FrameKind::Battery.arity(), 5);
        assert_eq!(FrameKind::Sensors.arity(), 3);
        assert_eq!(FrameKind::Calibration.arity(), 3);
    }
}
