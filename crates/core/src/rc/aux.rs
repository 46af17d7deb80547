//! Auxiliary channel feature bindings
//!
//! Each aux channel is repurposed for one behavior chosen at startup.

use core::str::FromStr;

/// Behaviors an aux channel can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuxFeature {
    #[default]
    None,
    /// Low: record in user mode, high: pilot mode, middle: user mode
    RecordAndPilot,
    /// High: record
    Record,
    /// High: pilot mode
    Pilot,
    /// Edges step a fixed throttle up/down
    ThrottleExploration,
    /// Edges step a fixed steering up/down
    SteeringExploration,
    /// Edges step the actuator steering trim
    OutputSteeringTrim,
    /// Edges step a fixed actuator steering pulse
    OutputSteeringExploration,
    /// Edges annotate the current lane
    LaneAnnotation,
    /// Edges select the requested lane
    DriveOnLane,
    /// High: latch auto-recording on
    AutoRecord,
}

impl AuxFeature {
    pub const fn as_str(self) -> &'static str {
        match self {
            AuxFeature::None => "none",
            AuxFeature::RecordAndPilot => "record/pilot",
            AuxFeature::Record => "record",
            AuxFeature::Pilot => "pilot",
            AuxFeature::ThrottleExploration => "throttle_exploration",
            AuxFeature::SteeringExploration => "steering_exploration",
            AuxFeature::OutputSteeringTrim => "output_steering_trim",
            AuxFeature::OutputSteeringExploration => "output_steering_exp",
            AuxFeature::LaneAnnotation => "lane_annotation",
            AuxFeature::DriveOnLane => "drive_on_lane",
            AuxFeature::AutoRecord => "autorecord",
        }
    }
}

/// Unknown feature name in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxFeatureError;

impl core::fmt::Display for AuxFeatureError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown aux feature")
    }
}

impl core::error::Error for AuxFeatureError {}

impl FromStr for AuxFeature {
    type Err = AuxFeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" | "" => Ok(AuxFeature::None),
            "record/pilot" => Ok(AuxFeature::RecordAndPilot),
            "record" => Ok(AuxFeature::Record),
            "pilot" => Ok(AuxFeature::Pilot),
            "throttle_exploration" => Ok(AuxFeature::ThrottleExploration),
            "steering_exploration" => Ok(AuxFeature::SteeringExploration),
            "output_steering_trim" => Ok(AuxFeature::OutputSteeringTrim),
            "output_steering_exp" => Ok(AuxFeature::OutputSteeringExploration),
            "lane_annotation" => Ok(AuxFeature::LaneAnnotation),
            "drive_on_lane" => Ok(AuxFeature::DriveOnLane),
            "autorecord" => Ok(AuxFeature::AutoRecord),
            _ => Err(AuxFeatureError),
        }
    }
}

/// Aux channel slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxSlot {
    Aux1,
    Aux2,
}

/// Feature assignment for both aux channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuxBinding {
    pub aux1: AuxFeature,
    pub aux2: AuxFeature,
}

impl AuxBinding {
    pub const fn new(aux1: AuxFeature, aux2: AuxFeature) -> Self {
        Self { aux1, aux2 }
    }

    /// Slot bound to `feature`; aux1 takes precedence if both claim it
    pub fn slot_for(&self, feature: AuxFeature) -> Option<AuxSlot> {
        if feature == AuxFeature::None {
            None
        } else if self.aux1 == feature {
            Some(AuxSlot::Aux1)
        } else if self.aux2 == feature {
            Some(AuxSlot::Aux2)
        } else {
            None
        }
    }

    pub fn is_bound(&self, feature: AuxFeature) -> bool {
        self.slot_for(feature).is_some()
    }

    /// Both slots claim the same (non-none) feature
    pub fn has_conflict(&self) -> bool {
        self.aux1 != AuxFeature::None && self.aux1 == self.aux2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for feature in [
            AuxFeature::None,
            AuxFeature::RecordAndPilot,
            AuxFeature::Record,
            AuxFeature::Pilot,
            AuxFeature::ThrottleExploration,
            AuxFeature::SteeringExploration,
            AuxFeature::OutputSteeringTrim,
            AuxFeature::OutputSteeringExploration,
            AuxFeature::LaneAnnotation,
            AuxFeature::DriveOnLane,
            AuxFeature::AutoRecord,
        ] {
            assert_eq!(feature.as_str().parse::<AuxFeature>(), Ok(feature));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!("warp_drive".parse::<AuxFeature>(), Err(AuxFeatureError));
    }

    #[test]
    fn test_slot_lookup() {
        let binding = AuxBinding::new(AuxFeature::RecordAndPilot, AuxFeature::LaneAnnotation);
        assert_eq!(binding.slot_for(AuxFeature::RecordAndPilot), Some(AuxSlot::Aux1));
        assert_eq!(binding.slot_for(AuxFeature::LaneAnnotation), Some(AuxSlot::Aux2));
        assert_eq!(binding.slot_for(AuxFeature::Pilot), None);
        assert_eq!(binding.slot_for(AuxFeature::None), None);
        assert!(!binding.has_conflict());
    }

    #[test]
    fn test_conflict_prefers_aux1() {
        let binding = AuxBinding::new(AuxFeature::Record, AuxFeature::Record);
        assert!(binding.has_conflict());
        assert_eq!(binding.slot_for(AuxFeature::Record), Some(AuxSlot::Aux1));
    }
}
