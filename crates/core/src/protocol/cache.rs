//! Latest-frame cache
//!
//! Keeps only the most recent valid frame of each kind. A rejected line never
//! disturbs the previously cached frame (last-valid-wins). Readers compare
//! per-slot generations to detect fresh data; intermediate frames may be
//! skipped.

use super::decoder::{parse_line, FrameError};
use super::frame::{
    BatteryFrame, CalibrationFrame, ChannelsFrame, FrameKind, ReceiverFrame, SensorsFrame,
};

/// Per-slot update counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameGenerations {
    pub battery: u32,
    pub channels: u32,
    pub sensors: u32,
    pub calibration: u32,
}

/// Copy of the cache taken by the control task once per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSnapshot {
    pub battery: Option<BatteryFrame>,
    pub channels: Option<ChannelsFrame>,
    pub sensors: Option<SensorsFrame>,
    pub calibration: Option<CalibrationFrame>,
    pub generations: FrameGenerations,
}

/// Four latest-frame slots
#[derive(Debug, Clone, Default)]
pub struct FrameCache {
    snapshot: FrameSnapshot,
}

impl FrameCache {
    pub const fn new() -> Self {
        Self {
            snapshot: FrameSnapshot {
                battery: None,
                channels: None,
                sensors: None,
                calibration: None,
                generations: FrameGenerations {
                    battery: 0,
                    channels: 0,
                    sensors: 0,
                    calibration: 0,
                },
            },
        }
    }

    /// Parse a line and store it if valid
    ///
    /// Returns the kind of frame stored, `Ok(None)` if the line was ignored.
    pub fn ingest(&mut self, line: &str) -> Result<Option<FrameKind>, FrameError> {
        match parse_line(line)? {
            Some(frame) => {
                let kind = frame.kind();
                self.store(frame);
                Ok(Some(kind))
            }
            None => Ok(None),
        }
    }

    /// Overwrite the slot matching the frame's kind
    pub fn store(&mut self, frame: ReceiverFrame) {
        let s = &mut self.snapshot;
        match frame {
            ReceiverFrame::Battery(f) => {
                s.battery = Some(f);
                s.generations.battery = s.generations.battery.wrapping_add(1);
            }
            ReceiverFrame::Channels(f) => {
                s.channels = Some(f);
                s.generations.channels = s.generations.channels.wrapping_add(1);
            }
            ReceiverFrame::Sensors(f) => {
                s.sensors = Some(f);
                s.generations.sensors = s.generations.sensors.wrapping_add(1);
            }
            ReceiverFrame::Calibration(f) => {
                s.calibration = Some(f);
                s.generations.calibration = s.generations.calibration.wrapping_add(1);
            }
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        self.snapshot
    }

    pub fn channels(&self) -> Option<ChannelsFrame> {
        self.snapshot.channels
    }

    pub fn battery(&self) -> Option<BatteryFrame> {
        self.snapshot.battery
    }

    pub fn sensors(&self) -> Option<SensorsFrame> {
        self.snapshot.sensors
    }

    pub fn calibration(&self) -> Option<CalibrationFrame> {
        self.snapshot.calibration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_overwrites_slot() {
        let mut cache = FrameCache::new();
        assert_eq!(cache.ingest("1,1100,1900,1500,1500"), Ok(Some(FrameKind::Channels)));
        assert_eq!(cache.ingest("1,1200,1800,1500,1500"), Ok(Some(FrameKind::Channels)));

        let channels = cache.channels().unwrap();
        assert_eq!(channels.throttle, 1200);
        assert_eq!(cache.snapshot().generations.channels, 2);
    }

    #[test]
    fn test_malformed_keeps_previous_frame() {
        let mut cache = FrameCache::new();
        cache.ingest("1,1100,1900,1500,1500").unwrap();

        assert!(cache.ingest("1,1100,1900").is_err());
        assert!(cache.ingest("1,1100,oops,1500,1500").is_err());

        let channels = cache.channels().unwrap();
        assert_eq!(channels.throttle, 1100);
        assert_eq!(channels.steering, 1900);
        assert_eq!(cache.snapshot().generations.channels, 1);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut cache = FrameCache::new();
        cache.ingest("3,1500,1500").unwrap();
        cache.ingest("2,0,50").unwrap();
        cache.ingest("0,1,2,3,4").unwrap();

        let snap = cache.snapshot();
        assert!(snap.channels.is_none());
        assert_eq!(snap.generations.channels, 0);
        assert_eq!(snap.generations.calibration, 1);
        assert_eq!(snap.sensors.unwrap().pulses, 50);
        assert_eq!(snap.battery.unwrap().values, [1, 2, 3, 4]);
    }

    #[test]
    fn test_unknown_tag_leaves_cache_untouched() {
        let mut cache = FrameCache::new();
        assert_eq!(cache.ingest("7,1,2"), Ok(None));
        assert_eq!(cache.snapshot().generations, FrameGenerations::default());
    }
}
