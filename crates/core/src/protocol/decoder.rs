//! Line decoder for the hat serial protocol
//!
//! Each record is one ASCII line of comma-separated integers, the first being
//! the tag. See [`FrameKind`] for the tag table.

use super::frame::{
    BatteryFrame, CalibrationFrame, ChannelsFrame, FrameKind, ReceiverFrame, SensorsFrame,
};

/// Maximum number of value fields after the tag
const MAX_VALUES: usize = 4;

/// Reasons a line is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Tag field is not an integer
    InvalidTag,
    /// Field count does not match the tag's arity
    WrongArity {
        kind: FrameKind,
        expected: usize,
        found: usize,
    },
    /// A value field is not an integer (`index` counts the tag as 0)
    InvalidField { kind: FrameKind, index: usize },
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::InvalidTag => write!(f, "tag is not numeric"),
            FrameError::WrongArity {
                kind,
                expected,
                found,
            } => write!(
                f,
                "{} frame expects {} fields, got {}",
                kind.as_str(),
                expected,
                found
            ),
            FrameError::InvalidField { kind, index } => {
                write!(f, "{} frame field {} is not numeric", kind.as_str(), index)
            }
        }
    }
}

impl core::error::Error for FrameError {}

/// Parse one line into a frame
///
/// # Returns
///
/// - `Ok(Some(frame))` for a well-formed record with a known tag
/// - `Ok(None)` for blank lines and unknown tags
/// - `Err(_)` for malformed records of a known kind (or a non-numeric tag)
pub fn parse_line(line: &str) -> Result<Option<ReceiverFrame>, FrameError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut fields = line.split(',');
    let Some(tag_field) = fields.next() else {
        return Ok(None);
    };
    let tag: i32 = tag_field
        .trim()
        .parse()
        .map_err(|_| FrameError::InvalidTag)?;
    let Some(kind) = FrameKind::from_tag(tag) else {
        return Ok(None);
    };

    let found = line.split(',').count();
    if found != kind.arity() {
        return Err(FrameError::WrongArity {
            kind,
            expected: kind.arity(),
            found,
        });
    }

    let mut values = [0i32; MAX_VALUES];
    for (i, field) in fields.enumerate() {
        values[i] = field
            .trim()
            .parse()
            .map_err(|_| FrameError::InvalidField { kind, index: i + 1 })?;
    }

    let frame = match kind {
        FrameKind::Battery => ReceiverFrame::Battery(BatteryFrame { values }),
        FrameKind::Channels => ReceiverFrame::Channels(ChannelsFrame {
            throttle: values[0],
            steering: values[1],
            aux1: values[2],
            aux2: values[3],
        }),
        FrameKind::Sensors => ReceiverFrame::Sensors(SensorsFrame {
            aux: values[0],
            pulses: values[1],
        }),
        FrameKind::Calibration => ReceiverFrame::Calibration(CalibrationFrame {
            throttle_idle: values[0],
            steering_idle: values[1],
        }),
    };
    Ok(Some(frame))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channels() {
        let frame = parse_line("1,1100,1900,1500,1500").unwrap();
        assert_eq!(
            frame,
            Some(ReceiverFrame::Channels(ChannelsFrame {
                throttle: 1100,
                steering: 1900,
                aux1: 1500,
                aux2: 1500,
            }))
        );
    }

    #[test]
    fn test_parse_all_kinds() {
        assert!(matches!(
            parse_line("0,7400,3700,3700,0"),
            Ok(Some(ReceiverFrame::Battery(BatteryFrame {
                values: [7400, 3700, 3700, 0]
            })))
        ));
        assert!(matches!(
            parse_line("2,0,120"),
            Ok(Some(ReceiverFrame::Sensors(SensorsFrame {
                aux: 0,
                pulses: 120
            })))
        ));
        assert!(matches!(
            parse_line("3,1490,1510"),
            Ok(Some(ReceiverFrame::Calibration(CalibrationFrame {
                throttle_idle: 1490,
                steering_idle: 1510
            })))
        ));
    }

    #[test]
    fn test_trailing_carriage_return_and_spaces() {
        let frame = parse_line(" 3, 1500 ,1500\r\n").unwrap();
        assert!(matches!(frame, Some(ReceiverFrame::Calibration(_))));
    }

    #[test]
    fn test_wrong_arity_rejected() {
        assert_eq!(
            parse_line("1,1100,1900"),
            Err(FrameError::WrongArity {
                kind: FrameKind::Channels,
                expected: 5,
                found: 3
            })
        );
        assert_eq!(
            parse_line("3,1500,1500,1500"),
            Err(FrameError::WrongArity {
                kind: FrameKind::Calibration,
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_non_numeric_fields_rejected() {
        assert_eq!(parse_line("x,1,2"), Err(FrameError::InvalidTag));
        assert_eq!(
            parse_line("1,1100,abc,1500,1500"),
            Err(FrameError::InvalidField {
                kind: FrameKind::Channels,
                index: 2
            })
        );
        assert_eq!(
            parse_line("2,0,"),
            Err(FrameError::InvalidField {
                kind: FrameKind::Sensors,
                index: 2
            })
        );
    }

    #[test]
    fn test_unknown_tag_and_blank_ignored() {
        assert_eq!(parse_line("9,1,2,3"), Ok(None));
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   \r"), Ok(None));
    }

    #[test]
    fn test_negative_values_parse() {
        let frame = parse_line("2,0,-42").unwrap();
        assert!(matches!(
            frame,
            Some(ReceiverFrame::Sensors(SensorsFrame { pulses: -42, .. }))
        ));
    }
}
