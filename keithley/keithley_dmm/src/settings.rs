//! Zero and filter settings.

use std::fmt::Display;

use gpibrs::InstrumentError;

/// Zero modes of the instrument as reported in the status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroMode {
    /// Zero is off.
    Disabled = 0,
    /// Zero is on, using the reading at the time it was enabled as baseline.
    Enabled = 1,
    /// Zero is on, using a value that was sent to the instrument as baseline.
    Value = 2,
}

impl ZeroMode {
    /// Get the zero mode for its number in the status word.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(ZeroMode::Disabled),
            1 => Some(ZeroMode::Enabled),
            2 => Some(ZeroMode::Value),
            _ => None,
        }
    }
}

impl Display for ZeroMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZeroMode::Disabled => write!(f, "DISABLED"),
            ZeroMode::Enabled => write!(f, "ENABLED"),
            ZeroMode::Value => write!(f, "USING ZERO VALUE"),
        }
    }
}

/// Build the command for a zero mode.
///
/// Mode 2 with a baseline of exactly zero cannot be told apart from "no baseline given" and thus
/// sends the same command as mode 1.
pub(crate) fn zero_command(mode: u8, value: f64) -> Result<String, InstrumentError> {
    match mode {
        0 => Ok("Z0X".to_string()),
        1 => Ok("Z1X".to_string()),
        2 if !value.is_finite() => Err(InstrumentError::InvalidArgument(format!(
            "Zero value must be a finite number, got: {value}"
        ))),
        2 if value == 0.0 => Ok("Z1X".to_string()),
        2 => Ok(format!("V{value:?}XZ2X")),
        _ => Err(InstrumentError::IntValueOutOfRange {
            value: mode.into(),
            min: 0,
            max: 2,
        }),
    }
}

/// How the filter of a model is set with the `P` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Digital filter that averages the given number of readings, zero turns it off.
    Digital {
        /// Largest number of readings.
        max: u8,
    },
    /// Filter mode, see [`FilterKind::mode_label`].
    Mode,
}

impl FilterKind {
    /// Largest value the `P` command accepts.
    pub fn max(&self) -> u8 {
        match self {
            FilterKind::Digital { max } => *max,
            FilterKind::Mode => 2,
        }
    }

    /// Human readable label for a filter setting from the status word.
    pub fn label(&self, value: u32) -> String {
        match self {
            FilterKind::Digital { .. } => value.to_string(),
            FilterKind::Mode => Self::mode_label(value).to_string(),
        }
    }

    /// Label of a filter mode.
    pub fn mode_label(value: u32) -> &'static str {
        match value {
            0 => "DISABLED",
            1 => "INTERNAL",
            2 => "FRONT PANEL",
            _ => "UNKNOWN",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(0, 0.0, "Z0X")]
    #[case(1, 0.0, "Z1X")]
    #[case(1, 5.0, "Z1X")]
    #[case(2, 0.0, "Z1X")]
    #[case(2, 1.2345, "V1.2345XZ2X")]
    #[case(2, 1.0, "V1.0XZ2X")]
    #[case(2, -0.25, "V-0.25XZ2X")]
    fn test_zero_command(#[case] mode: u8, #[case] value: f64, #[case] exp: &str) {
        assert_eq!(zero_command(mode, value).unwrap(), exp);
    }

    #[rstest]
    fn test_zero_command_invalid_mode() {
        assert!(matches!(
            zero_command(3, 0.0),
            Err(InstrumentError::IntValueOutOfRange { value: 3, .. })
        ));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn test_zero_command_non_finite(#[case] value: f64) {
        assert!(matches!(
            zero_command(2, value),
            Err(InstrumentError::InvalidArgument(_))
        ));
    }

    #[rstest]
    #[case(FilterKind::Digital { max: 99 }, 10, "10")]
    #[case(FilterKind::Mode, 0, "DISABLED")]
    #[case(FilterKind::Mode, 2, "FRONT PANEL")]
    #[case(FilterKind::Mode, 7, "UNKNOWN")]
    fn test_filter_label(#[case] kind: FilterKind, #[case] value: u32, #[case] exp: &str) {
        assert_eq!(kind.label(value), exp);
    }

    #[rstest]
    fn test_zero_mode_display() {
        assert_eq!(format!("{}", ZeroMode::from_code(2).unwrap()), "USING ZERO VALUE");
        assert_eq!(ZeroMode::from_code(3), None);
    }
}
