//! Module to handle the readings of the instrument and their units.

use std::fmt::Display;

use gpibrs::InstrumentError;
use measurements::{Current, Resistance, Voltage};

/// Units of the readings the Keithley 19x multimeters send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Volts DC.
    VoltsDc,
    /// Volts AC.
    VoltsAc,
    /// Ohm.
    Ohms,
    /// Ampere DC.
    AmpsDc,
    /// Ampere AC.
    AmpsAc,
    /// dB of AC voltage.
    DbVolts,
    /// dB of AC current.
    DbAmps,
    /// Dimensionless ratio (Keithley 199 only).
    Ratio,
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Unit::VoltsDc => "V DC",
            Unit::VoltsAc => "V AC",
            Unit::Ohms => "Ohm",
            Unit::AmpsDc => "A DC",
            Unit::AmpsAc => "A AC",
            Unit::DbVolts => "dB V",
            Unit::DbAmps => "dB A",
            Unit::Ratio => "Ratio",
        };
        write!(f, "{label}")
    }
}

/// A reading with a unitful value.
///
/// Voltages, currents, and resistances are returned as [`measurements`] types. dB readings and
/// ratios have no physical unit and are kept as plain numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum DmmMeasurement {
    /// DC or AC voltage.
    Voltage(Voltage),
    /// DC or AC current.
    Current(Current),
    /// Resistance, with or without offset compensation.
    Resistance(Resistance),
    /// dB value of a voltage or current.
    Decibel(f64),
    /// Ratio of two readings.
    Ratio(f64),
}

impl Display for DmmMeasurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DmmMeasurement::Voltage(v) => write!(f, "{v}"),
            DmmMeasurement::Current(c) => write!(f, "{c}"),
            DmmMeasurement::Resistance(r) => write!(f, "{r}"),
            DmmMeasurement::Decibel(db) => write!(f, "{db} dB"),
            DmmMeasurement::Ratio(ratio) => write!(f, "{ratio}"),
        }
    }
}

/// Convert a value and its unit into a [`DmmMeasurement`].
pub(crate) fn from_value_unit(value: f64, unit: Unit) -> DmmMeasurement {
    match unit {
        Unit::VoltsDc | Unit::VoltsAc => DmmMeasurement::Voltage(Voltage::from_volts(value)),
        Unit::AmpsDc | Unit::AmpsAc => DmmMeasurement::Current(Current::from_amperes(value)),
        Unit::Ohms => DmmMeasurement::Resistance(Resistance::from_ohms(value)),
        Unit::DbVolts | Unit::DbAmps => DmmMeasurement::Decibel(value),
        Unit::Ratio => DmmMeasurement::Ratio(value),
    }
}

/// Split a reading reply into its unit and value.
///
/// Only the first comma separated field is used. It consists of one status character, a three
/// character prefix, and the value. The prefix is looked up in `prefixes`. An unknown prefix
/// gives `None` as unit, a value that is not a number is a parse error.
pub(crate) fn parse_reading(
    reply: &str,
    prefixes: &[(&str, Unit)],
) -> Result<(Option<Unit>, f64), InstrumentError> {
    let field = reply.trim().split(',').next().unwrap_or_default();
    let (Some(prefix), Some(value)) = (field.get(1..4), field.get(4..)) else {
        return Err(InstrumentError::ResponseParseError(reply.to_string()));
    };
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| InstrumentError::ResponseParseError(reply.to_string()))?;
    let unit = prefixes
        .iter()
        .find(|(pfx, _)| *pfx == prefix)
        .map(|(_, unit)| *unit);
    Ok((unit, value))
}
