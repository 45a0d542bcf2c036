//! Measurement functions and the ways to select them.

use std::{convert::Infallible, fmt::Display, str::FromStr};

use crate::reading::Unit;

/// Measurement functions of the Keithley 19x multimeters.
///
/// The discriminant is the number that selects the function with the `F` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// DC voltage.
    DcVolts = 0,
    /// AC voltage.
    AcVolts = 1,
    /// Resistance.
    Ohms = 2,
    /// DC current.
    DcAmps = 3,
    /// AC current.
    AcAmps = 4,
    /// AC voltage in dB.
    DbVolts = 5,
    /// AC current in dB.
    DbAmps = 6,
    /// Offset compensated resistance (Keithley 196 only).
    OffsetCompOhms = 7,
}

impl Function {
    /// Number of the function in the `F` command and in the status word.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Short mnemonic of the function, e.g., `"VDC"`.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Function::DcVolts => "VDC",
            Function::AcVolts => "VAC",
            Function::Ohms => "OHM",
            Function::DcAmps => "ADC",
            Function::AcAmps => "AAC",
            Function::DbVolts => "VDB",
            Function::DbAmps => "ADB",
            Function::OffsetCompOhms => "OCO",
        }
    }

    /// Human readable name of the function, e.g., `"Voltage DC"`.
    pub fn name(&self) -> &'static str {
        match self {
            Function::DcVolts => "Voltage DC",
            Function::AcVolts => "Voltage AC",
            Function::Ohms => "Resistance",
            Function::DcAmps => "Current DC",
            Function::AcAmps => "Current AC",
            Function::DbVolts => "Voltage dB",
            Function::DbAmps => "Current dB",
            Function::OffsetCompOhms => "Offset Compensated Resistance",
        }
    }

    /// Unit of the readings taken with this function.
    pub fn unit(&self) -> Unit {
        match self {
            Function::DcVolts => Unit::VoltsDc,
            Function::AcVolts => Unit::VoltsAc,
            Function::Ohms | Function::OffsetCompOhms => Unit::Ohms,
            Function::DcAmps => Unit::AmpsDc,
            Function::AcAmps => Unit::AmpsAc,
            Function::DbVolts => Unit::DbVolts,
            Function::DbAmps => Unit::DbAmps,
        }
    }

    /// Get the function for a number of the `F` command.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Function::DcVolts),
            1 => Some(Function::AcVolts),
            2 => Some(Function::Ohms),
            3 => Some(Function::DcAmps),
            4 => Some(Function::AcAmps),
            5 => Some(Function::DbVolts),
            6 => Some(Function::DbAmps),
            7 => Some(Function::OffsetCompOhms),
            _ => None,
        }
    }

    /// Look up a function by one of its names.
    ///
    /// The lookup ignores case and any whitespace, so `"ohm"`, `" OHM "`, and `"Ohms"` all
    /// select [`Function::Ohms`]. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        match key.as_str() {
            "VDC" | "DCV" => Some(Function::DcVolts),
            "VAC" | "ACV" => Some(Function::AcVolts),
            "OHM" | "OHMS" => Some(Function::Ohms),
            "ADC" | "DCA" => Some(Function::DcAmps),
            "AAC" | "ACA" => Some(Function::AcAmps),
            "VDB" => Some(Function::DbVolts),
            "ADB" => Some(Function::DbAmps),
            "OCO" => Some(Function::OffsetCompOhms),
            _ => None,
        }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Argument to select a measurement function, either by number or by name.
///
/// Integers, strings, and [`Function`]s all convert into a selector, so all of the following
/// select DC voltage on the instrument:
///
/// ```
/// use keithley_dmm::{Function, FunctionSelector};
///
/// let by_index = FunctionSelector::from(0);
/// let by_name = FunctionSelector::from("dcv");
/// let by_function = FunctionSelector::from(Function::DcVolts);
/// let parsed: FunctionSelector = "0".parse().unwrap();
/// assert_eq!(by_index, parsed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionSelector {
    /// Select by function number.
    Index(i64),
    /// Select by function name, see [`Function::from_name`].
    Name(String),
}

impl From<i64> for FunctionSelector {
    fn from(value: i64) -> Self {
        FunctionSelector::Index(value)
    }
}

impl From<i32> for FunctionSelector {
    fn from(value: i32) -> Self {
        FunctionSelector::Index(value.into())
    }
}

impl From<u8> for FunctionSelector {
    fn from(value: u8) -> Self {
        FunctionSelector::Index(value.into())
    }
}

impl From<&str> for FunctionSelector {
    fn from(value: &str) -> Self {
        FunctionSelector::Name(value.to_string())
    }
}

impl From<String> for FunctionSelector {
    fn from(value: String) -> Self {
        FunctionSelector::Name(value)
    }
}

impl From<Function> for FunctionSelector {
    fn from(value: Function) -> Self {
        FunctionSelector::Index(value.code().into())
    }
}

/// Text that parses as an integer selects by number, anything else by name.
impl FromStr for FunctionSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<i64>() {
            Ok(idx) => FunctionSelector::Index(idx),
            Err(_) => FunctionSelector::Name(s.to_string()),
        })
    }
}
