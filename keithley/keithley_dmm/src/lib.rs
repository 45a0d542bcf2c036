//! A rust driver for the Keithley 196 and Keithley 199 digital multimeters.
//!
//! Both instruments are controlled over a GPIB bus with the same, `X` terminated, command
//! language. This crate provides one driver, [`KeithleyDmm`], that is parameterized by the model
//! it talks to. Use the [`Keithley196`] and [`Keithley199`] aliases to get the driver for your
//! instrument.
//!
//! The driver talks through any [`Channel`] from `gpibRs`. The bus transport itself is not part
//! of this crate, bring a [`ResourceManager`] for your GPIB controller or any other [`Channel`].
//!
//! # Example
//!
//! ```no_run
//! use std::{net::TcpStream, time::Duration};
//!
//! use gpibrs::StreamChannel;
//! use keithley_dmm::Keithley196;
//!
//! // A bus bridge that forwards a raw socket to the instrument.
//! let stream = TcpStream::connect("192.168.10.1:1234").unwrap();
//! let channel = StreamChannel::new(stream, Duration::from_secs(3));
//! let mut dmm = Keithley196::try_new(channel).unwrap();
//!
//! // Measure resistance in the 3 kOhm range
//! dmm.set_function("OHM").unwrap();
//! dmm.set_range(2).unwrap();
//!
//! let value = dmm.read().unwrap();
//! println!("{value} {}", dmm.unit().unwrap());
//! ```

#![deny(warnings, missing_docs)]

pub mod display;
mod function;
mod model;
mod reading;
mod settings;
mod status;

pub use function::{Function, FunctionSelector};
pub use model::{K196, K199, Model, ModelDescriptor};
pub use reading::{DmmMeasurement, Unit};
pub use settings::{FilterKind, ZeroMode};
pub use status::{FieldSpan, StatusField, StatusWord};

use std::{fmt::Display, marker::PhantomData, time::SystemTime};

use gpibrs::{Channel, GpibAddress, InstrumentError, ResourceManager};
use tracing::{debug, warn};

/// Driver for the Keithley 196.
pub type Keithley196<T> = KeithleyDmm<T, K196>;

/// Driver for the Keithley 199.
pub type Keithley199<T> = KeithleyDmm<T, K199>;

/// A rust driver for the Keithley 19x multimeters.
///
/// The driver owns its channel. Setters validate their argument and send the command, they do
/// not read anything back. Call [`KeithleyDmm::read_status`] to see what the instrument actually
/// did.
///
/// See the top-level documentation for an example on how to use this driver.
#[derive(Debug)]
pub struct KeithleyDmm<T: Channel, M: Model> {
    channel: T,
    status: StatusWord,
    last_value: Option<f64>,
    unit: Option<Unit>,
    timestamp: Option<SystemTime>,
    model: PhantomData<M>,
}

impl<T: Channel, M: Model> KeithleyDmm<T, M> {
    /// Create a new driver instance with the given channel.
    ///
    /// This sets the instrument up to prefix its readings with their type and reads the status
    /// word once. Initialization thus fails if the instrument does not answer, or if it is not
    /// the model this driver is set up for.
    ///
    /// # Arguments
    /// * `channel` - An open channel that implements the [`Channel`] trait.
    pub fn try_new(channel: T) -> Result<Self, InstrumentError> {
        let mut instrument = KeithleyDmm {
            channel,
            status: StatusWord::default(),
            last_value: None,
            unit: None,
            timestamp: None,
            model: PhantomData,
        };
        instrument.sendcmd("G0X")?;
        instrument.read_status()?;
        Ok(instrument)
    }

    /// Open the instrument at a bus address with a resource manager.
    ///
    /// # Arguments
    /// * `rm` - The resource manager that opens the channel.
    /// * `primary` - Primary bus address of the instrument.
    /// * `board` - Number of the bus board (port) the instrument is connected to.
    pub fn open<R>(rm: &mut R, primary: u8, board: u8) -> Result<Self, InstrumentError>
    where
        R: ResourceManager<Channel = T>,
    {
        let address = GpibAddress::new(primary, board)?;
        debug!(model = M::DESCRIPTOR.name, %address, "opening");
        Self::try_new(rm.open(&address)?)
    }

    /// Open the instrument at its factory default address on board 0.
    ///
    /// The default address is 7 for the Keithley 196 and 1 for the Keithley 199.
    pub fn open_default<R>(rm: &mut R) -> Result<Self, InstrumentError>
    where
        R: ResourceManager<Channel = T>,
    {
        Self::open(rm, M::DESCRIPTOR.default_address, 0)
    }

    /// Give the channel back and drop the driver.
    pub fn release(self) -> T {
        self.channel
    }

    /// Take a reading.
    ///
    /// No command is sent, the instrument must be talking continuously or have been triggered
    /// before. The reply is decoded into its value, which is returned, and its unit.
    ///
    /// **Note**: A reply with an unknown prefix still returns the value, but keeps the unit of
    /// the previous reading. Use [`KeithleyDmm::read_measurement`] if you need the unit to
    /// belong to this very reading.
    pub fn read(&mut self) -> Result<f64, InstrumentError> {
        self.read_with_unit().map(|(_, value)| value)
    }

    /// Take a reading and return it as a unitful measurement.
    ///
    /// Same as [`KeithleyDmm::read`], but the unit is taken from the prefix of this reading. An
    /// unknown prefix is returned as an [`InstrumentError::ResponseParseError`].
    pub fn read_measurement(&mut self) -> Result<DmmMeasurement, InstrumentError> {
        match self.read_with_unit()? {
            (Some(unit), value) => Ok(reading::from_value_unit(value, unit)),
            (None, value) => Err(InstrumentError::ResponseParseError(format!(
                "Reading {value} has an unknown prefix"
            ))),
        }
    }

    /// Query and decode the status word.
    ///
    /// This updates the status that is kept by the driver and returns the status word as
    /// received, without surrounding whitespace.
    pub fn read_status(&mut self) -> Result<String, InstrumentError> {
        let reply = self.query("U0X")?;
        self.status = StatusWord::parse(&reply, M::DESCRIPTOR)?;
        Ok(reply.trim().to_string())
    }

    /// Query the error status word.
    ///
    /// The reply is returned as received.
    pub fn read_error(&mut self) -> Result<String, InstrumentError> {
        self.query("U1X")
    }

    /// Set the measurement range.
    ///
    /// Range 0 is auto-range, see [`KeithleyDmm::valid_ranges`] for what the other numbers mean
    /// for the active function. Returns the range that was sent.
    ///
    /// # Arguments
    /// * `range` - Range number from 0 to 7.
    pub fn set_range(&mut self, range: i64) -> Result<i64, InstrumentError> {
        if !(0..=7).contains(&range) {
            return Err(InstrumentError::IntValueOutOfRange {
                value: range,
                min: 0,
                max: 7,
            });
        }
        self.sendcmd(&format!("R{range}X"))?;
        Ok(range)
    }

    /// Set the measurement function.
    ///
    /// The function can be selected by its number or by its name, see [`FunctionSelector`].
    /// Returns the function that was sent.
    ///
    /// ```no_run
    /// # use gpibrs::LoopbackChannel;
    /// # use keithley_dmm::{Function, Keithley196};
    /// # fn demo(dmm: &mut Keithley196<LoopbackChannel>) {
    /// dmm.set_function(2).unwrap();
    /// dmm.set_function("Ohms").unwrap();
    /// dmm.set_function(Function::Ohms).unwrap();
    /// # }
    /// ```
    pub fn set_function(
        &mut self,
        selector: impl Into<FunctionSelector>,
    ) -> Result<Function, InstrumentError> {
        let functions = M::DESCRIPTOR.functions;
        let function = match selector.into() {
            FunctionSelector::Index(idx) => usize::try_from(idx)
                .ok()
                .and_then(|i| functions.get(i).copied())
                .ok_or(InstrumentError::IntValueOutOfRange {
                    value: idx,
                    min: 0,
                    max: i64::try_from(functions.len()).unwrap_or(i64::MAX) - 1,
                })?,
            FunctionSelector::Name(name) => Function::from_name(&name)
                .filter(|func| functions.contains(func))
                .ok_or_else(|| {
                    InstrumentError::InvalidArgument(format!("Unknown function string: {name}"))
                })?,
        };
        self.sendcmd(&format!("F{}X", function.code()))?;
        Ok(function)
    }

    /// Set the zero mode.
    ///
    /// - `0`: Zero off.
    /// - `1`: Zero on, the current reading becomes the baseline.
    /// - `2`: Zero on, `value` becomes the baseline.
    ///
    /// **Note**: Mode 2 with a `value` of exactly zero behaves like mode 1.
    /// A `value` that is not finite is rejected with [`InstrumentError::InvalidArgument`].
    ///
    /// # Arguments
    /// * `mode` - Zero mode from 0 to 2.
    /// * `value` - Baseline for mode 2, ignored otherwise.
    pub fn set_zero(&mut self, mode: u8, value: f64) -> Result<(), InstrumentError> {
        let cmd = settings::zero_command(mode, value)?;
        self.sendcmd(&cmd)
    }

    /// Set the filter.
    ///
    /// On the Keithley 196 this is the number of readings the digital filter averages, 0 to 99,
    /// where 0 turns the filter off. On the Keithley 199 this is the filter mode: 0 disabled,
    /// 1 internal, 2 front panel.
    pub fn set_filter(&mut self, n: i64) -> Result<(), InstrumentError> {
        let max = M::DESCRIPTOR.filter.max();
        if !(0..=i64::from(max)).contains(&n) {
            return Err(InstrumentError::IntValueOutOfRange {
                value: n,
                min: 0,
                max: max.into(),
            });
        }
        self.sendcmd(&format!("P{n}X"))
    }

    /// Show a text of up to 10 characters on the display.
    ///
    /// The text is upper-cased. Spaces are shown as `@` and an `x` stays lower-case, as the
    /// instrument cannot display these characters otherwise.
    pub fn set_display_text(&mut self, text: &str) -> Result<(), InstrumentError> {
        let text = display::encode_display_text(text)?;
        self.sendcmd(&format!("D{text}X"))
    }

    /// Clear the text from the display and return to showing readings.
    pub fn clear_display(&mut self) -> Result<(), InstrumentError> {
        self.set_display_text("")
    }

    /// Status as decoded by the last [`KeithleyDmm::read_status`].
    pub fn status(&self) -> &StatusWord {
        &self.status
    }

    /// Value of the last reading, if any.
    pub fn last_value(&self) -> Option<f64> {
        self.last_value
    }

    /// Unit of the last reading with a known prefix, if any.
    pub fn unit(&self) -> Option<Unit> {
        self.unit
    }

    /// Time of the last reading, if any.
    pub fn timestamp(&self) -> Option<SystemTime> {
        self.timestamp
    }

    /// The active function according to the last status word.
    pub fn function(&self) -> Option<Function> {
        M::DESCRIPTOR.function(self.status.function)
    }

    /// Label of the active range according to the last status word.
    pub fn range_label(&self) -> Option<&'static str> {
        M::DESCRIPTOR.range_label(self.status.function, self.status.range)
    }

    /// The zero mode according to the last status word.
    pub fn zero_mode(&self) -> Option<ZeroMode> {
        ZeroMode::from_code(self.status.zero)
    }

    /// Label of the filter setting according to the last status word.
    pub fn filter_label(&self) -> String {
        M::DESCRIPTOR.filter.label(self.status.filter)
    }

    /// Mnemonics and names of the functions of this model, ordered by function number.
    pub fn functions(&self) -> Vec<(&'static str, &'static str)> {
        M::DESCRIPTOR
            .functions
            .iter()
            .map(|func| (func.mnemonic(), func.name()))
            .collect()
    }

    /// Read the status and return the distinct ranges of the active function.
    ///
    /// Range numbers that select the same range as a lower number are skipped.
    pub fn valid_ranges(&mut self) -> Result<Vec<(u8, &'static str)>, InstrumentError> {
        self.read_status()?;
        let Some(labels) = usize::try_from(self.status.function)
            .ok()
            .and_then(|idx| M::DESCRIPTOR.ranges.get(idx))
        else {
            return Err(InstrumentError::ResponseParseError(format!(
                "Unknown function number {} in status word",
                self.status.function
            )));
        };
        let mut ranges: Vec<(u8, &'static str)> = Vec::new();
        for (idx, label) in (0u8..).zip(labels.iter()) {
            if !ranges.iter().any(|(_, known)| known == label) {
                ranges.push((idx, *label));
            }
        }
        Ok(ranges)
    }

    /// Read the status and summarize function, range, zero, and filter settings.
    pub fn status_summary(&mut self) -> Result<StatusSummary, InstrumentError> {
        self.read_status()?;
        Ok(StatusSummary {
            model: M::DESCRIPTOR.name,
            function: self.function(),
            range: self.range_label(),
            zero: self.zero_mode(),
            filter: self.filter_label(),
        })
    }

    fn read_with_unit(&mut self) -> Result<(Option<Unit>, f64), InstrumentError> {
        let reply = self.channel.read()?;
        let timestamp = SystemTime::now();
        let (unit, value) = reading::parse_reading(&reply, M::DESCRIPTOR.prefixes)?;
        match unit {
            Some(unit) => self.unit = Some(unit),
            None => warn!(
                model = M::DESCRIPTOR.name,
                reply = reply.as_str(),
                "unknown reading prefix, keeping previous unit"
            ),
        }
        self.last_value = Some(value);
        self.timestamp = Some(timestamp);
        Ok((unit, value))
    }

    /// Send a command to the instrument.
    fn sendcmd(&mut self, cmd: &str) -> Result<(), InstrumentError> {
        debug!(model = M::DESCRIPTOR.name, cmd, "write");
        self.channel.write(cmd)
    }

    /// Query the instrument with a command and return the response as a String.
    fn query(&mut self, cmd: &str) -> Result<String, InstrumentError> {
        debug!(model = M::DESCRIPTOR.name, cmd, "query");
        self.channel.query(cmd)
    }
}

/// Summary of the main settings of the instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    /// Name of the model.
    pub model: &'static str,
    /// Active function, `None` if the status word holds an unknown number.
    pub function: Option<Function>,
    /// Label of the active range.
    pub range: Option<&'static str>,
    /// Zero mode.
    pub zero: Option<ZeroMode>,
    /// Filter setting.
    pub filter: String,
}

impl Display for StatusSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unknown = "UNKNOWN".to_string();
        let function = self
            .function
            .map_or_else(|| unknown.clone(), |func| func.unit().to_string());
        let zero = self.zero.map_or_else(|| unknown.clone(), |z| z.to_string());
        writeln!(f, "--- {} status ---", self.model)?;
        writeln!(f, "Function ... {function}")?;
        writeln!(f, "Range ...... {}", self.range.unwrap_or("UNKNOWN"))?;
        writeln!(f, "Zero ....... {zero}")?;
        write!(f, "Filter ..... {}", self.filter)
    }
}
