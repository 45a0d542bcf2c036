//! Descriptors of the supported instrument models.
//!
//! Both models speak the same command language. They differ in the functions they offer, the
//! ranges behind each range number, the filter command, the reading prefixes, and the layout of
//! the status word. All of these are kept as static data in a [`ModelDescriptor`].

use crate::{
    function::Function,
    reading::Unit,
    settings::FilterKind,
    status::{FieldSpan, StatusField as F},
};

/// Static description of one instrument model.
#[derive(Debug)]
pub struct ModelDescriptor {
    /// Name of the model, e.g., `"Keithley 196"`.
    pub name: &'static str,
    /// Model number the status word starts with.
    pub id: &'static str,
    /// Length of the status word.
    pub status_len: usize,
    /// Factory default primary bus address.
    pub default_address: u8,
    /// Supported functions, ordered by their function number.
    pub functions: &'static [Function],
    /// Range labels, indexed by function number and then by range number.
    pub ranges: &'static [[&'static str; 8]],
    /// How the filter is set.
    pub filter: FilterKind,
    /// Reading prefixes and the units they stand for.
    pub prefixes: &'static [(&'static str, Unit)],
    /// Position of every field in the status word.
    pub status_layout: &'static [FieldSpan],
}

impl ModelDescriptor {
    /// Label of a range number for a function number, e.g., `"3 kOhm"`.
    pub fn range_label(&self, function: u32, range: u32) -> Option<&'static str> {
        let function = usize::try_from(function).ok()?;
        let range = usize::try_from(range).ok()?;
        self.ranges.get(function)?.get(range).copied()
    }

    /// Look up a function number among the functions of this model.
    pub fn function(&self, code: u32) -> Option<Function> {
        Function::from_code(code).filter(|func| self.functions.contains(func))
    }
}

/// Marker trait that ties a model type to its descriptor.
pub trait Model {
    /// The descriptor of the model.
    const DESCRIPTOR: &'static ModelDescriptor;
}

/// The Keithley 196 system DMM.
#[derive(Debug, Clone, Copy)]
pub struct K196;

/// The Keithley 199 system DMM / scanner.
#[derive(Debug, Clone, Copy)]
pub struct K199;

impl Model for K196 {
    const DESCRIPTOR: &'static ModelDescriptor = &KEITHLEY_196;
}

impl Model for K199 {
    const DESCRIPTOR: &'static ModelDescriptor = &KEITHLEY_199;
}

static KEITHLEY_196: ModelDescriptor = ModelDescriptor {
    name: "Keithley 196",
    id: "196",
    status_len: 31,
    default_address: 7,
    functions: &[
        Function::DcVolts,
        Function::AcVolts,
        Function::Ohms,
        Function::DcAmps,
        Function::AcAmps,
        Function::DbVolts,
        Function::DbAmps,
        Function::OffsetCompOhms,
    ],
    ranges: &[
        ["auto VDC", "300 mVDC", "3 VDC", "30 VDC", "300 VDC", "300 VDC", "300 VDC", "300 VDC"],
        ["auto VAC", "300 mVAC", "3 VAC", "30 VAC", "300 VAC", "300 VAC", "300 VAC", "300 VAC"],
        ["auto Ohm", "300 Ohm", "3 kOhm", "30 kOhm", "300 kOhm", "3 MOhm", "30 MOhm", "300 MOhm"],
        ["auto ADC", "300 uADC", "3 mADC", "30 mADC", "300 mADC", "3 ADC", "3 ADC", "3 ADC"],
        ["auto AAC", "300 uAAC", "3 mAAC", "30 mAAC", "300 mAAC", "3 AAC", "3 AAC", "3 AAC"],
        ["auto dBV"; 8],
        ["auto dBA"; 8],
        ["auto Ohm", "300 Ohm", "3 kOhm", "30 kOhm", "30 kOhm", "30 kOhm", "30 kOhm", "30 kOhm"],
    ],
    filter: FilterKind::Digital { max: 99 },
    prefixes: &[
        ("DCV", Unit::VoltsDc),
        ("ACV", Unit::VoltsAc),
        ("OHM", Unit::Ohms),
        ("OCO", Unit::Ohms),
        ("DCI", Unit::AmpsDc),
        ("ACI", Unit::AmpsAc),
        ("dBV", Unit::DbVolts),
        ("dBI", Unit::DbAmps),
    ],
    status_layout: &[
        FieldSpan::new(F::AutocalMux, 3, 1),
        FieldSpan::new(F::ReadingMode, 4, 1),
        FieldSpan::new(F::Function, 5, 1),
        FieldSpan::new(F::DataFormat, 6, 1),
        FieldSpan::new(F::SelfTest, 7, 1),
        FieldSpan::new(F::EoiBusHoldoff, 8, 1),
        FieldSpan::new(F::SrqMask, 9, 2),
        FieldSpan::new(F::ExpFilter, 11, 1),
        FieldSpan::new(F::Filter, 12, 2),
        FieldSpan::new(F::DataStoreRate, 14, 6),
        FieldSpan::new(F::Range, 20, 1),
        FieldSpan::new(F::Rate, 21, 1),
        FieldSpan::new(F::Trigger, 22, 1),
        FieldSpan::new(F::Delay, 23, 5),
        FieldSpan::new(F::Terminator, 28, 1),
        FieldSpan::new(F::Zero, 29, 1),
        FieldSpan::new(F::CalSwitch, 30, 1),
    ],
};

static KEITHLEY_199: ModelDescriptor = ModelDescriptor {
    name: "Keithley 199",
    id: "199",
    status_len: 34,
    default_address: 1,
    functions: &[
        Function::DcVolts,
        Function::AcVolts,
        Function::Ohms,
        Function::DcAmps,
        Function::AcAmps,
        Function::DbVolts,
        Function::DbAmps,
    ],
    ranges: &[
        ["auto VDC", "300 mVDC", "3 VDC", "30 VDC", "300 VDC", "300 VDC", "300 VDC", "300 VDC"],
        ["auto VAC", "300 mVAC", "3 VAC", "30 VAC", "300 VAC", "300 VAC", "300 VAC", "300 VAC"],
        ["auto Ohm", "300 Ohm", "3 kOhm", "30 kOhm", "300 kOhm", "3 MOhm", "30 MOhm", "300 MOhm"],
        ["auto ADC", "30 mADC", "3 ADC", "3 ADC", "3 ADC", "3 ADC", "3 ADC", "3 ADC"],
        ["auto AAC", "30 mAAC", "3 AAC", "3 AAC", "3 AAC", "3 AAC", "3 AAC", "3 AAC"],
        ["auto dBV"; 8],
        ["auto dBA"; 8],
    ],
    filter: FilterKind::Mode,
    prefixes: &[
        ("DCV", Unit::VoltsDc),
        ("ACV", Unit::VoltsAc),
        ("OHM", Unit::Ohms),
        ("DCI", Unit::AmpsDc),
        ("ACI", Unit::AmpsAc),
        ("dBV", Unit::DbVolts),
        ("dBI", Unit::DbAmps),
        ("RAT", Unit::Ratio),
    ],
    status_layout: &[
        FieldSpan::new(F::AutocalMux, 3, 1),
        FieldSpan::new(F::ReadingMode, 4, 1),
        FieldSpan::new(F::Function, 5, 1),
        FieldSpan::new(F::DataFormat, 6, 1),
        FieldSpan::new(F::SelfTest, 7, 1),
        FieldSpan::new(F::EoiBusHoldoff, 8, 1),
        FieldSpan::new(F::SrqMask, 9, 2),
        FieldSpan::new(F::Scanner, 11, 2),
        FieldSpan::new(F::PoleRatio, 13, 1),
        FieldSpan::new(F::Filter, 14, 1),
        FieldSpan::new(F::DataStoreRate, 15, 6),
        FieldSpan::new(F::Range, 21, 1),
        FieldSpan::new(F::Rate, 22, 1),
        FieldSpan::new(F::Trigger, 23, 1),
        FieldSpan::new(F::Delay, 24, 6),
        FieldSpan::new(F::Terminator, 30, 1),
        FieldSpan::new(F::Zero, 31, 1),
        FieldSpan::new(F::CalSwitch, 32, 1),
        FieldSpan::new(F::ScannerPresent, 33, 1),
    ],
};
