//! Module that decodes the status word the instrument sends on `U0X`.

use gpibrs::InstrumentError;

use crate::model::ModelDescriptor;

/// The fields of the status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusField {
    /// Auto-calibration / multiplexer.
    AutocalMux,
    /// Reading mode.
    ReadingMode,
    /// Measurement function.
    Function,
    /// Data format.
    DataFormat,
    /// Self test.
    SelfTest,
    /// EOI and bus hold-off.
    EoiBusHoldoff,
    /// SRQ mask, two digits.
    SrqMask,
    /// Exponential filter (Keithley 196 only).
    ExpFilter,
    /// Scanner channel, two digits (Keithley 199 only).
    Scanner,
    /// Pole / ratio setting (Keithley 199 only).
    PoleRatio,
    /// Filter setting.
    Filter,
    /// Data store rate, six digits.
    DataStoreRate,
    /// Range.
    Range,
    /// Integration rate.
    Rate,
    /// Trigger mode.
    Trigger,
    /// Trigger delay.
    Delay,
    /// Terminator.
    Terminator,
    /// Zero mode.
    Zero,
    /// Calibration switch.
    CalSwitch,
    /// Scanner present (Keithley 199 only).
    ScannerPresent,
}

/// Position of one field in the status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    /// The field.
    pub field: StatusField,
    /// Offset of the first digit.
    pub start: usize,
    /// Number of digits.
    pub len: usize,
}

impl FieldSpan {
    pub(crate) const fn new(field: StatusField, start: usize, len: usize) -> Self {
        FieldSpan { field, start, len }
    }
}

/// The decoded status word of the instrument.
///
/// Fields that only one of the models reports are `None` for the other model.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusWord {
    /// Auto-calibration / multiplexer state.
    pub autocal_mux: u32,
    /// Reading mode.
    pub reading_mode: u32,
    /// Function number, see [`crate::Function::from_code`].
    pub function: u32,
    /// Data format.
    pub data_format: u32,
    /// Self test state.
    pub self_test: u32,
    /// EOI and bus hold-off.
    pub eoi_bus_holdoff: u32,
    /// SRQ mask.
    pub srq_mask: u32,
    /// Exponential filter (Keithley 196 only).
    pub exp_filter: Option<u32>,
    /// Scanner channel (Keithley 199 only).
    pub scanner: Option<u32>,
    /// Pole / ratio setting (Keithley 199 only).
    pub pole_ratio: Option<u32>,
    /// Filter setting. Number of readings on the 196, filter mode on the 199.
    pub filter: u32,
    /// Data store rate.
    pub data_store_rate: u32,
    /// Range number.
    pub range: u32,
    /// Integration rate.
    pub rate: u32,
    /// Trigger mode.
    pub trigger: u32,
    /// Trigger delay.
    pub delay: u32,
    /// Terminator.
    pub terminator: u32,
    /// Zero mode, see [`crate::ZeroMode::from_code`].
    pub zero: u32,
    /// Calibration switch.
    pub cal_switch: u32,
    /// Scanner present (Keithley 199 only).
    pub scanner_present: Option<u32>,
}

impl StatusWord {
    /// Decode a status word according to the layout of a model.
    ///
    /// The reply is trimmed first. It must start with the model number and have exactly the
    /// length of the model's status word, otherwise an [`InstrumentError::UnexpectedModel`] or
    /// [`InstrumentError::UnexpectedResponseLength`] is returned. Fields that do not consist of
    /// digits only give an [`InstrumentError::ResponseParseError`].
    pub fn parse(reply: &str, model: &ModelDescriptor) -> Result<Self, InstrumentError> {
        let word = reply.trim();
        if word.get(0..3) != Some(model.id) {
            return Err(InstrumentError::UnexpectedModel {
                expected: model.id.to_string(),
                response: word.to_string(),
            });
        }
        if word.len() != model.status_len {
            return Err(InstrumentError::UnexpectedResponseLength {
                expected: model.status_len,
                actual: word.len(),
                response: word.to_string(),
            });
        }

        let mut status = StatusWord::default();
        for span in model.status_layout {
            let value = word
                .get(span.start..span.start + span.len)
                .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|digits| digits.parse::<u32>().ok())
                .ok_or_else(|| InstrumentError::ResponseParseError(word.to_string()))?;
            status.set(span.field, value);
        }
        Ok(status)
    }

    fn set(&mut self, field: StatusField, value: u32) {
        match field {
            StatusField::AutocalMux => self.autocal_mux = value,
            StatusField::ReadingMode => self.reading_mode = value,
            StatusField::Function => self.function = value,
            StatusField::DataFormat => self.data_format = value,
            StatusField::SelfTest => self.self_test = value,
            StatusField::EoiBusHoldoff => self.eoi_bus_holdoff = value,
            StatusField::SrqMask => self.srq_mask = value,
            StatusField::ExpFilter => self.exp_filter = Some(value),
            StatusField::Scanner => self.scanner = Some(value),
            StatusField::PoleRatio => self.pole_ratio = Some(value),
            StatusField::Filter => self.filter = value,
            StatusField::DataStoreRate => self.data_store_rate = value,
            StatusField::Range => self.range = value,
            StatusField::Rate => self.rate = value,
            StatusField::Trigger => self.trigger = value,
            StatusField::Delay => self.delay = value,
            StatusField::Terminator => self.terminator = value,
            StatusField::Zero => self.zero = value,
            StatusField::CalSwitch => self.cal_switch = value,
            StatusField::ScannerPresent => self.scanner_present = Some(value),
        }
    }
}
