//! Tests for the Keithley 199 driver.
//!
//! Behavior both models share is covered with the Keithley 196, here we test what differs.

use rstest::*;

use gpibrs::{InstrumentError, LoopbackChannel, LoopbackResourceManager};

use keithley_dmm::*;

// Type alias for the loopback channel with the Keithley 199 driver.
type Keithley199Lbk = Keithley199<LoopbackChannel>;

/// Status word: DC volts, auto range, scanner channel 5, internal filter.
const STATUS: &str = concat!(
    "199", "0", "1", "0", "0", "0", "1", "08", "05", "1", "1", "000100", "0", "1", "6",
    "000250", "2", "0", "0", "1"
);

/// Status word: DC current, 30 mA range, zero with value, front panel filter.
const STATUS_ADC: &str = concat!(
    "199", "0", "1", "3", "0", "0", "1", "08", "05", "1", "2", "000100", "1", "1", "6",
    "000250", "2", "2", "0", "1"
);

/// Build the loopback channel for an instrument, including the initialization commands.
fn crt_lbk(host2inst: Vec<&str>, inst2host: Vec<&str>) -> LoopbackChannel {
    let mut h2i = vec!["G0X".to_string(), "U0X".to_string()];
    h2i.extend(host2inst.iter().map(|s| s.to_string()));
    let mut i2h = vec![STATUS.to_string()];
    i2h.extend(inst2host.iter().map(|s| s.to_string()));
    LoopbackChannel::new(h2i, i2h, "\n")
}

/// Function that creates a new Keithley 199 instance with the given input and output commands.
fn crt_inst(host2inst: Vec<&str>, inst2host: Vec<&str>) -> Keithley199Lbk {
    Keithley199::try_new(crt_lbk(host2inst, inst2host)).unwrap()
}

#[fixture]
fn emp_inst() -> Keithley199Lbk {
    crt_inst(vec![], vec![])
}

#[rstest]
fn test_initialization(emp_inst: Keithley199Lbk) {
    let status = emp_inst.status();
    assert_eq!(status.scanner, Some(5));
    assert_eq!(status.pole_ratio, Some(1));
    assert_eq!(status.scanner_present, Some(1));
    assert_eq!(status.exp_filter, None);
    assert_eq!(status.delay, 250);
    assert_eq!(emp_inst.filter_label(), "INTERNAL");
}

/// A Keithley 196 is not accepted by the Keithley 199 driver.
#[rstest]
fn test_initialization_wrong_model() {
    let status_196 = concat!(
        "196", "0", "1", "0", "0", "0", "1", "08", "1", "10", "000100", "0", "1", "6", "00100",
        "2", "0", "0"
    );
    let lbk = LoopbackChannel::new(
        vec!["G0X".to_string(), "U0X".to_string()],
        vec![status_196.to_string()],
        "\n",
    );
    match Keithley199::try_new(lbk) {
        Err(InstrumentError::UnexpectedModel { expected, response }) => {
            assert_eq!(expected, "199");
            assert_eq!(response, status_196);
        }
        _ => panic!("Expected UnexpectedModel error"),
    }
}

/// The factory default address of the Keithley 199 is 1.
#[rstest]
fn test_open_default() {
    let mut rm = LoopbackResourceManager::new("GPIB0::1::INSTR", crt_lbk(vec![], vec![]));
    let inst = Keithley199::open_default(&mut rm).unwrap();
    assert_eq!(inst.function(), Some(Function::DcVolts));
}

#[rstest]
fn test_open_wrong_address() {
    let mut rm = LoopbackResourceManager::new("GPIB0::1::INSTR", crt_lbk(vec![], vec![]));
    match Keithley199::open(&mut rm, 7, 0) {
        Err(InstrumentError::ResourceNotFound(name)) => assert_eq!(name, "GPIB0::7::INSTR"),
        _ => panic!("Expected ResourceNotFound error"),
    }
    Keithley199::open_default(&mut rm).unwrap();
}

#[rstest]
fn test_read_ratio() {
    let mut inst = crt_inst(vec![], vec!["NRAT+0.4321"]);
    assert_eq!(inst.read().unwrap(), 0.4321);
    assert_eq!(inst.unit(), Some(Unit::Ratio));
}

#[rstest]
fn test_read_measurement() {
    let mut inst = crt_inst(vec![], vec!["NRAT+0.5", "NACV+1.5E-1", "NOHM+1.0E+3"]);
    assert_eq!(inst.read_measurement().unwrap(), DmmMeasurement::Ratio(0.5));
    match inst.read_measurement().unwrap() {
        DmmMeasurement::Voltage(v) => assert!((v.as_volts() - 0.15).abs() < 1e-12),
        m => panic!("Expected a voltage measurement, got {m:?}"),
    }
    match inst.read_measurement().unwrap() {
        DmmMeasurement::Resistance(r) => assert!((r.as_ohms() - 1.0e3).abs() < 1e-9),
        m => panic!("Expected a resistance measurement, got {m:?}"),
    }
}

/// Offset compensated resistance is a Keithley 196 prefix only.
#[rstest]
fn test_read_offset_compensated_unknown() {
    let mut inst = crt_inst(vec![], vec!["NDCV+1.0", "NOCO+150.0"]);
    inst.read().unwrap();
    assert_eq!(inst.read().unwrap(), 150.0);
    assert_eq!(inst.unit(), Some(Unit::VoltsDc));
}

#[rstest]
fn test_read_status() {
    let mut inst = crt_inst(vec!["U0X"], vec![STATUS_ADC]);
    assert_eq!(inst.read_status().unwrap(), STATUS_ADC);
    assert_eq!(inst.function(), Some(Function::DcAmps));
    assert_eq!(inst.range_label(), Some("30 mADC"));
    assert_eq!(inst.zero_mode(), Some(ZeroMode::Value));
    assert_eq!(inst.filter_label(), "FRONT PANEL");
}

#[rstest]
fn test_read_status_wrong_length() {
    let mut inst = crt_inst(vec!["U0X"], vec![&STATUS[..33]]);
    match inst.read_status() {
        Err(InstrumentError::UnexpectedResponseLength {
            expected, actual, ..
        }) => {
            assert_eq!(expected, 34);
            assert_eq!(actual, 33);
        }
        _ => panic!("Expected UnexpectedResponseLength error"),
    }
}

#[rstest]
#[case(0, "F0X", Function::DcVolts)]
#[case(6, "F6X", Function::DbAmps)]
fn test_set_function_index(#[case] idx: i64, #[case] cmd: &str, #[case] exp: Function) {
    let mut inst = crt_inst(vec![cmd], vec![]);
    assert_eq!(inst.set_function(idx).unwrap(), exp);
}

/// The Keithley 199 has no offset compensated resistance function.
#[rstest]
fn test_set_function_index_out_of_range(mut emp_inst: Keithley199Lbk) {
    match emp_inst.set_function(7) {
        Err(InstrumentError::IntValueOutOfRange { value, min, max }) => {
            assert_eq!((value, min, max), (7, 0, 6));
        }
        _ => panic!("Expected IntValueOutOfRange error"),
    }
}

#[rstest]
fn test_set_function_unsupported(mut emp_inst: Keithley199Lbk) {
    assert!(matches!(
        emp_inst.set_function("OCO"),
        Err(InstrumentError::InvalidArgument(_))
    ));
    assert!(matches!(
        emp_inst.set_function(Function::OffsetCompOhms),
        Err(InstrumentError::IntValueOutOfRange { value: 7, .. })
    ));
}

#[rstest]
fn test_set_function_name() {
    let mut inst = crt_inst(vec!["F2X", "F3X"], vec![]);
    assert_eq!(inst.set_function("ohms").unwrap(), Function::Ohms);
    assert_eq!(inst.set_function("DCA").unwrap(), Function::DcAmps);
}

#[rstest]
#[case(0, "P0X")]
#[case(1, "P1X")]
#[case(2, "P2X")]
fn test_set_filter(#[case] n: i64, #[case] cmd: &str) {
    let mut inst = crt_inst(vec![cmd], vec![]);
    inst.set_filter(n).unwrap();
}

#[rstest]
#[case(-1)]
#[case(3)]
#[case(10)]
fn test_set_filter_out_of_range(mut emp_inst: Keithley199Lbk, #[case] n: i64) {
    match emp_inst.set_filter(n) {
        Err(InstrumentError::IntValueOutOfRange { value, min, max }) => {
            assert_eq!((value, min, max), (n, 0, 2));
        }
        _ => panic!("Expected IntValueOutOfRange error"),
    }
}

#[rstest]
#[case(2, -0.5, "V-0.5XZ2X")]
#[case(2, 10.0, "V10.0XZ2X")]
fn test_set_zero_value(#[case] mode: u8, #[case] value: f64, #[case] cmd: &str) {
    let mut inst = crt_inst(vec![cmd], vec![]);
    inst.set_zero(mode, value).unwrap();
}

#[rstest]
fn test_set_display_text() {
    let mut inst = crt_inst(vec!["DSCAN@CH@5X", "DX"], vec![]);
    inst.set_display_text("scan ch 5").unwrap();
    inst.clear_display().unwrap();
}

#[rstest]
fn test_functions(emp_inst: Keithley199Lbk) {
    let functions = emp_inst.functions();
    assert_eq!(functions.len(), 7);
    assert_eq!(functions[2], ("OHM", "Resistance"));
    assert_eq!(functions[6], ("ADB", "Current dB"));
}

#[rstest]
fn test_valid_ranges() {
    let mut inst = crt_inst(vec!["U0X"], vec![STATUS_ADC]);
    assert_eq!(
        inst.valid_ranges().unwrap(),
        vec![(0, "auto ADC"), (1, "30 mADC"), (2, "3 ADC")]
    );
}

#[rstest]
fn test_status_summary() {
    let mut inst = crt_inst(vec!["U0X"], vec![STATUS_ADC]);
    let summary = inst.status_summary().unwrap();
    let exp = "--- Keithley 199 status ---\n\
               Function ... A DC\n\
               Range ...... 30 mADC\n\
               Zero ....... USING ZERO VALUE\n\
               Filter ..... FRONT PANEL";
    assert_eq!(format!("{summary}"), exp);
}
