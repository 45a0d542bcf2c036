//! This example logs the readings of a Keithley 196 and a Keithley 199 to a CSV file.
//!
//! Both instruments are reached through bus bridges that forward a raw TCP socket to the GPIB
//! address of the instrument. Every second, one reading of each instrument is appended to a file
//! named after the start time, e.g., `Log_2024-01-31_12-00-00.csv`, as:
//!
//! `date; time; value 196; unit 196; value 199; unit 199`
//!
//! Usage: `cargo run --example dual-logger -- [HOST:PORT 196] [HOST:PORT 199] [COUNT]`
//!
//! Without a count, the logger runs until interrupted.

use std::{
    env,
    fs::OpenOptions,
    io::Write,
    net::TcpStream,
    thread,
    time::Duration,
};

use chrono::Local;
use gpibrs::{Channel, StreamChannel};
use keithley_dmm::{Keithley196, Keithley199, KeithleyDmm, Model};

/// Unit of the last reading as text, empty if no reading had a known prefix yet.
fn unit_str<T: Channel, M: Model>(inst: &KeithleyDmm<T, M>) -> String {
    inst.unit().map(|u| u.to_string()).unwrap_or_default()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let host_196 = args.next().unwrap_or("192.168.1.2:1234".to_string());
    let host_199 = args.next().unwrap_or("192.168.1.3:1234".to_string());
    let count: Option<usize> = args
        .next()
        .map(|n| n.parse().expect("COUNT must be a number"));

    let timeout = Duration::from_secs(3);
    let stream_196 = TcpStream::connect(&host_196).expect("Failed to connect to the 196");
    let stream_199 = TcpStream::connect(&host_199).expect("Failed to connect to the 199");
    let mut k196 = Keithley196::try_new(StreamChannel::new(stream_196, timeout)).unwrap();
    let mut k199 = Keithley199::try_new(StreamChannel::new(stream_199, timeout)).unwrap();

    // Open a new log file with the start time in its name
    let fname = Local::now().format("Log_%Y-%m-%d_%H-%M-%S.csv").to_string();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&fname)
        .expect("Failed to open the log file");
    println!("Logging to {fname}, hit ctrl-c to abort.");

    let mut logged = 0;
    while count.is_none_or(|c| logged < c) {
        let now = Local::now();
        let v1 = k196.read().unwrap();
        let v2 = k199.read().unwrap();

        let line = format!(
            "{}; {}; {v1:?}; {}; {v2:?}; {}",
            now.format("%Y-%m-%d"),
            now.format("%H:%M:%S"),
            unit_str(&k196),
            unit_str(&k199),
        );
        writeln!(file, "{line}").expect("Failed to write to the log file");
        println!("{line}");

        logged += 1;
        thread::sleep(Duration::from_secs(1));
    }
}
