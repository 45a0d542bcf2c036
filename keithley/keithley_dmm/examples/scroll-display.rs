//! This example scrolls a message through the display of a Keithley 196.
//!
//! The instrument is reached through a bus bridge that forwards a raw TCP socket to the GPIB
//! address of the instrument, e.g., a Prologix GPIB-ETHERNET controller in device mode.
//!
//! Usage: `cargo run --example scroll-display -- [HOST:PORT] [PASSES] [MESSAGE]`

use std::{env, net::TcpStream, thread, time::Duration};

use gpibrs::StreamChannel;
use keithley_dmm::{Keithley196, display::scroll_frames};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let host = args.next().unwrap_or("192.168.1.2:1234".to_string());
    let passes: usize = args.next().map_or(3, |n| n.parse().expect("PASSES must be a number"));
    let message = args
        .next()
        .unwrap_or("--- INITIATE THE RELEASE OF MAGIC SMOKE ---".to_string());

    // Get our channel to the instrument
    let stream = TcpStream::connect(&host).expect("Failed to connect to the bus bridge");
    let channel = StreamChannel::new(stream, Duration::from_secs(3));

    // Now we can open the Keithley 196 with this channel.
    let mut inst = Keithley196::try_new(channel).unwrap();

    for _ in 0..passes {
        for frame in scroll_frames(&message) {
            inst.set_display_text(&frame).unwrap();
            thread::sleep(Duration::from_millis(100));
        }
    }

    // Back to showing readings
    inst.clear_display().unwrap();
}
