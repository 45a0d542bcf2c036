//! Tests for the [`StreamChannel`] and the provided methods of the [`Channel`] trait.

use std::{collections::VecDeque, time::Duration};

use rstest::*;

use gpibrs::{Channel, InstrumentError, StreamChannel};

/// Set up an empty channel with the default 3 second timeout.
#[fixture]
fn empt_chan() -> StreamChannel<VecDeque<u8>> {
    StreamChannel::new(VecDeque::new(), Duration::from_secs(3))
}

/// Set up a channel whose pending reply never ends and that has no time to wait for it.
#[fixture]
fn no_term_chan() -> StreamChannel<VecDeque<u8>> {
    StreamChannel::new(VecDeque::from(b"resp".to_vec()), Duration::from_secs(0))
}

#[rstest]
fn test_terminator(mut empt_chan: StreamChannel<VecDeque<u8>>) {
    assert_eq!(empt_chan.get_terminator(), "\n");

    empt_chan.set_terminator("\r\n");
    assert_eq!(empt_chan.get_terminator(), "\r\n");
}

#[rstest]
fn test_timeout(empt_chan: StreamChannel<VecDeque<u8>>) {
    assert_eq!(empt_chan.get_timeout(), Duration::from_secs(3));
}

/// A command is written with the terminator appended.
#[rstest]
fn test_write(mut empt_chan: StreamChannel<VecDeque<u8>>) {
    empt_chan.write("R3X").unwrap();
    let written: Vec<u8> = empt_chan.into_inner().into();
    assert_eq!(written, b"R3X\n");
}

/// Reading removes the terminator, but keeps everything else as received.
#[rstest]
fn test_read_strips_terminator_only() {
    let port = VecDeque::from(b" NDCV+1.2345E+0\r\nNext".to_vec());
    let mut chan = StreamChannel::new(port, Duration::from_secs(3));
    chan.set_terminator("\n");
    assert_eq!(chan.read().unwrap(), " NDCV+1.2345E+0\r");
}

/// A query writes first and then reads what the stream holds after the command.
#[rstest]
fn test_query_echo(mut empt_chan: StreamChannel<VecDeque<u8>>) {
    assert_eq!(empt_chan.query("U1X").unwrap(), "U1X");
}

#[rstest]
fn test_read_timeout(mut no_term_chan: StreamChannel<VecDeque<u8>>) {
    match no_term_chan.read() {
        Err(InstrumentError::Timeout(timeout)) => {
            assert_eq!(timeout, Duration::from_secs(0));
        }
        _ => panic!("Expected timeout error, but got a different result."),
    }
}

#[rstest]
fn test_query_timeout(mut no_term_chan: StreamChannel<VecDeque<u8>>) {
    match no_term_chan.query("U0X") {
        Err(InstrumentError::TimeoutQuery { query, timeout }) => {
            assert_eq!(query, "U0X");
            assert_eq!(timeout, Duration::from_secs(0));
        }
        _ => panic!("Expected timeout error, but got a different result."),
    }
}

/// Running out of bytes before the terminator surfaces as an I/O error.
#[rstest]
fn test_read_eof(mut empt_chan: StreamChannel<VecDeque<u8>>) {
    assert!(matches!(empt_chan.read(), Err(InstrumentError::Io(_))));
}
