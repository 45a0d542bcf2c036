//! A channel over any byte stream.
//!
//! It can be built from any type that implements [`std::io::Read`] and [`std::io::Write`],
//! such as [`std::net::TcpStream`] or an opened device file.

use std::time::Duration;

use crate::{Channel, InstrumentError};

/// A general channel that can be built from any byte stream that implements [`std::io::Read`]
/// and [`std::io::Write`].
///
/// # Example
///
/// A bus bridge that forwards a raw socket to the instrument can be used like this:
///
/// ```no_run
/// use std::{net::TcpStream, time::Duration};
///
/// use gpibrs::{Channel, StreamChannel};
///
/// let stream = TcpStream::connect("192.168.10.1:1234").unwrap();
/// let mut channel = StreamChannel::new(stream, Duration::from_secs(3));
/// channel.write("U0X").unwrap();
/// ```
#[derive(Debug)]
pub struct StreamChannel<P: std::io::Read + std::io::Write> {
    port: P,
    terminator: String,
    timeout: Duration,
}

impl<P: std::io::Read + std::io::Write> StreamChannel<P> {
    /// Create a new [`StreamChannel`] around a byte stream.
    ///
    /// The terminator defaults to `"\n"` and can be changed with [`Channel::set_terminator`].
    ///
    /// # Arguments
    /// * `port` - The byte stream to talk through.
    /// * `timeout` - Timeout for blocking reads.
    pub fn new(port: P, timeout: Duration) -> Self {
        Self {
            port,
            terminator: "\n".to_string(),
            timeout,
        }
    }

    /// Give the underlying byte stream back.
    pub fn into_inner(self) -> P {
        self.port
    }
}

impl<P: std::io::Read + std::io::Write> Channel for StreamChannel<P> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), InstrumentError> {
        self.port.read_exact(buf)?;
        Ok(())
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), InstrumentError> {
        self.port.write_all(data)?;
        self.port.flush()?;
        Ok(())
    }

    fn get_terminator(&self) -> &str {
        self.terminator.as_str()
    }

    fn set_terminator(&mut self, terminator: &str) {
        self.terminator = terminator.to_string();
    }

    fn get_timeout(&self) -> Duration {
        self.timeout
    }
}
