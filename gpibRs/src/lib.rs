//! GpibRs: text channels for instruments on a GPIB-style bus
//!
//! The GpibRs library provides the small contract an instrument driver needs to talk to a bus
//! instrument: a [`Channel`] that can write a command, block for a reply, and do both in one
//! query, and a [`ResourceManager`] that opens such a channel for a given [`GpibAddress`]. All
//! fallible operations return the shared [`InstrumentError`].
//!
//! # Provided channels
//! - [`StreamChannel`]: any byte stream that implements [`std::io::Read`] and
//!   [`std::io::Write`], e.g., a device file or a socket that a bus bridge exposes.
//! - [`LoopbackChannel`]: a scripted channel to test drivers without hardware, together with the
//!   [`LoopbackResourceManager`] that hands it out.
//!
//! The bus transport itself, i.e., the GPIB controller and its driver, is not part of this
//! crate. Bring your own by implementing [`Channel`] and [`ResourceManager`] for it.
//!
//! # License
//!
//! Licensed under either of
//!
//! - Apache License, Version 2.0 ([LICENSE-APACHE](http://www.apache.org/licenses/LICENSE-2.0))
//! - MIT license ([LICENSE-MIT](http://opensource.org/licenses/MIT))
//!
//! at your option.

#![warn(missing_docs)]

mod address;
mod loopback;
mod stream;

pub use address::GpibAddress;
pub use loopback::{LoopbackChannel, LoopbackResourceManager};
pub use stream::StreamChannel;

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{trace, warn};

/// The error enum for all instruments on the bus.
///
/// Validation errors of drivers, format errors of instrument replies, and errors of the
/// underlying channel all end up here, such that they can be propagated with the `?` operator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InstrumentError {
    /// A given integer value is out of the specified range. The error contains the value that was
    /// sent, the minimum value that is allowed, and the maximum value that is allowed.
    #[error("Integer value {value} is out of range. Allowed range is [{min}, {max}]")]
    IntValueOutOfRange {
        /// The value that is out of range.
        value: i64,
        /// The minimum value that is allowed.
        min: i64,
        /// The maximum value that is allowed.
        max: i64,
    },
    /// Error when an invalid argument is passed to a function. This error contains only an error
    /// message that is intended for the user.
    #[error("{0}")]
    InvalidArgument(String),
    /// Error when reading from/writing to a channel. See [`std::io::Error`] for more details.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// No channel could be opened for the given resource name.
    #[error("No instrument channel available for resource {0}")]
    ResourceNotFound(String),
    /// Instrument response could not be parsed because it was unexpected by the driver. This error
    /// contains the response that was received from the instrument.
    #[error("Response from instrument could not be parsed. Response was: {0}")]
    ResponseParseError(String),
    /// A string argument is longer than the instrument accepts.
    #[error("String '{value}' is too long. Maximum length is {max_len} characters")]
    StringTooLong {
        /// The string that was rejected.
        value: String,
        /// Maximum number of characters.
        max_len: usize,
    },
    /// Timeout occurred while waiting for a reply from the instrument. The error contains the
    /// timeout that was exceeded.
    #[error(
        "Timeout occured while waiting for a response from the instrument. Timeout was set to {0:?}."
    )]
    Timeout(Duration),
    /// Timeout occurred while waiting for a response to a query. The error contains the query
    /// that was sent and the timeout that was exceeded.
    #[error(
        "Timeout occured while waiting for a response to query: {query}. Timeout was set to {timeout:?}."
    )]
    TimeoutQuery {
        /// The query that timed out.
        query: String,
        /// The timeout that was set.
        timeout: Duration,
    },
    /// The reply identifies a different instrument model than the driver talks to.
    #[error("Expected a reply from model {expected}, got: {response}")]
    UnexpectedModel {
        /// Model identifier the driver expects.
        expected: String,
        /// The full reply that was received.
        response: String,
    },
    /// A fixed-width reply does not have the expected length.
    #[error("Expected a reply of {expected} characters, got {actual}: {response}")]
    UnexpectedResponseLength {
        /// Expected number of characters.
        expected: usize,
        /// Number of characters received.
        actual: usize,
        /// The full reply that was received.
        response: String,
    },
}

/// The `Channel` trait is the bidirectional text channel a driver talks through.
///
/// Implementors only have to provide the raw byte access, [`Channel::read_exact`] and
/// [`Channel::write_raw`]. Writing commands, reading terminated replies, and querying are
/// provided on top of these.
///
/// A channel is not reentrant: commands and replies of one instrument must not be interleaved.
/// All methods thus take `&mut self`.
pub trait Channel {
    /// Read exactly enough bytes to fill `buf`, blocking if necessary.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), InstrumentError>;

    /// Write all of `data` to the channel and flush it.
    fn write_raw(&mut self, data: &[u8]) -> Result<(), InstrumentError>;

    /// Get the terminator that ends commands and replies. Defaults to `"\n"`.
    fn get_terminator(&self) -> &str {
        "\n"
    }

    /// Set the terminator of the channel.
    ///
    /// The default implementation ignores the call, channels with a configurable terminator
    /// should override it together with [`Channel::get_terminator`].
    fn set_terminator(&mut self, _terminator: &str) {}

    /// Get the timeout for blocking reads. Defaults to three seconds.
    fn get_timeout(&self) -> Duration {
        Duration::from_secs(3)
    }

    /// Write a command to the instrument.
    ///
    /// The terminator is appended to the command before it is written.
    ///
    /// # Arguments
    /// * `cmd` - The command to send, without terminator.
    fn write(&mut self, cmd: &str) -> Result<(), InstrumentError> {
        let data = format!("{cmd}{}", self.get_terminator());
        self.write_raw(data.as_bytes())
    }

    /// Block until a reply from the instrument is complete and return it.
    ///
    /// The reply is read byte by byte until it ends with the terminator, which is then removed.
    /// Everything else, including surrounding whitespace, is returned as received. Bytes that are
    /// not valid UTF-8 are skipped. If the terminator does not show up within the timeout, a
    /// [`InstrumentError::Timeout`] is returned.
    fn read(&mut self) -> Result<String, InstrumentError> {
        let terminator = self.get_terminator().to_string();
        let timeout = self.get_timeout();
        let mut response = String::new();
        let mut single_buf = [0u8];

        let tic = Instant::now();
        while tic.elapsed() < timeout {
            self.read_exact(&mut single_buf)?;
            match std::str::from_utf8(&single_buf) {
                Ok(val) => response.push_str(val),
                Err(_) => warn!(byte = single_buf[0], "skipping non UTF-8 byte in reply"),
            }
            if let Some(reply) = response.strip_suffix(terminator.as_str()) {
                trace!(reply, "received");
                return Ok(reply.to_string());
            }
        }
        Err(InstrumentError::Timeout(timeout))
    }

    /// Write a command and return the reply of the instrument.
    ///
    /// A timeout while waiting for the reply is reported as [`InstrumentError::TimeoutQuery`]
    /// that contains the command.
    ///
    /// # Arguments
    /// * `cmd` - The command to send, without terminator.
    fn query(&mut self, cmd: &str) -> Result<String, InstrumentError> {
        self.write(cmd)?;
        self.read().map_err(|err| match err {
            InstrumentError::Timeout(timeout) => InstrumentError::TimeoutQuery {
                query: cmd.to_string(),
                timeout,
            },
            err => err,
        })
    }
}

/// A `ResourceManager` opens channels to instruments by their bus address.
///
/// This is the place where a bus transport plugs in. The manager decides how the resource name of
/// a [`GpibAddress`] maps to an actual connection.
pub trait ResourceManager {
    /// The channel type this manager hands out.
    type Channel: Channel;

    /// Open a channel to the instrument at `address`.
    fn open(&mut self, address: &GpibAddress) -> Result<Self::Channel, InstrumentError>;
}
