//! The loopback module provides an instrument simulator for testing purposes.
//!
//! The [`LoopbackChannel`] plays back scripted replies and checks every command that a driver
//! writes against the script. The [`LoopbackResourceManager`] hands such a channel out for one
//! expected bus address, which allows to test how a driver opens its channel as well.

use std::collections::VecDeque;

use crate::{Channel, GpibAddress, InstrumentError, ResourceManager};

/// A self-incrementing index structure that by default starts at 0 and increments whenever `next`
/// is called.
#[derive(Debug, Default)]
struct IncrIndex {
    index: usize,
}

impl IncrIndex {
    fn next(&mut self) -> usize {
        let current = self.index;
        self.index += 1;
        current
    }
}

/// A channel that allows you to simply write tests for your instrument driver.
///
/// Provide the commands that are expected from the host, in order, and the replies the
/// instrument sends, in order. Whenever the driver writes something unexpected, the channel
/// panics. When the channel is dropped, it panics if not all commands and replies were used.
///
/// # Example
///
/// ```
/// use gpibrs::{Channel, LoopbackChannel};
///
/// let host2inst = vec!["U1X".to_string()];
/// let inst2host = vec!["00000000".to_string()];
///
/// let mut channel = LoopbackChannel::new(host2inst, inst2host, "\n");
/// assert_eq!(channel.query("U1X").unwrap(), "00000000");
/// ```
#[derive(Debug)]
pub struct LoopbackChannel {
    from_host: Vec<String>,
    from_inst: Vec<String>,
    terminator_exp: String,
    from_host_index: IncrIndex,
    from_inst_index: IncrIndex,
    curr_bytes: VecDeque<u8>,
    terminator: String,
}

impl LoopbackChannel {
    /// Create a new loopback channel with given commands to and from the instrument.
    ///
    /// # Arguments:
    /// * `from_host` - Commands from host to instrument, without terminator.
    /// * `from_inst` - Replies from instrument to host, without terminator.
    /// * `terminator_exp` - The terminator the driver is expected to use.
    pub fn new(from_host: Vec<String>, from_inst: Vec<String>, terminator_exp: &str) -> Self {
        LoopbackChannel {
            from_host,
            from_inst,
            terminator_exp: terminator_exp.to_string(),
            from_host_index: IncrIndex::default(),
            from_inst_index: IncrIndex::default(),
            curr_bytes: VecDeque::new(),
            terminator: "\n".to_string(),
        }
    }

    /// Panic if not all commands and replies of this channel have been used.
    ///
    /// It is automatically called when the [`LoopbackChannel`] is dropped.
    pub fn finalize(&mut self) {
        let from_host_leftover = self.from_host.get(self.from_host_index.next());
        let from_inst_leftover = self.from_inst.get(self.from_inst_index.next());
        if let Some(fil) = from_host_leftover {
            panic!("Leftover expected commands found from host to instrument: {fil}");
        }
        if let Some(fil) = from_inst_leftover {
            panic!("Leftover expected commands found from instrument to host: {fil}");
        }
    }

    fn get_next_from_host(&mut self) -> &str {
        self.from_host
            .get(self.from_host_index.next())
            .expect("No more commands were expected from host to instrument.")
    }

    fn get_next_from_inst(&mut self) -> &str {
        self.from_inst
            .get(self.from_inst_index.next())
            .expect("No more replies were expected from instrument to host.")
    }

    /// Read one byte of the current reply, moving on to the next reply if needed.
    ///
    /// Running out of replies panics, as the driver read more than the test scripted.
    fn read_one_byte(&mut self) -> u8 {
        match self.curr_bytes.pop_front() {
            Some(byte) => byte,
            None => {
                let reply = self.get_next_from_inst().to_string();
                let next = format!("{reply}{}", self.terminator_exp);
                self.curr_bytes = next.into_bytes().into();
                self.read_one_byte()
            }
        }
    }
}

impl Channel for LoopbackChannel {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), InstrumentError> {
        for byte in buf.iter_mut() {
            *byte = self.read_one_byte();
        }
        Ok(())
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), InstrumentError> {
        let cmd = self.get_next_from_host().to_string();
        let exp = format!("{cmd}{}", self.terminator_exp);
        assert_eq!(
            exp.as_bytes(),
            data,
            "Expected command '{exp:?}', got '{:?}'",
            String::from_utf8_lossy(data)
        );
        Ok(())
    }

    fn get_terminator(&self) -> &str {
        self.terminator.as_str()
    }

    fn set_terminator(&mut self, terminator: &str) {
        self.terminator = terminator.to_string();
    }
}

impl Drop for LoopbackChannel {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            self.finalize();
        }
    }
}

/// A resource manager that hands out one [`LoopbackChannel`] for one expected address.
///
/// Opening any other resource, or opening the expected one twice, fails with
/// [`InstrumentError::ResourceNotFound`].
#[derive(Debug)]
pub struct LoopbackResourceManager {
    resource: String,
    channel: Option<LoopbackChannel>,
}

impl LoopbackResourceManager {
    /// Create a new loopback resource manager.
    ///
    /// # Arguments
    /// * `resource` - Resource name that is expected to be opened, e.g., `"GPIB0::7::INSTR"`.
    /// * `channel` - The channel to hand out for it.
    pub fn new(resource: &str, channel: LoopbackChannel) -> Self {
        LoopbackResourceManager {
            resource: resource.to_string(),
            channel: Some(channel),
        }
    }
}

impl ResourceManager for LoopbackResourceManager {
    type Channel = LoopbackChannel;

    fn open(&mut self, address: &GpibAddress) -> Result<LoopbackChannel, InstrumentError> {
        let name = address.resource_name();
        if name != self.resource {
            return Err(InstrumentError::ResourceNotFound(name));
        }
        self.channel
            .take()
            .ok_or(InstrumentError::ResourceNotFound(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incrementing_index() {
        let mut idx = IncrIndex::default();
        assert_eq!(0, idx.next());
        assert_eq!(1, idx.next());
        assert_eq!(2, idx.next());
    }
}
