//! Bus addresses and the resource names built from them.

use std::fmt::Display;

use crate::InstrumentError;

/// Highest primary address a GPIB device can have.
const MAX_PRIMARY: u8 = 30;

/// Address of an instrument on a GPIB bus.
///
/// An instrument is identified by the board (bus port) it is connected to and its primary
/// address on that board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpibAddress {
    board: u8,
    primary: u8,
}

impl GpibAddress {
    /// Create a new bus address.
    ///
    /// # Arguments
    /// * `primary` - Primary address of the instrument, 0 to 30.
    /// * `board` - Number of the bus board (port) the instrument is connected to.
    pub fn new(primary: u8, board: u8) -> Result<Self, InstrumentError> {
        if primary > MAX_PRIMARY {
            return Err(InstrumentError::IntValueOutOfRange {
                value: primary.into(),
                min: 0,
                max: MAX_PRIMARY.into(),
            });
        }
        Ok(GpibAddress { board, primary })
    }

    /// Primary address of the instrument.
    pub fn primary(&self) -> u8 {
        self.primary
    }

    /// Board the instrument is connected to.
    pub fn board(&self) -> u8 {
        self.board
    }

    /// Resource name of this address, e.g., `"GPIB0::7::INSTR"`.
    pub fn resource_name(&self) -> String {
        format!("GPIB{}::{}::INSTR", self.board, self.primary)
    }
}

impl Display for GpibAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.resource_name())
    }
}
