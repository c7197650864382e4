//! Certificate serial numbers

use std::fmt;

use rcgen::SerialNumber;

use crate::error::{PkiError, Result};

/// Positive serial number drawn uniformly from the 32-bit range
///
/// Uniqueness is only probabilistic; collisions within one CA's lifetime are
/// tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Serial(u32);

impl Serial {
    /// Draw a new serial from the OS random source
    pub fn random() -> Result<Self> {
        loop {
            let value =
                getrandom::u32().map_err(|e| PkiError::entropy("serial number generation", e))?;
            if value != 0 {
                return Ok(Self(value));
            }
        }
    }

    /// Numeric value
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<Serial> for SerialNumber {
    fn from(serial: Serial) -> Self {
        SerialNumber::from(u64::from(serial.0))
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0.to_be_bytes()))
    }
}
