//! Transport error kinds
//!
//! Mirrors the return codes a vendor I2S driver reports. `Timeout` carries the
//! number of bytes that were queued before the deadline, because a bounded
//! write may accept part of the buffer and still time out.

use thiserror_no_std::Error;

/// Error reported by an [`I2sTransport`](crate::I2sTransport) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2sError {
    /// A parameter was rejected (bad port, pin or format).
    #[error("invalid argument")]
    InvalidArg,
    /// The call is not valid in the driver's current state, e.g. installing
    /// twice or writing to an uninstalled port.
    #[error("invalid state")]
    InvalidState,
    /// The driver could not allocate DMA descriptors or buffers.
    #[error("out of memory")]
    NoMemory,
    /// No clock source can produce the requested rate.
    #[error("not found")]
    NotFound,
    /// A bounded wait expired. `written` bytes were queued before it did.
    #[error("timeout after {written} bytes")]
    Timeout {
        /// Bytes accepted before the deadline.
        written: usize,
    },
    /// Any other failure, with the raw platform code.
    #[error("driver failure (code {0})")]
    Fail(i32),
}

impl I2sError {
    /// Raw platform code for this error, using the ESP-IDF numbering the
    /// vendor I2S driver reports (`ESP_FAIL` = -1, `ESP_ERR_*` = 0x101..).
    pub fn code(&self) -> i32 {
        match self {
            Self::NoMemory => 0x101,
            Self::InvalidArg => 0x102,
            Self::InvalidState => 0x103,
            Self::NotFound => 0x105,
            Self::Timeout { .. } => 0x107,
            Self::Fail(code) => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_platform_numbering() {
        assert_eq!(I2sError::InvalidArg.code(), 0x102);
        assert_eq!(I2sError::InvalidState.code(), 0x103);
        assert_eq!(I2sError::Timeout { written: 12 }.code(), 0x107);
        assert_eq!(I2sError::Fail(-1).code(), -1);
    }

    #[test]
    fn display_includes_partial_count() {
        assert_eq!(
            I2sError::Timeout { written: 512 }.to_string(),
            "timeout after 512 bytes"
        );
        assert_eq!(I2sError::Fail(-1).to_string(), "driver failure (code -1)");
    }
}
