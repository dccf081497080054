//! Session setup errors.

use dac_platform::{I2sError, OutOfRangeError};
use thiserror_no_std::Error;

/// Why `begin` failed. The session is never ready after any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DacError {
    /// The requested rate is outside what the DAC accepts. No hardware call
    /// was made.
    #[error("unsupported sample rate: {0}")]
    SampleRate(OutOfRangeError),
    /// The transport refused to install a driver instance.
    #[error("I2S install failed: {0}")]
    Install(I2sError),
    /// Pin routing failed; the just-installed driver was torn down again.
    #[error("I2S pin config failed: {0}")]
    PinConfig(I2sError),
}

impl DacError {
    /// Underlying transport error, if the failure came from the platform.
    pub fn transport_error(&self) -> Option<I2sError> {
        match self {
            Self::SampleRate(_) => None,
            Self::Install(e) | Self::PinConfig(e) => Some(*e),
        }
    }
}
