//! Audio domain newtypes for compile-time safety.
//!
//! - `SampleRateHz`: validates the 8000–384000 Hz PCM range of the PCM5102A
//!   family, so an I2S clock is never derived from a nonsense rate

use thiserror_no_std::Error;

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("{value} is outside {min}..={max}")]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

/// Sample rate in Hz, validated to the range the PCM5102A accepts.
///
/// Valid range: 8000–384000 Hz. The DAC derives its system clock from BCK with
/// its internal PLL, so any rate inside this window works without an MCLK line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SampleRateHz(u32);

impl SampleRateHz {
    /// Minimum supported sample rate: 8000 Hz (telephony).
    pub const MIN_HZ: u32 = 8_000;

    /// Maximum supported sample rate: 384000 Hz.
    pub const MAX_HZ: u32 = 384_000;

    /// 44.1 kHz, the rate the host streamer sends by default.
    pub const CD: Self = Self(44_100);

    /// 48 kHz.
    pub const DAT: Self = Self(48_000);

    /// Create a `SampleRateHz`, returning an error if out of 8000–384000 Hz.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz < 8000` or `hz > 384000`.
    pub fn new(hz: u32) -> Result<Self, OutOfRangeError> {
        if (Self::MIN_HZ..=Self::MAX_HZ).contains(&hz) {
            Ok(Self(hz))
        } else {
            Err(OutOfRangeError {
                value: hz,
                min: Self::MIN_HZ,
                max: Self::MAX_HZ,
            })
        }
    }

    /// Return the sample rate in Hz.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for SampleRateHz {
    fn default() -> Self {
        Self::CD
    }
}

impl core::fmt::Display for SampleRateHz {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}
