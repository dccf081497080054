//! Session configuration and the transport configuration derived from it.
//!
//! # DMA sizing
//!
//! The ring is fixed at 8 buffers of 1024 frames. At 44.1 kHz one buffer is
//! ~23 ms of audio and the whole ring ~186 ms:
//!
//! ```text
//! 1024 frames / 44 100 Hz = 23.2 ms per buffer
//! 8 × 23.2 ms             = 185.8 ms queued at most
//! 1024 frames × 4 bytes   = 4096 bytes per buffer (16-bit stereo)
//! ```
//!
//! Longer buffers cut interrupt load but add latency before `clear` takes
//! effect; shorter ones risk underruns when the producer stalls.

use dac_platform::{
    BitsPerSample, ChannelFormat, CommFormat, I2sConfig, I2sMode, InterruptLevel,
    OutOfRangeError, SampleRateHz,
};

/// Number of DMA buffers in the ring.
pub const DMA_BUF_COUNT: u16 = 8;

/// Frames per DMA buffer.
pub const DMA_BUF_LEN: u16 = 1024;

/// Stream parameters for one `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DacConfig {
    /// Frame rate.
    pub sample_rate: SampleRateHz,
    /// Sample width.
    pub bits_per_sample: BitsPerSample,
    /// Channel layout.
    pub channel_format: ChannelFormat,
}

impl DacConfig {
    /// Build a configuration, validating the rate.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] when `rate_hz` is outside what the DAC accepts.
    pub fn new(
        rate_hz: u32,
        bits_per_sample: BitsPerSample,
        channel_format: ChannelFormat,
    ) -> Result<Self, OutOfRangeError> {
        Ok(Self {
            sample_rate: SampleRateHz::new(rate_hz)?,
            bits_per_sample,
            channel_format,
        })
    }

    /// Transport configuration: master transmit, standard I2S, fixed ring.
    pub fn to_i2s_config(&self) -> I2sConfig {
        I2sConfig {
            mode: I2sMode::MasterTx,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            channel_format: self.channel_format,
            comm_format: CommFormat::StandardI2s,
            intr_level: InterruptLevel::Level1,
            dma_buf_count: DMA_BUF_COUNT,
            dma_buf_len: DMA_BUF_LEN,
            use_apll: false,
            // Underruns play silence instead of repeating the last buffer.
            tx_desc_auto_clear: true,
            fixed_mclk: 0,
        }
    }
}

impl Default for DacConfig {
    /// 44.1 kHz, 16-bit, stereo: 4 bytes per frame.
    fn default() -> Self {
        Self {
            sample_rate: SampleRateHz::CD,
            bits_per_sample: BitsPerSample::Bits16,
            channel_format: ChannelFormat::Stereo,
        }
    }
}
