//! Startup summary printed after a successful `begin`.

use core::fmt;

use dac_platform::I2sConfig;

/// Snapshot of the active stream layout.
///
/// `Display` renders the same block the driver logs:
///
/// ```text
/// PCM5102A initialized
///   Sample Rate: 44100 Hz
///   Bits: 16
///   Channels: 2
///   DMA: 8 buffers x 1024 samples
///   Buffer time: 185.8 ms
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitReport {
    /// Frame rate in Hz.
    pub sample_rate_hz: u32,
    /// Significant bits per sample.
    pub bits: u8,
    /// Interleaved channels.
    pub channels: u8,
    /// DMA buffers in the ring.
    pub dma_buf_count: u16,
    /// Frames per DMA buffer.
    pub dma_buf_len: u16,
    /// Whole-ring playback time in tenths of a millisecond.
    pub buffer_time_tenths_ms: u32,
}

impl InitReport {
    /// Summarise an installed transport configuration.
    pub fn new(config: &I2sConfig) -> Self {
        Self {
            sample_rate_hz: config.sample_rate.get(),
            bits: config.bits_per_sample.bits(),
            channels: config.channel_format.channels(),
            dma_buf_count: config.dma_buf_count,
            dma_buf_len: config.dma_buf_len,
            buffer_time_tenths_ms: config.ring_time_tenths_ms(),
        }
    }

    /// Whole milliseconds of buffered audio.
    pub fn buffer_ms(&self) -> u32 {
        self.buffer_time_tenths_ms / 10
    }

    /// Tenths digit of the buffered time.
    pub fn buffer_ms_frac(&self) -> u32 {
        self.buffer_time_tenths_ms % 10
    }
}

impl fmt::Display for InitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PCM5102A initialized")?;
        writeln!(f, "  Sample Rate: {} Hz", self.sample_rate_hz)?;
        writeln!(f, "  Bits: {}", self.bits)?;
        writeln!(f, "  Channels: {}", self.channels)?;
        writeln!(
            f,
            "  DMA: {} buffers x {} samples",
            self.dma_buf_count, self.dma_buf_len
        )?;
        write!(
            f,
            "  Buffer time: {}.{} ms",
            self.buffer_ms(),
            self.buffer_ms_frac()
        )
    }
}
