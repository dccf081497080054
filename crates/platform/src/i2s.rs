//! I2S transport seam
//!
//! [`I2sTransport`] is the contract a vendor I2S driver fulfils: install a
//! driver instance on a port with an [`I2sConfig`], route it to pins, retune
//! the clock, zero the DMA ring, queue bytes and uninstall. Everything below
//! that line (descriptor chains, clock dividers, interrupts) belongs to the
//! platform.
//!
//! # DMA ring
//!
//! ```text
//! write() ──► ┌────────┬────────┬─────┬────────┐ ──DMA──► I2S TX ──► DAC
//!             │ buf 0  │ buf 1  │ ... │ buf N-1│
//!             └────────┴────────┴─────┴────────┘
//!              dma_buf_len frames each, dma_buf_count buffers
//! ```
//!
//! A write with [`Wait::Forever`] returns once every byte has a slot in the
//! ring, which paces the caller at the sample rate. [`Wait::For`] gives up at
//! the deadline and reports how much was queued.

use embassy_time::Duration;

use crate::audio_types::SampleRateHz;
use crate::error::I2sError;

// ── Port ─────────────────────────────────────────────────────────────────────

/// I2S peripheral instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2sPort {
    /// First I2S controller (the only one with the internal DAC path).
    #[default]
    I2s0,
    /// Second I2S controller.
    I2s1,
}

impl I2sPort {
    /// Number of I2S controllers on the chip.
    pub const COUNT: usize = 2;

    /// Zero-based controller index.
    pub fn index(self) -> usize {
        match self {
            Self::I2s0 => 0,
            Self::I2s1 => 1,
        }
    }
}

impl core::fmt::Display for I2sPort {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "I2S{}", self.index())
    }
}

// ── Format enums ─────────────────────────────────────────────────────────────

/// Controller role and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2sMode {
    /// Drives BCK/WS and transmits on DATA OUT.
    MasterTx,
    /// Drives BCK/WS and receives on DATA IN.
    MasterRx,
    /// Follows external clocks and transmits.
    SlaveTx,
    /// Follows external clocks and receives.
    SlaveRx,
}

impl I2sMode {
    /// Whether the controller generates the bit and word clocks.
    pub fn is_master(self) -> bool {
        matches!(self, Self::MasterTx | Self::MasterRx)
    }

    /// Whether the controller transmits.
    pub fn is_tx(self) -> bool {
        matches!(self, Self::MasterTx | Self::SlaveTx)
    }
}

/// Sample width on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BitsPerSample {
    /// 16-bit samples.
    Bits16 = 16,
    /// 24-bit samples (carried in 32-bit DMA slots).
    Bits24 = 24,
    /// 32-bit samples.
    Bits32 = 32,
}

impl BitsPerSample {
    /// Significant bits per sample.
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Bytes one sample occupies in the DMA buffer.
    ///
    /// The transport rounds up to whole 16-bit halfwords, so 24-bit samples
    /// take four bytes.
    pub fn container_bytes(self) -> u8 {
        match self {
            Self::Bits16 => 2,
            Self::Bits24 | Self::Bits32 => 4,
        }
    }
}

/// Slot layout of the word-select frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelFormat {
    /// Interleaved right/left stereo.
    #[default]
    Stereo,
    /// One channel, sent in the left slot.
    MonoLeft,
    /// One channel, sent in the right slot.
    MonoRight,
}

impl ChannelFormat {
    /// Number of interleaved channels in the byte stream.
    pub fn channels(self) -> u8 {
        match self {
            Self::Stereo => 2,
            Self::MonoLeft | Self::MonoRight => 1,
        }
    }
}

/// Serial frame format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommFormat {
    /// Philips I2S: data delayed one BCK after the WS edge.
    #[default]
    StandardI2s,
    /// Left-justified (MSB aligned to the WS edge).
    Msb,
    /// PCM short frame sync.
    PcmShort,
    /// PCM long frame sync.
    PcmLong,
}

/// Interrupt priority used for the DMA completion interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptLevel {
    /// Lowest priority.
    #[default]
    Level1,
    /// Medium priority.
    Level2,
    /// Highest priority usable from C handlers.
    Level3,
}

// ── Configuration ────────────────────────────────────────────────────────────

/// Driver configuration handed to [`I2sTransport::install`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sConfig {
    /// Role and direction.
    pub mode: I2sMode,
    /// Frame rate.
    pub sample_rate: SampleRateHz,
    /// Sample width.
    pub bits_per_sample: BitsPerSample,
    /// Slot layout.
    pub channel_format: ChannelFormat,
    /// Frame format.
    pub comm_format: CommFormat,
    /// DMA interrupt priority.
    pub intr_level: InterruptLevel,
    /// Number of DMA buffers in the ring.
    pub dma_buf_count: u16,
    /// Frames per DMA buffer.
    pub dma_buf_len: u16,
    /// Clock from the audio PLL instead of the fractional divider.
    pub use_apll: bool,
    /// Transmit zeros instead of stale data when the ring underruns.
    pub tx_desc_auto_clear: bool,
    /// Fixed MCLK in Hz; 0 derives it from the sample rate.
    pub fixed_mclk: u32,
}

impl I2sConfig {
    /// Bytes per frame: container bytes × channels.
    ///
    /// 16-bit stereo: 4 bytes.
    pub fn bytes_per_frame(&self) -> u32 {
        u32::from(self.bits_per_sample.container_bytes())
            .saturating_mul(u32::from(self.channel_format.channels()))
    }

    /// Size of one DMA buffer in bytes.
    ///
    /// 1024 frames of 16-bit stereo: 4096 bytes.
    pub fn dma_buffer_bytes(&self) -> u32 {
        u32::from(self.dma_buf_len).saturating_mul(self.bytes_per_frame())
    }

    /// Total bytes the DMA ring can hold.
    pub fn dma_capacity_bytes(&self) -> u32 {
        u32::from(self.dma_buf_count).saturating_mul(self.dma_buffer_bytes())
    }

    /// Playback time of one DMA buffer in tenths of a millisecond, rounded.
    pub fn buffer_time_tenths_ms(&self) -> u32 {
        tenths_ms(u64::from(self.dma_buf_len), self.sample_rate)
    }

    /// Playback time of the whole ring in tenths of a millisecond, rounded.
    ///
    /// 8 × 1024 frames at 44.1 kHz: 1858 (185.8 ms).
    pub fn ring_time_tenths_ms(&self) -> u32 {
        let frames = u64::from(self.dma_buf_count).saturating_mul(u64::from(self.dma_buf_len));
        tenths_ms(frames, self.sample_rate)
    }
}

/// `frames / rate` expressed in tenths of a millisecond, rounded to nearest.
fn tenths_ms(frames: u64, rate: SampleRateHz) -> u32 {
    let rate = u64::from(rate.get());
    let scaled = frames
        .saturating_mul(10_000)
        .saturating_add(rate / 2);
    let tenths = scaled.checked_div(rate).unwrap_or(0);
    u32::try_from(tenths).unwrap_or(u32::MAX)
}

/// GPIO routing handed to [`I2sTransport::set_pins`].
///
/// `None` leaves a signal unrouted (the platform's "no change" value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// Master clock output.
    pub mck: Option<u8>,
    /// Bit clock.
    pub bck: Option<u8>,
    /// Word select (LR clock).
    pub ws: Option<u8>,
    /// Serial data out.
    pub data_out: Option<u8>,
    /// Serial data in.
    pub data_in: Option<u8>,
}

/// How long a write may wait for room in the DMA ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wait {
    /// Block until every byte is queued.
    Forever,
    /// Give up after the duration; a zero duration never blocks.
    For(Duration),
}

// ── Transport trait ──────────────────────────────────────────────────────────

/// Platform I2S driver.
///
/// One implementation serves every port; each call names the port it acts on.
/// Implementations enforce single installation per port and report misuse
/// with [`I2sError::InvalidState`].
pub trait I2sTransport {
    /// Install a driver instance on `port` and allocate its DMA ring.
    fn install(&mut self, port: I2sPort, config: &I2sConfig) -> Result<(), I2sError>;

    /// Route the installed instance to GPIOs.
    fn set_pins(&mut self, port: I2sPort, pins: &PinConfig) -> Result<(), I2sError>;

    /// Reprogram the clock dividers for `rate`.
    fn set_sample_rate(&mut self, port: I2sPort, rate: SampleRateHz) -> Result<(), I2sError>;

    /// Fill the DMA ring with silence.
    fn zero_dma_buffer(&mut self, port: I2sPort) -> Result<(), I2sError>;

    /// Queue `data` for transmission and return how many bytes were accepted.
    ///
    /// With [`Wait::For`] a partial write reports
    /// [`I2sError::Timeout`] carrying the accepted count.
    fn write(&mut self, port: I2sPort, data: &[u8], wait: Wait) -> Result<usize, I2sError>;

    /// Stop the instance and free its DMA ring.
    fn uninstall(&mut self, port: I2sPort) -> Result<(), I2sError>;
}

impl<T: I2sTransport + ?Sized> I2sTransport for &mut T {
    fn install(&mut self, port: I2sPort, config: &I2sConfig) -> Result<(), I2sError> {
        T::install(self, port, config)
    }

    fn set_pins(&mut self, port: I2sPort, pins: &PinConfig) -> Result<(), I2sError> {
        T::set_pins(self, port, pins)
    }

    fn set_sample_rate(&mut self, port: I2sPort, rate: SampleRateHz) -> Result<(), I2sError> {
        T::set_sample_rate(self, port, rate)
    }

    fn zero_dma_buffer(&mut self, port: I2sPort) -> Result<(), I2sError> {
        T::zero_dma_buffer(self, port)
    }

    fn write(&mut self, port: I2sPort, data: &[u8], wait: Wait) -> Result<usize, I2sError> {
        T::write(self, port, data, wait)
    }

    fn uninstall(&mut self, port: I2sPort) -> Result<(), I2sError> {
        T::uninstall(self, port)
    }
}
