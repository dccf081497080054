//! PCM5102A session over a platform I2S transport.
//!
//! The PCM5102A has no control interface: once BCK, LRCK and DIN toggle it
//! plays. Everything this driver does is therefore transport plumbing. It
//! installs the platform driver, routes pins, retunes the clock and then
//! forwards PCM bytes until [`Pcm5102a::end`].
//!
//! # Lifecycle
//!
//! ```text
//!            begin() ok
//! [NotReady] ──────────► [Ready] ──write()/clear()──► [Ready]
//!     ▲    ◄──────────────  │
//!     │        end()/drop   │
//!     └── begin() error ◄───┘ (begin while ready restarts)
//! ```
//!
//! In `NotReady` every operation returns its failure value without calling
//! the transport.
//!
//! # Pacing
//!
//! [`Pcm5102a::write`] waits without bound for room in the DMA ring, so a
//! producer calling it in a loop runs at the sample rate. That pacing is a
//! property of the transport's queue, not of this code.

use dac_platform::{
    BitsPerSample, ChannelFormat, I2sConfig, I2sError, I2sPort, I2sTransport, SampleRateHz, Wait,
};
use embassy_time::Duration;

use crate::config::DacConfig;
use crate::error::DacError;
use crate::pins::PIN_CONFIG;
use crate::report::InitReport;
use crate::stats::WriteStats;

/// PCM5102A DAC driver.
///
/// Owns its transport handle. Pass `&mut transport` to keep access to the
/// transport after the session is dropped.
pub struct Pcm5102a<T: I2sTransport> {
    transport: T,
    port: I2sPort,
    sample_rate: SampleRateHz,
    /// `Some` exactly while the session is ready.
    active: Option<I2sConfig>,
    stats: WriteStats,
}

impl<T: I2sTransport> Pcm5102a<T> {
    /// Create a not-ready session on the default port (I2S0).
    pub fn new(transport: T) -> Self {
        Self::with_port(transport, I2sPort::default())
    }

    /// Create a not-ready session on `port`.
    pub fn with_port(transport: T, port: I2sPort) -> Self {
        Self {
            transport,
            port,
            sample_rate: SampleRateHz::CD,
            active: None,
            stats: WriteStats::default(),
        }
    }

    /// Install the transport and start the DAC stream.
    ///
    /// Master transmit, standard I2S, 8 DMA buffers of 1024 frames. A failure
    /// to set the exact rate is logged and tolerated.
    ///
    /// # Errors
    ///
    /// - [`DacError::SampleRate`] if `rate_hz` is out of range (no hardware call)
    /// - [`DacError::Install`] if the transport refuses the configuration
    /// - [`DacError::PinConfig`] if pin routing fails (driver is uninstalled again)
    pub fn begin(
        &mut self,
        rate_hz: u32,
        bits_per_sample: BitsPerSample,
        channel_format: ChannelFormat,
    ) -> Result<(), DacError> {
        let config = DacConfig::new(rate_hz, bits_per_sample, channel_format).map_err(|e| {
            error!("PCM5102A rejected sample rate: {}", e);
            DacError::SampleRate(e)
        })?;
        self.begin_with(config)
    }

    /// [`begin`](Self::begin) with a prepared configuration.
    pub fn begin_with(&mut self, config: DacConfig) -> Result<(), DacError> {
        if self.is_ready() {
            debug!("PCM5102A already running on {}, restarting", self.port);
            self.end();
        }

        let i2s_config = config.to_i2s_config();
        self.sample_rate = config.sample_rate;

        if let Err(e) = self.transport.install(self.port, &i2s_config) {
            error!("I2S install failed: {} ({})", e, e.code());
            return Err(DacError::Install(e));
        }

        if let Err(e) = self.transport.set_pins(self.port, &PIN_CONFIG) {
            error!("I2S pin config failed: {} ({})", e, e.code());
            if let Err(teardown) = self.transport.uninstall(self.port) {
                warn!(
                    "I2S uninstall after pin failure failed: {} ({})",
                    teardown,
                    teardown.code()
                );
            }
            return Err(DacError::PinConfig(e));
        }

        if let Err(e) = self.transport.set_sample_rate(self.port, config.sample_rate) {
            warn!("I2S set sample rate failed: {} ({})", e, e.code());
        }

        if let Err(e) = self.transport.zero_dma_buffer(self.port) {
            warn!("I2S zero DMA buffer failed: {} ({})", e, e.code());
        }

        self.active = Some(i2s_config);
        self.stats = WriteStats::default();

        let report = InitReport::new(&i2s_config);
        info!("PCM5102A initialized");
        info!("  Sample Rate: {} Hz", report.sample_rate_hz);
        info!("  Bits: {}", report.bits);
        info!("  Channels: {}", report.channels);
        info!(
            "  DMA: {} buffers x {} samples",
            report.dma_buf_count,
            report.dma_buf_len
        );
        info!(
            "  Buffer time: {}.{} ms",
            report.buffer_ms(),
            report.buffer_ms_frac()
        );
        Ok(())
    }

    /// Queue `buffer`, waiting as long as it takes for room in the DMA ring.
    ///
    /// Returns the number of bytes accepted: `buffer.len()` on success, 0 when
    /// the session is not ready or the transport failed (the failure is logged).
    pub fn write(&mut self, buffer: &[u8]) -> usize {
        if !self.is_ready() {
            return 0;
        }

        match self.transport.write(self.port, buffer, Wait::Forever) {
            Ok(written) => {
                self.stats.record_write(written);
                written
            }
            Err(e) => {
                error!("I2S write error: {} ({})", e, e.code());
                self.stats.record_error();
                0
            }
        }
    }

    /// Queue `buffer`, giving up after `timeout`.
    ///
    /// A timeout is back-pressure, not an error: the bytes queued before the
    /// deadline are returned and nothing is logged. A zero timeout never
    /// blocks. Other failures are logged and return 0.
    pub fn write_timeout(&mut self, buffer: &[u8], timeout: Duration) -> usize {
        if !self.is_ready() {
            return 0;
        }

        match self.transport.write(self.port, buffer, Wait::For(timeout)) {
            Ok(written) => {
                self.stats.record_write(written);
                written
            }
            Err(I2sError::Timeout { written }) => {
                self.stats.record_timeout(written);
                written
            }
            Err(e) => {
                error!("I2S write error: {} ({})", e, e.code());
                self.stats.record_error();
                0
            }
        }
    }

    /// Silence the output by zeroing the DMA ring, e.g. on pause.
    ///
    /// No-op when not ready.
    pub fn clear(&mut self) {
        if !self.is_ready() {
            return;
        }
        if let Err(e) = self.transport.zero_dma_buffer(self.port) {
            warn!("I2S zero DMA buffer failed: {} ({})", e, e.code());
        }
    }

    /// Uninstall the transport driver. Safe to call repeatedly.
    pub fn end(&mut self) {
        if self.active.take().is_none() {
            return;
        }
        if let Err(e) = self.transport.uninstall(self.port) {
            warn!("I2S uninstall failed: {} ({})", e, e.code());
        }
        debug!("PCM5102A stopped on {}", self.port);
    }

    /// Whether `begin` succeeded and `end` has not been called since.
    pub fn is_ready(&self) -> bool {
        self.active.is_some()
    }

    /// Port this session drives.
    pub fn port(&self) -> I2sPort {
        self.port
    }

    /// Rate requested by the last accepted `begin` (44.1 kHz before any).
    pub fn sample_rate(&self) -> SampleRateHz {
        self.sample_rate
    }

    /// Transport configuration of the running session.
    pub fn config(&self) -> Option<&I2sConfig> {
        self.active.as_ref()
    }

    /// Startup summary of the running session.
    pub fn report(&self) -> Option<InitReport> {
        self.active.as_ref().map(InitReport::new)
    }

    /// Write counters since the last successful `begin`.
    pub fn stats(&self) -> WriteStats {
        self.stats
    }

    /// Shared access to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Exclusive access to the transport.
    ///
    /// Calls made through this bypass the ready-flag bookkeeping.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<T: I2sTransport + Default> Default for Pcm5102a<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: I2sTransport> Drop for Pcm5102a<T> {
    fn drop(&mut self) {
        self.end();
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use dac_platform::mocks::{CallKind, MockI2s};

    fn stereo16(dac: &mut Pcm5102a<&mut MockI2s>) -> Result<(), DacError> {
        dac.begin(44_100, BitsPerSample::Bits16, ChannelFormat::Stereo)
    }

    #[test]
    fn new_is_not_ready_on_port_zero() {
        let mut bus = MockI2s::new();
        let dac = Pcm5102a::new(&mut bus);
        assert!(!dac.is_ready());
        assert_eq!(dac.port(), I2sPort::I2s0);
        assert_eq!(dac.sample_rate().get(), 44_100);
        assert!(dac.config().is_none());
    }

    #[test]
    fn default_owns_its_transport() {
        let mut dac: Pcm5102a<MockI2s> = Pcm5102a::default();
        dac.begin(48_000, BitsPerSample::Bits16, ChannelFormat::MonoLeft)
            .unwrap();
        assert!(dac.transport().is_installed(I2sPort::I2s0));
        dac.end();
        assert_eq!(dac.transport().installed_count(), 0);
    }

    #[test]
    fn begin_issues_calls_in_order() {
        let mut bus = MockI2s::new();
        let mut dac = Pcm5102a::new(&mut bus);
        stereo16(&mut dac).unwrap();
        assert!(dac.is_ready());
        let kinds: Vec<CallKind> = dac.transport().calls().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            [
                CallKind::Install,
                CallKind::SetPins,
                CallKind::SetSampleRate,
                CallKind::ZeroDmaBuffer
            ]
        );
    }

    #[test]
    fn begin_routes_fixed_pins() {
        let mut bus = MockI2s::new();
        let mut dac = Pcm5102a::new(&mut bus);
        stereo16(&mut dac).unwrap();
        let pins = dac.transport().port(I2sPort::I2s0).pins.unwrap();
        assert_eq!(pins, PIN_CONFIG);
    }

    #[test]
    fn install_failure_leaves_not_ready() {
        let mut bus = MockI2s::new();
        bus.fail_next(CallKind::Install, I2sError::NoMemory);
        let mut dac = Pcm5102a::new(&mut bus);
        assert_eq!(stereo16(&mut dac), Err(DacError::Install(I2sError::NoMemory)));
        assert!(!dac.is_ready());
        assert_eq!(dac.transport().count(CallKind::SetPins), 0);
    }

    #[test]
    fn pin_failure_uninstalls() {
        let mut bus = MockI2s::new();
        bus.fail_next(CallKind::SetPins, I2sError::InvalidArg);
        let mut dac = Pcm5102a::new(&mut bus);
        assert_eq!(
            stereo16(&mut dac),
            Err(DacError::PinConfig(I2sError::InvalidArg))
        );
        assert!(!dac.is_ready());
        assert_eq!(dac.transport().installed_count(), 0);
        assert_eq!(dac.transport().uninstall_calls(), 1);
    }

    #[test]
    fn rate_failure_is_not_fatal() {
        let mut bus = MockI2s::new();
        bus.fail_next(CallKind::SetSampleRate, I2sError::NotFound);
        let mut dac = Pcm5102a::new(&mut bus);
        stereo16(&mut dac).unwrap();
        assert!(dac.is_ready());
        assert_eq!(dac.transport().count(CallKind::ZeroDmaBuffer), 1);
    }

    #[test]
    fn invalid_rate_touches_no_hardware() {
        let mut bus = MockI2s::new();
        let mut dac = Pcm5102a::new(&mut bus);
        let err = dac
            .begin(0, BitsPerSample::Bits16, ChannelFormat::Stereo)
            .unwrap_err();
        assert!(matches!(err, DacError::SampleRate(_)));
        assert!(dac.transport().calls().is_empty());
    }

    #[test]
    fn write_forwards_and_counts() {
        let mut bus = MockI2s::new();
        let mut dac = Pcm5102a::new(&mut bus);
        stereo16(&mut dac).unwrap();
        assert_eq!(dac.write(&[0u8; 1024]), 1024);
        assert_eq!(dac.stats().writes, 1);
        assert_eq!(dac.stats().bytes, 1024);
    }

    #[test]
    fn write_error_returns_zero_and_counts() {
        let mut bus = MockI2s::new();
        let mut dac = Pcm5102a::new(&mut bus);
        stereo16(&mut dac).unwrap();
        dac.transport_mut()
            .fail_next(CallKind::Write, I2sError::Fail(-1));
        assert_eq!(dac.write(&[0u8; 16]), 0);
        assert_eq!(dac.stats().errors, 1);
        assert!(dac.is_ready(), "a failed write does not end the session");
    }

    #[test]
    fn timed_write_returns_partial_count() {
        let mut bus = MockI2s::new();
        let mut dac = Pcm5102a::new(&mut bus);
        stereo16(&mut dac).unwrap();
        let capacity = dac.config().unwrap().dma_capacity_bytes() as usize;
        dac.transport_mut().fill(I2sPort::I2s0);
        dac.transport_mut().drain(I2sPort::I2s0, 100);
        assert_eq!(dac.write_timeout(&vec![0u8; capacity], Duration::from_millis(5)), 100);
        let stats = dac.stats();
        assert_eq!((stats.timeouts, stats.errors, stats.bytes), (1, 0, 100));
    }

    #[test]
    fn clear_zeroes_ring_when_ready() {
        let mut bus = MockI2s::new();
        let mut dac = Pcm5102a::new(&mut bus);
        stereo16(&mut dac).unwrap();
        dac.write(&[1u8; 64]);
        dac.clear();
        let state = dac.transport().port(I2sPort::I2s0);
        assert_eq!(state.queued, 0);
        assert_eq!(state.zero_count, 2);
    }

    #[test]
    fn begin_while_ready_restarts_once() {
        let mut bus = MockI2s::new();
        let mut dac = Pcm5102a::new(&mut bus);
        stereo16(&mut dac).unwrap();
        dac.begin(48_000, BitsPerSample::Bits32, ChannelFormat::Stereo)
            .unwrap();
        assert_eq!(dac.sample_rate().get(), 48_000);
        assert_eq!(dac.transport().installed_count(), 1);
        assert_eq!(dac.transport().uninstall_calls(), 1);
    }

    #[test]
    fn begin_resets_stats() {
        let mut bus = MockI2s::new();
        let mut dac = Pcm5102a::new(&mut bus);
        stereo16(&mut dac).unwrap();
        dac.write(&[0u8; 8]);
        dac.end();
        stereo16(&mut dac).unwrap();
        assert_eq!(dac.stats(), WriteStats::default());
    }

    #[test]
    fn report_reflects_active_config() {
        let mut bus = MockI2s::new();
        let mut dac = Pcm5102a::new(&mut bus);
        assert!(dac.report().is_none());
        stereo16(&mut dac).unwrap();
        let report = dac.report().unwrap();
        assert_eq!(report.sample_rate_hz, 44_100);
        assert_eq!(report.channels, 2);
    }

    /// Transport whose unbounded writes stop halfway without an error.
    #[derive(Default)]
    struct HalfWrites(MockI2s);

    impl I2sTransport for HalfWrites {
        fn install(&mut self, port: I2sPort, config: &I2sConfig) -> Result<(), I2sError> {
            self.0.install(port, config)
        }
        fn set_pins(&mut self, port: I2sPort, pins: &dac_platform::PinConfig) -> Result<(), I2sError> {
            self.0.set_pins(port, pins)
        }
        fn set_sample_rate(&mut self, port: I2sPort, rate: SampleRateHz) -> Result<(), I2sError> {
            self.0.set_sample_rate(port, rate)
        }
        fn zero_dma_buffer(&mut self, port: I2sPort) -> Result<(), I2sError> {
            self.0.zero_dma_buffer(port)
        }
        fn write(&mut self, port: I2sPort, data: &[u8], wait: Wait) -> Result<usize, I2sError> {
            let half = data.get(..data.len() / 2).unwrap_or_default();
            self.0.write(port, half, wait)
        }
        fn uninstall(&mut self, port: I2sPort) -> Result<(), I2sError> {
            self.0.uninstall(port)
        }
    }

    #[test]
    fn short_unbounded_write_counts_as_completed() {
        let mut dac: Pcm5102a<HalfWrites> = Pcm5102a::default();
        dac.begin(44_100, BitsPerSample::Bits16, ChannelFormat::Stereo)
            .unwrap();
        assert_eq!(dac.write(&[0u8; 64]), 32);
        let stats = dac.stats();
        assert_eq!((stats.writes, stats.bytes, stats.errors), (1, 32, 0));
    }

    #[test]
    fn drop_uninstalls() {
        let mut bus = MockI2s::new();
        {
            let mut dac = Pcm5102a::with_port(&mut bus, I2sPort::I2s1);
            stereo16(&mut dac).unwrap();
        }
        assert!(!bus.is_installed(I2sPort::I2s1));
        assert_eq!(bus.uninstall_calls(), 1);
    }
}
