//! Mock I2S transport for host tests
//!
//! [`MockI2s`] models the driver bookkeeping a real platform does: one
//! installation per port, a bounded DMA ring that fills on writes and empties
//! on [`MockI2s::drain`], and counters that let tests confirm a session left
//! no instance installed. Failures can be injected per call kind.

use embassy_time::Duration;

use crate::audio_types::SampleRateHz;
use crate::error::I2sError;
use crate::i2s::{I2sConfig, I2sPort, I2sTransport, PinConfig, Wait};

/// Maximum number of calls retained in the call log.
pub const CALL_LOG_CAPACITY: usize = 64;

/// Maximum number of pending injected failures.
pub const FAILURE_QUEUE_CAPACITY: usize = 64;

/// Transport operation, used for the call log and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// [`I2sTransport::install`]
    Install,
    /// [`I2sTransport::set_pins`]
    SetPins,
    /// [`I2sTransport::set_sample_rate`]
    SetSampleRate,
    /// [`I2sTransport::zero_dma_buffer`]
    ZeroDmaBuffer,
    /// [`I2sTransport::write`]
    Write,
    /// [`I2sTransport::uninstall`]
    Uninstall,
}

/// One recorded transport call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockCall {
    /// Operation.
    pub kind: CallKind,
    /// Port it targeted.
    pub port: I2sPort,
}

/// Driver state of one port.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortState {
    /// Configuration from the last successful install, cleared on uninstall.
    pub config: Option<I2sConfig>,
    /// Pins from the last successful `set_pins`.
    pub pins: Option<PinConfig>,
    /// Rate from the last successful `set_sample_rate`.
    pub rate: Option<SampleRateHz>,
    /// Bytes waiting in the DMA ring.
    pub queued: usize,
    /// Bytes accepted over the lifetime of the port.
    pub total_written: usize,
    /// Number of times the ring was zeroed.
    pub zero_count: usize,
    /// Unbounded writes that found the ring full and had to wait for DMA.
    pub blocked_writes: usize,
}

impl PortState {
    /// Whether a driver instance is installed.
    pub fn is_installed(&self) -> bool {
        self.config.is_some()
    }

    fn capacity(&self) -> usize {
        self.config
            .map_or(0, |c| usize::try_from(c.dma_capacity_bytes()).unwrap_or(usize::MAX))
    }

    fn free(&self) -> usize {
        self.capacity().saturating_sub(self.queued)
    }
}

/// In-memory I2S transport.
#[derive(Debug, Default)]
pub struct MockI2s {
    ports: [PortState; I2sPort::COUNT],
    failures: heapless::Vec<(CallKind, I2sError), FAILURE_QUEUE_CAPACITY>,
    calls: heapless::Vec<MockCall, CALL_LOG_CAPACITY>,
    install_calls: usize,
    uninstall_calls: usize,
}

impl MockI2s {
    /// Create a mock with every port uninstalled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `kind` call fail with `error`.
    ///
    /// Injections queue up; each is consumed by the first matching call.
    /// Returns `false` if the queue already holds
    /// [`FAILURE_QUEUE_CAPACITY`] injections and this one was not queued.
    pub fn fail_next(&mut self, kind: CallKind, error: I2sError) -> bool {
        self.failures.push((kind, error)).is_ok()
    }

    /// Injected failures not yet consumed.
    pub fn pending_failures(&self) -> usize {
        self.failures.len()
    }

    /// Model the DMA engine consuming up to `bytes` from the ring.
    pub fn drain(&mut self, port: I2sPort, bytes: usize) {
        if let Some(state) = self.ports.get_mut(port.index()) {
            state.queued = state.queued.saturating_sub(bytes);
        }
    }

    /// Fill the ring of an installed port to capacity.
    pub fn fill(&mut self, port: I2sPort) {
        if let Some(state) = self.ports.get_mut(port.index()) {
            state.queued = state.capacity();
        }
    }

    /// State of `port`.
    pub fn port(&self, port: I2sPort) -> PortState {
        self.ports.get(port.index()).copied().unwrap_or_default()
    }

    /// Whether `port` has an installed driver.
    pub fn is_installed(&self, port: I2sPort) -> bool {
        self.port(port).is_installed()
    }

    /// Number of ports with an installed driver.
    pub fn installed_count(&self) -> usize {
        self.ports.iter().filter(|p| p.is_installed()).count()
    }

    /// Successful installs so far.
    pub fn install_calls(&self) -> usize {
        self.install_calls
    }

    /// Successful uninstalls so far.
    pub fn uninstall_calls(&self) -> usize {
        self.uninstall_calls
    }

    /// Every call received, oldest first (at most [`CALL_LOG_CAPACITY`]).
    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    /// Number of logged calls of `kind`.
    pub fn count(&self, kind: CallKind) -> usize {
        self.calls.iter().filter(|c| c.kind == kind).count()
    }

    /// Forget the call log; driver state is kept.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn enter(&mut self, kind: CallKind, port: I2sPort) -> Result<&mut PortState, I2sError> {
        let _ = self.calls.push(MockCall { kind, port });
        if let Some(pos) = self.failures.iter().position(|(k, _)| *k == kind) {
            let (_, err) = self.failures.remove(pos);
            return Err(err);
        }
        self.ports.get_mut(port.index()).ok_or(I2sError::InvalidArg)
    }

    fn installed(&mut self, kind: CallKind, port: I2sPort) -> Result<&mut PortState, I2sError> {
        let state = self.enter(kind, port)?;
        if state.is_installed() {
            Ok(state)
        } else {
            Err(I2sError::InvalidState)
        }
    }
}

impl I2sTransport for MockI2s {
    fn install(&mut self, port: I2sPort, config: &I2sConfig) -> Result<(), I2sError> {
        let state = self.enter(CallKind::Install, port)?;
        if state.is_installed() {
            return Err(I2sError::InvalidState);
        }
        // Only a clock-generating transmitter is modelled.
        if !config.mode.is_master() || !config.mode.is_tx() {
            return Err(I2sError::InvalidArg);
        }
        if config.dma_buf_count < 2 || config.dma_buf_len == 0 {
            return Err(I2sError::InvalidArg);
        }
        *state = PortState {
            config: Some(*config),
            rate: Some(config.sample_rate),
            ..PortState::default()
        };
        self.install_calls = self.install_calls.saturating_add(1);
        Ok(())
    }

    fn set_pins(&mut self, port: I2sPort, pins: &PinConfig) -> Result<(), I2sError> {
        let state = self.installed(CallKind::SetPins, port)?;
        state.pins = Some(*pins);
        Ok(())
    }

    fn set_sample_rate(&mut self, port: I2sPort, rate: SampleRateHz) -> Result<(), I2sError> {
        let state = self.installed(CallKind::SetSampleRate, port)?;
        state.rate = Some(rate);
        Ok(())
    }

    fn zero_dma_buffer(&mut self, port: I2sPort) -> Result<(), I2sError> {
        let state = self.installed(CallKind::ZeroDmaBuffer, port)?;
        state.queued = 0;
        state.zero_count = state.zero_count.saturating_add(1);
        Ok(())
    }

    fn write(&mut self, port: I2sPort, data: &[u8], wait: Wait) -> Result<usize, I2sError> {
        let state = self.installed(CallKind::Write, port)?;
        let free = state.free();
        let accepted = match wait {
            Wait::Forever => {
                if data.len() > free {
                    // DMA frees room while the caller is parked.
                    state.blocked_writes = state.blocked_writes.saturating_add(1);
                    state.queued = state.capacity();
                } else {
                    state.queued = state.queued.saturating_add(data.len());
                }
                data.len()
            }
            Wait::For(_) => {
                let accepted = data.len().min(free);
                state.queued = state.queued.saturating_add(accepted);
                accepted
            }
        };
        state.total_written = state.total_written.saturating_add(accepted);
        if accepted < data.len() {
            Err(I2sError::Timeout { written: accepted })
        } else {
            Ok(accepted)
        }
    }

    fn uninstall(&mut self, port: I2sPort) -> Result<(), I2sError> {
        let state = self.installed(CallKind::Uninstall, port)?;
        *state = PortState::default();
        self.uninstall_calls = self.uninstall_calls.saturating_add(1);
        Ok(())
    }
}

/// Convenience for tests: a bounded wait of `ms` milliseconds.
pub fn wait_ms(ms: u64) -> Wait {
    Wait::For(Duration::from_millis(ms))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::i2s::{BitsPerSample, ChannelFormat, CommFormat, I2sMode, InterruptLevel};

    fn cd_config() -> I2sConfig {
        I2sConfig {
            mode: I2sMode::MasterTx,
            sample_rate: SampleRateHz::CD,
            bits_per_sample: BitsPerSample::Bits16,
            channel_format: ChannelFormat::Stereo,
            comm_format: CommFormat::StandardI2s,
            intr_level: InterruptLevel::Level1,
            dma_buf_count: 2,
            dma_buf_len: 8,
            use_apll: false,
            tx_desc_auto_clear: true,
            fixed_mclk: 0,
        }
    }

    #[test]
    fn double_install_is_rejected() {
        let mut bus = MockI2s::new();
        bus.install(I2sPort::I2s0, &cd_config()).unwrap();
        assert_eq!(
            bus.install(I2sPort::I2s0, &cd_config()),
            Err(I2sError::InvalidState)
        );
        assert_eq!(bus.install_calls(), 1);
        // Other port is independent.
        bus.install(I2sPort::I2s1, &cd_config()).unwrap();
        assert_eq!(bus.installed_count(), 2);
    }

    #[test]
    fn calls_on_uninstalled_port_fail() {
        let mut bus = MockI2s::new();
        assert_eq!(bus.zero_dma_buffer(I2sPort::I2s0), Err(I2sError::InvalidState));
        assert_eq!(
            bus.write(I2sPort::I2s0, &[0; 4], Wait::Forever),
            Err(I2sError::InvalidState)
        );
        assert_eq!(bus.uninstall(I2sPort::I2s0), Err(I2sError::InvalidState));
        assert_eq!(bus.calls().len(), 3);
    }

    #[test]
    fn bounded_write_reports_partial_timeout() {
        let mut bus = MockI2s::new();
        bus.install(I2sPort::I2s0, &cd_config()).unwrap();
        // 2 buffers × 8 frames × 4 bytes = 64 bytes of ring
        assert_eq!(bus.write(I2sPort::I2s0, &[1; 48], wait_ms(10)), Ok(48));
        assert_eq!(
            bus.write(I2sPort::I2s0, &[1; 48], wait_ms(10)),
            Err(I2sError::Timeout { written: 16 })
        );
        assert_eq!(bus.port(I2sPort::I2s0).queued, 64);
        bus.drain(I2sPort::I2s0, 32);
        assert_eq!(bus.write(I2sPort::I2s0, &[1; 32], wait_ms(0)), Ok(32));
    }

    #[test]
    fn unbounded_write_waits_for_dma() {
        let mut bus = MockI2s::new();
        bus.install(I2sPort::I2s0, &cd_config()).unwrap();
        bus.fill(I2sPort::I2s0);
        assert_eq!(bus.write(I2sPort::I2s0, &[0; 16], Wait::Forever), Ok(16));
        assert_eq!(bus.port(I2sPort::I2s0).blocked_writes, 1);
        assert_eq!(bus.port(I2sPort::I2s0).total_written, 16);
    }

    #[test]
    fn zeroing_empties_the_ring() {
        let mut bus = MockI2s::new();
        bus.install(I2sPort::I2s0, &cd_config()).unwrap();
        bus.fill(I2sPort::I2s0);
        bus.zero_dma_buffer(I2sPort::I2s0).unwrap();
        let state = bus.port(I2sPort::I2s0);
        assert_eq!(state.queued, 0);
        assert_eq!(state.zero_count, 1);
    }

    #[test]
    fn injected_failure_is_consumed_once() {
        let mut bus = MockI2s::new();
        bus.fail_next(CallKind::Install, I2sError::NoMemory);
        assert_eq!(
            bus.install(I2sPort::I2s0, &cd_config()),
            Err(I2sError::NoMemory)
        );
        assert!(!bus.is_installed(I2sPort::I2s0));
        bus.install(I2sPort::I2s0, &cd_config()).unwrap();
        assert!(bus.is_installed(I2sPort::I2s0));
    }

    #[test]
    fn uninstall_resets_port() {
        let mut bus = MockI2s::new();
        bus.install(I2sPort::I2s0, &cd_config()).unwrap();
        bus.write(I2sPort::I2s0, &[0; 8], Wait::Forever).unwrap();
        bus.uninstall(I2sPort::I2s0).unwrap();
        assert_eq!(bus.installed_count(), 0);
        assert_eq!(bus.port(I2sPort::I2s0).queued, 0);
        assert_eq!(bus.uninstall_calls(), 1);
        assert_eq!(bus.calls()[2].kind, CallKind::Uninstall);
    }

    #[test]
    fn only_master_tx_installs() {
        let mut bus = MockI2s::new();
        for mode in [I2sMode::MasterRx, I2sMode::SlaveTx, I2sMode::SlaveRx] {
            let cfg = I2sConfig {
                mode,
                ..cd_config()
            };
            assert_eq!(bus.install(I2sPort::I2s0, &cfg), Err(I2sError::InvalidArg));
        }
        assert_eq!(bus.installed_count(), 0);
        bus.install(I2sPort::I2s0, &cd_config()).unwrap();
    }

    #[test]
    fn failure_queue_reports_overflow() {
        let mut bus = MockI2s::new();
        for _ in 0..FAILURE_QUEUE_CAPACITY {
            assert!(bus.fail_next(CallKind::Write, I2sError::Fail(-1)));
        }
        assert!(!bus.fail_next(CallKind::Install, I2sError::NoMemory));
        assert_eq!(bus.pending_failures(), FAILURE_QUEUE_CAPACITY);
        // The dropped injection never fires.
        bus.install(I2sPort::I2s0, &cd_config()).unwrap();
    }

    #[test]
    fn tiny_ring_is_rejected() {
        let mut bus = MockI2s::new();
        let cfg = I2sConfig {
            dma_buf_count: 1,
            ..cd_config()
        };
        assert_eq!(bus.install(I2sPort::I2s0, &cfg), Err(I2sError::InvalidArg));
        assert_eq!(bus.install_calls(), 0);
    }
}
