//! Per-session write counters.

/// What the write path has seen since the last successful `begin`.
///
/// Timeouts and errors are counted separately: a bounded write that runs out
/// of time is ordinary back-pressure, an error is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteStats {
    /// Write calls the transport completed without error.
    pub writes: u32,
    /// Bytes accepted by the transport, including partial timed writes.
    pub bytes: u64,
    /// Bounded writes that hit their deadline.
    pub timeouts: u32,
    /// Writes that failed for any other reason (each one was logged).
    pub errors: u32,
}

impl WriteStats {
    pub(crate) fn record_write(&mut self, bytes: usize) {
        self.writes = self.writes.saturating_add(1);
        self.add_bytes(bytes);
    }

    pub(crate) fn record_timeout(&mut self, bytes: usize) {
        self.timeouts = self.timeouts.saturating_add(1);
        self.add_bytes(bytes);
    }

    pub(crate) fn record_error(&mut self) {
        self.errors = self.errors.saturating_add(1);
    }

    fn add_bytes(&mut self, bytes: usize) {
        let bytes = u64::try_from(bytes).unwrap_or(u64::MAX);
        self.bytes = self.bytes.saturating_add(bytes);
    }
}
