//! Property-based tests for the session state machine.
//! Random operation sequences, with random transport failures, must never
//! leak a driver instance or desynchronise the ready flag.
#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use dac_platform::mocks::{CallKind, MockI2s};
use embassy_time::Duration;
use pcm5102a::{BitsPerSample, ChannelFormat, I2sError, I2sPort, Pcm5102a};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Begin(u32),
    Write(usize),
    WriteTimeout(usize, u64),
    Drain(usize),
    Clear,
    End,
    Fail(CallKind),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop_oneof![Just(8_000u32), Just(44_100), Just(48_000), 0u32..500_000].prop_map(Op::Begin),
        (0usize..8192).prop_map(Op::Write),
        (0usize..8192, 0u64..50).prop_map(|(len, ms)| Op::WriteTimeout(len, ms)),
        (0usize..40_000).prop_map(Op::Drain),
        Just(Op::Clear),
        Just(Op::End),
        prop_oneof![
            Just(CallKind::Install),
            Just(CallKind::SetPins),
            Just(CallKind::SetSampleRate),
            Just(CallKind::ZeroDmaBuffer),
            Just(CallKind::Write),
            Just(CallKind::Uninstall),
        ]
        .prop_map(Op::Fail),
    ]
}

fn port_strategy() -> impl Strategy<Value = I2sPort> {
    prop_oneof![Just(I2sPort::I2s0), Just(I2sPort::I2s1)]
}

proptest! {
    /// The session is only ready while its port has a driver installed, and
    /// at most one driver is ever installed.
    #[test]
    fn ready_tracks_installation(
        port in port_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let mut bus = MockI2s::new();
        let mut dac = Pcm5102a::with_port(&mut bus, port);
        let data = vec![0u8; 8192];
        let mut uninstall_may_fail = false;

        for op in ops {
            match op {
                Op::Begin(hz) => {
                    let _ = dac.begin(hz, BitsPerSample::Bits16, ChannelFormat::Stereo);
                }
                Op::Write(len) => {
                    let was_ready = dac.is_ready();
                    let written = dac.write(&data[..len]);
                    prop_assert!(written == len || written == 0);
                    if !was_ready {
                        prop_assert_eq!(written, 0);
                    }
                }
                Op::WriteTimeout(len, ms) => {
                    let written = dac.write_timeout(&data[..len], Duration::from_millis(ms));
                    prop_assert!(written <= len);
                }
                Op::Drain(bytes) => dac.transport_mut().drain(port, bytes),
                Op::Clear => dac.clear(),
                Op::End => dac.end(),
                Op::Fail(kind) => {
                    uninstall_may_fail |= kind == CallKind::Uninstall;
                    prop_assert!(dac.transport_mut().fail_next(kind, I2sError::Fail(-1)));
                }
            }

            // An uninstall failure leaves the mock's driver in place while the
            // session has already let go of it; that is the only way the two
            // views may disagree.
            let installed = dac.transport().is_installed(port);
            if dac.is_ready() {
                prop_assert!(installed);
            }
            prop_assert!(dac.transport().installed_count() <= 1);
        }

        drop(dac);
        if !uninstall_may_fail {
            prop_assert_eq!(bus.installed_count(), 0);
        }
    }

    /// Bytes counted by the session match what the transport accepted.
    #[test]
    fn stats_match_transport(lens in prop::collection::vec(0usize..4096, 0..60)) {
        let mut bus = MockI2s::new();
        let mut dac = Pcm5102a::new(&mut bus);
        dac.begin(44_100, BitsPerSample::Bits16, ChannelFormat::Stereo).unwrap();
        let data = vec![0u8; 4096];

        for (i, len) in lens.iter().enumerate() {
            if i % 3 == 0 {
                dac.write_timeout(&data[..*len], Duration::from_ticks(0));
            } else {
                dac.write(&data[..*len]);
            }
        }

        let total = dac.transport().port(I2sPort::I2s0).total_written;
        prop_assert_eq!(dac.stats().bytes, total as u64);
        prop_assert_eq!(dac.stats().errors, 0);
    }
}
