//! Type system enforcement tests for transport configuration types.
//! These types keep a DAC driver from handing the transport a nonsense clock
//! or frame layout.

// ── SampleRateHz ─────────────────────────────────────────────────────────────

#[test]
fn sample_rate_rejects_zero() {
    use dac_platform::SampleRateHz;
    assert!(SampleRateHz::new(0).is_err());
}

#[test]
fn sample_rate_accepts_bounds() {
    use dac_platform::SampleRateHz;
    assert!(SampleRateHz::new(SampleRateHz::MIN_HZ).is_ok());
    assert!(SampleRateHz::new(SampleRateHz::MAX_HZ).is_ok());
}

#[test]
fn sample_rate_rejects_just_outside_bounds() {
    use dac_platform::SampleRateHz;
    assert!(SampleRateHz::new(7_999).is_err());
    assert!(SampleRateHz::new(384_001).is_err());
}

#[test]
fn sample_rate_is_four_bytes() {
    use dac_platform::SampleRateHz;
    // SampleRateHz wraps a u32 — no hidden overhead
    assert_eq!(core::mem::size_of::<SampleRateHz>(), 4);
}

#[test]
fn out_of_range_error_reports_bounds() {
    use dac_platform::SampleRateHz;
    let err = SampleRateHz::new(1_000_000).err();
    let err = err.map(|e| (e.value, e.min, e.max));
    assert_eq!(err, Some((1_000_000, 8_000, 384_000)));
}

// ── BitsPerSample ────────────────────────────────────────────────────────────

#[test]
fn bits_per_sample_discriminants_are_bit_counts() {
    use dac_platform::BitsPerSample;
    assert_eq!(BitsPerSample::Bits16.bits(), 16);
    assert_eq!(BitsPerSample::Bits24.bits(), 24);
    assert_eq!(BitsPerSample::Bits32.bits(), 32);
}

#[test]
fn bits_per_sample_container_is_halfword_aligned() {
    use dac_platform::BitsPerSample;
    for bits in [BitsPerSample::Bits16, BitsPerSample::Bits24, BitsPerSample::Bits32] {
        let container = bits.container_bytes();
        assert_eq!(container % 2, 0, "{bits:?} container must be whole halfwords");
        assert!(u32::from(container) * 8 >= u32::from(bits.bits()));
    }
}

// ── PinConfig ────────────────────────────────────────────────────────────────

#[test]
fn pin_config_default_routes_nothing() {
    use dac_platform::PinConfig;
    let pins = PinConfig::default();
    assert_eq!(pins.mck, None);
    assert_eq!(pins.bck, None);
    assert_eq!(pins.ws, None);
    assert_eq!(pins.data_out, None);
    assert_eq!(pins.data_in, None);
}
