//! PCM5102A wiring.
//!
//! The DAC needs three lines. SCK is tied to GND on the breakout so the chip
//! derives its system clock from BCK with its internal PLL, which is why no
//! MCLK pin is routed.
//!
//! | Signal | GPIO | PCM5102A pin |
//! |--------|------|--------------|
//! | BCK    | 26   | BCK          |
//! | WS     | 25   | LRCK         |
//! | DATA   | 27   | DIN          |
//! | MCLK   | —    | SCK → GND    |
//!
//! These are board constants, not runtime configuration.

use dac_platform::PinConfig;

/// Bit clock GPIO.
pub const I2S_BCK_PIN: u8 = 26;

/// Word select (LRCK) GPIO.
pub const I2S_WS_PIN: u8 = 25;

/// Serial data out GPIO.
pub const I2S_DATA_PIN: u8 = 27;

/// Pin routing handed to the transport during `begin`.
pub const PIN_CONFIG: PinConfig = PinConfig {
    mck: None,
    bck: Some(I2S_BCK_PIN),
    ws: Some(I2S_WS_PIN),
    data_out: Some(I2S_DATA_PIN),
    data_in: None,
};
