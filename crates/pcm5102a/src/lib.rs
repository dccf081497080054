//! PCM5102A I2S DAC driver
//!
//! The PCM5102A is a hardware-configured stereo DAC: there is no I2C or SPI
//! control port, so bringing it up means nothing more than clocking PCM data
//! into it over I2S. This crate owns that I2S session on top of a platform
//! transport ([`dac_platform::I2sTransport`]).
//!
//! # Wiring
//!
//! ```text
//! GPIO26 → BCK    bit clock
//! GPIO25 → LRCK   word select
//! GPIO27 → DIN    serial data
//!          SCK    tie to GND (internal PLL derives the system clock)
//! ```
//!
//! # Features
//!
//! - `defmt` - log through defmt, derive `defmt::Format` (hardware builds)
//! - `tracing` - log through tracing (host builds)
//! - `std` - `tracing` plus the transport mock for downstream tests
//!
//! # Example
//!
//! ```
//! use dac_platform::mocks::MockI2s;
//! use dac_platform::{BitsPerSample, ChannelFormat};
//! use pcm5102a::Pcm5102a;
//!
//! let mut bus = MockI2s::new();
//! let mut dac = Pcm5102a::new(&mut bus);
//! dac.begin(44_100, BitsPerSample::Bits16, ChannelFormat::Stereo)?;
//!
//! let silence = [0u8; 1024];
//! assert_eq!(dac.write(&silence), silence.len());
//! dac.end();
//! # Ok::<(), pcm5102a::DacError>(())
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

// Must come first so the log macros are visible to every module below.
#[macro_use]
mod fmt;

pub mod config;
pub mod driver;
pub mod error;
pub mod pins;
pub mod report;
pub mod stats;

pub use config::{DacConfig, DMA_BUF_COUNT, DMA_BUF_LEN};
pub use dac_platform::{BitsPerSample, ChannelFormat, I2sError, I2sPort, SampleRateHz};
pub use driver::Pcm5102a;
pub use error::DacError;
pub use pins::{I2S_BCK_PIN, I2S_DATA_PIN, I2S_WS_PIN, PIN_CONFIG};
pub use report::InitReport;
pub use stats::WriteStats;
