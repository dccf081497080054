//! Audio transport abstraction for I2S DAC drivers
//!
//! This crate describes the platform audio transport a DAC driver talks to:
//! the vendor-supplied I2S driver that owns the peripheral, its DMA
//! descriptors and its clock tree. DAC drivers program against
//! [`I2sTransport`] and never touch registers themselves.
//!
//! # Architecture Layers
//!
//! ```text
//! Application (streams PCM bytes)
//!         ↓
//! DAC driver (pcm5102a crate: begin / write / clear / end)
//!         ↓
//! Transport seam (this crate: I2sTransport, I2sConfig, PinConfig)
//!         ↓
//! Vendor I2S driver (DMA ring, clock generation)
//! ```
//!
//! # Features
//!
//! - `std`: expose [`mocks`] to downstream host tests
//! - `defmt`: derive `defmt::Format` on all public types
//!
//! # Example
//!
//! ```
//! use dac_platform::{I2sPort, I2sTransport, Wait};
//!
//! fn push<T: I2sTransport>(bus: &mut T, pcm: &[u8]) -> usize {
//!     bus.write(I2sPort::I2s0, pcm, Wait::Forever).unwrap_or(0)
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)] // peripheral and signal names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod audio_types;
pub mod error;
pub mod i2s;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

pub use audio_types::{OutOfRangeError, SampleRateHz};
pub use error::I2sError;
pub use i2s::{
    BitsPerSample, ChannelFormat, CommFormat, I2sConfig, I2sMode, I2sPort, I2sTransport,
    InterruptLevel, PinConfig, Wait,
};
