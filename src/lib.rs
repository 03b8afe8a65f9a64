//! DHT11 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the DHT11 temperature
//! and humidity sensor, built on top of the [`embedded-hal`] traits.
//!
//! The sensor answers a start pulse on its single data line with an
//! acknowledgment and 40 data bits whose values are encoded in the length of
//! each high phase. The driver times those phases against a microsecond
//! clock, masks the interrupts that could stretch them, validates the
//! checksum and retries failed transactions.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Temperature in Celsius, Fahrenheit or Kelvin, and running averages of
//!   readings through [`Measurement::combine`]
//! - Unbounded retries by default, bounded by attempts or time with [`Retry`]
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access
//! - [`DelayNs`] for accurate timing
//!
//! It also needs a [`MicroClock`] and an [`InterruptController`] from the
//! platform.
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and logs through `defmt`
//! - `log`: Logs through the `log` facade
//! - `critical-section`: Provides `GlobalInterrupts`, which masks all
//!   interrupts through `critical-section`
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod dht11;
pub mod error;
pub mod interrupt;
pub mod measurement;
pub mod payload;
pub mod retry;
pub mod timing;

pub use dht11::Dht11;
pub use error::DhtError;
#[cfg(feature = "critical-section")]
pub use interrupt::GlobalInterrupts;
pub use interrupt::{InterruptController, NoInterrupts};
pub use measurement::{Measurement, Scale};
pub use payload::Payload;
pub use retry::Retry;
pub use timing::MicroClock;
