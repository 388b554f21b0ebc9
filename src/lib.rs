//! This is a platform-agnostic Rust driver for the Si7021 I²C relative humidity and temperature
//! sensor.  It comes in three flavours sharing one set of frame decoders:
//!
//! - [`Si7021`]: async, over the [`embedded-hal-async`] traits.
//! - [`blocking::Si7021`]: blocking, over the [`embedded-hal`] traits.
//! - [`Si7021Sequencer`]: callback-driven, for event-loop platforms whose bus transactions and
//!   timers complete through events rather than futures.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal/tree/master/embedded-hal
//! [`embedded-hal-async`]: https://github.com/rust-embedded/embedded-hal/tree/master/embedded-hal-async
//!
//! This driver allows you to:
//! - Measure relative humidity (no-hold mode, command then read after the conversion time).
//! - Read the temperature captured during the last humidity measurement.
//! - Measure temperature directly.
//! - Read and write the user register (resolution, heater).
//! - Read the electronic serial number and the device identification.
//! - Trigger a software reset.
//!
//! Every checksum the device sends is verified; a mismatch is reported as
//! [`Error::CrcMismatch`] and no value is returned.
//!
//! This driver does not yet support the following device features:
//! - Heater current control register.
//! - Firmware revision readout.
//!
//! ## Features
//!
//! - `async`: Enables the async API.
//! - `blocking`: Enables the blocking API.
//! - `defmt`: Enables logging using the `defmt` framework.
//! - `log`: Enables logging using the `log` framework.
//!
//! ## Supported devices: Si7021 (also identifies Si7013 and Si7020)
//!
//! Datasheet:
//!   [Si7021-A20](https://www.silabs.com/documents/public/data-sheets/Si7021-A20.pdf)
//!
//! ## Async Example:
//!
//! ```ignore
//! use si7021::Si7021;
//!
//! // Platform-specific
//! let i2c = /* embedded_hal_async::i2c::I2c instance */;
//! let delay = /* embedded_hal_async::delay::DelayNs instance */;
//!
//! let mut si7021 = Si7021::new(i2c, delay);
//! let humidity = si7021.read_humidity().await.unwrap();
//! let temperature = si7021.read_temperature().await.unwrap();
//! println!("{:0.1} %RH, {:0.1} °C",
//!     humidity.humidity_percent().unwrap(),
//!     temperature.centigrade().unwrap());
//! ```
//!
//! ## Blocking Example:
//!
//! ```
//! use embedded_hal_mock::eh1::delay::NoopDelay;
//! use embedded_hal_mock::eh1::i2c::{Mock, Transaction};
//! use si7021::{blocking::Si7021, SLAVE_ADDRESS};
//!
//! // Platform-specific, mocked here
//! let expectations = [
//!     Transaction::write(SLAVE_ADDRESS, vec![0xE5]),
//!     Transaction::read(SLAVE_ADDRESS, vec![0x5A, 0x00, 0x09]),
//!     Transaction::write_read(SLAVE_ADDRESS, vec![0xE0], vec![0x68, 0x3A]),
//! ];
//! let mut si7021 = Si7021::new(Mock::new(&expectations), NoopDelay);
//!
//! let humidity = si7021.read_humidity().unwrap();
//! let temperature = si7021.read_temperature().unwrap();
//! println!("{:0.1} %RH, {:0.1} °C",
//!     humidity.humidity_percent().unwrap(),
//!     temperature.centigrade().unwrap());
//!
//! let (mut i2c, _) = si7021.release();
//! i2c.done();
//! ```
//!
//! ## Callback Example:
//!
//! ```ignore
//! use si7021::{RawDatum, Error, Si7021Sequencer};
//!
//! // Platform-specific: a TransferScheduler and a OneShotTimer
//! let mut si7021 = Si7021Sequencer::new(twi_manager, app_timer);
//!
//! si7021.read_humidity(|result: Result<RawDatum, Error<_>>| match result {
//!     Ok(datum) => report(datum.humidity_percent().unwrap()),
//!     Err(e) => report_failure(e),
//! }).unwrap();
//!
//! // Platform event handlers
//! fn on_twi_done(result: Result<&[u8], TwiError>) { si7021.on_transfer_complete(result) }
//! fn on_timer(_: ()) { si7021.on_timer_expired() }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

#[macro_use]
mod fmt;

pub mod checksum;
mod hw_def;
mod protocol;
mod scheduler;
mod sequencer;
mod types;

cfg_if::cfg_if! {
    if #[cfg(feature = "async")] {
        mod device_impl;
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "blocking")] {
        pub mod blocking;
    }
}

pub use crate::{hw_def::*, scheduler::*, sequencer::*, types::*};
