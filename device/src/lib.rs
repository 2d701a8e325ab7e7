#![cfg_attr(not(feature = "std"), no_std)]
#![allow(async_fn_in_trait)]
//! Acquisition driver for a CTD (conductivity, temperature, depth) probe on a
//! shared, multiplexed serial line.
//!
//! The crate is built on [embassy](https://github.com/embassy-rs/embassy) and
//! does not allocate. A board wires up the pieces once, usually as statics:
//!
//! * a [`SerialMux`](traits::serial::SerialMux) implementation behind an
//!   `embassy_sync::mutex::Mutex`, shared with the other instruments on the line,
//! * a [`SharedReading`](shared::SharedReading) holding the latest record,
//! * the [`CtdEvents`] the UART interrupt and the scheduler signal,
//! * a [`DataLogger`](traits::logger::DataLogger) and an [`Rtc`](traits::clock::Rtc).
//!
//! [`Ctd::run`] then owns a task of its own, and a [`Trigger`](ticker::Trigger)
//! paces the acquisitions.
//!
//! # Example
//!
//! ```ignore
//! static SERIAL: Mutex<CriticalSectionRawMutex, Uart> = Mutex::new(Uart::new());
//! static READING: SharedReading<CriticalSectionRawMutex> = SharedReading::new();
//! static EVENTS: CtdEvents<CriticalSectionRawMutex> = CtdEvents::new();
//!
//! #[embassy_executor::task]
//! async fn ctd(logger: ChannelLogger<'static, CriticalSectionRawMutex, 8>) {
//!     let mut ctd = Ctd::new(&SERIAL, &READING, &EVENTS, logger, UptimeClock, CtdConfig::new());
//!     ctd.run().await
//! }
//! ```

pub(crate) mod fmt;

pub mod domain;

pub mod traits;

pub mod drivers;
pub use drivers::sensors::ctd::{Ctd, CtdConfig, CtdEvents, CtdState};

pub mod shared;

pub mod ticker;

#[cfg(feature = "std")]
pub mod testutil;
