//! Ponybot hardware glue
//!
//! The drivers in this workspace are generic over the `embedded-hal` 1.0
//! traits, so any chip HAL can be plugged in directly. This crate adds the
//! two pieces that sit between a chip HAL and the drivers:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  ponybot-drivers / ponybot-display      │
//! └─────────────────────────────────────────┘
//!                     │  embedded_hal::i2c::I2c
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ponybot-hal (SharedBus / MockI2c)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chip HAL (rp2040, nrf52, host mock...) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! - [`bus::SharedBus`] - one physical I2C bus shared by the PWM bank and
//!   the OLED, each transaction guarded by a critical section
//! - [`mock::MockI2c`], [`mock::MockDelay`] - recording doubles for host
//!   tests (`mock` feature)

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod bus;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use bus::{BusDevice, SharedBus};
