//! Hardware drivers for the Pony Bot expansion board
//!
//! This crate provides the bus side of the board:
//!
//! - [`pwm::Pca9685`]: the 16-channel PWM bank behind every motor, servo and
//!   stepper output. It implements [`ponybot_core::traits::PwmOutput`], so
//!   all [`DriveExt`](ponybot_core::traits::DriveExt) operations work on it.
//! - [`board::Board`]: opens the PWM bank and the OLED together from one
//!   [`BoardConfig`](ponybot_core::config::BoardConfig).

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod fmt;

pub mod board;
pub mod pwm;

pub use board::{Board, BoardError};
pub use pwm::Pca9685;
