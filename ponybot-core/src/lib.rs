//! Board-agnostic core logic for the Pony Bot expansion board
//!
//! This crate contains everything that does not touch a bus:
//!
//! - Drive routing: motor, mecanum, normal, servo and stepper commands
//!   turned into PCA9685 channel writes
//! - The [`traits::PwmOutput`] seam and the [`traits::DriveExt`] helpers
//!   built on top of it
//! - Board configuration types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod fmt;

pub mod config;
pub mod drive;
pub mod traits;
