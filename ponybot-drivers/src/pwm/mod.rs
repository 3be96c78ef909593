//! PWM bank drivers

pub mod pca9685;

pub use pca9685::{prescale_for, Pca9685, CHANNEL_COUNT};
