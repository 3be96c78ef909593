//! Hardware abstraction traits
//!
//! These traits define the interface between drive routing and the
//! PWM hardware that carries it out.

pub mod pwm;

pub use pwm::{DriveExt, PwmOutput};
