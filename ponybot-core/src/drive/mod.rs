//! Drive commands and their channel routing
//!
//! A [`DriveCommand`] names what the robot should do; [`DriveCommand::plan`]
//! turns it into the exact PCA9685 writes. Numeric inputs are clamped,
//! never rejected. [`DriveCommand::validate`] reports when clamping kicked
//! in without changing the plan.

mod router;
mod stepper;
mod types;

pub use router::{
    mecanum_plan, motor_plan, normal_plan, scale_speed, servo_plan, servo_pulse_ticks,
    servo_pulse_us, stop_all_plan, stop_plan, ChannelPlan, ChannelWrite, MAX_PLAN_LEN, MAX_TICK,
};
pub use stepper::stepper_plan;
pub use types::{
    Direction, MecanumDirection, Motor, NormalDirection, Servo, StepperModel, StepperPair,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest speed in the documented 0-255 range
pub const MAX_SPEED: u16 = 255;

/// Highest servo angle in degrees
pub const MAX_SERVO_ANGLE: i16 = 180;

/// A logical drive request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DriveCommand {
    /// Run one DC motor
    Motor {
        motor: Motor,
        direction: Direction,
        speed: u16,
    },
    /// Move a mecanum chassis
    Mecanum {
        direction: MecanumDirection,
        speed: u16,
    },
    /// Move a skid-steer chassis
    Normal {
        direction: NormalDirection,
        speed: u16,
    },
    /// Release one DC motor
    Stop { motor: Motor },
    /// Release all DC motors
    StopAll,
    /// Move a servo to an angle
    Servo { servo: Servo, degrees: i16 },
    /// Load stepper coil waveforms
    Stepper {
        pair: StepperPair,
        model: StepperModel,
        direction: Direction,
    },
}

/// Input that was saturated on the way to the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveWarning {
    /// Speed above 255 (output pinned at full duty)
    SpeedSaturated { requested: u16 },
    /// Servo angle outside 0-180 degrees
    AngleClamped { requested: i16 },
}

impl DriveCommand {
    /// Channel writes for this command, in wire order
    pub fn plan(&self) -> ChannelPlan {
        match *self {
            DriveCommand::Motor {
                motor,
                direction,
                speed,
            } => motor_plan(motor, direction, speed),
            DriveCommand::Mecanum { direction, speed } => mecanum_plan(direction, speed),
            DriveCommand::Normal { direction, speed } => normal_plan(direction, speed),
            DriveCommand::Stop { motor } => stop_plan(motor),
            DriveCommand::StopAll => stop_all_plan(),
            DriveCommand::Servo { servo, degrees } => servo_plan(servo, degrees),
            DriveCommand::Stepper {
                pair,
                model,
                direction,
            } => stepper_plan(pair, model, direction),
        }
    }

    /// Report inputs that [`plan`](Self::plan) will saturate
    pub fn validate(&self) -> Result<(), DriveWarning> {
        match *self {
            DriveCommand::Motor { speed, .. }
            | DriveCommand::Mecanum { speed, .. }
            | DriveCommand::Normal { speed, .. }
                if speed > MAX_SPEED =>
            {
                Err(DriveWarning::SpeedSaturated { requested: speed })
            }
            DriveCommand::Servo { degrees, .. } if !(0..=MAX_SERVO_ANGLE).contains(&degrees) => {
                Err(DriveWarning::AngleClamped { requested: degrees })
            }
            _ => Ok(()),
        }
    }
}
