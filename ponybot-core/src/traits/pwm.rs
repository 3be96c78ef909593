//! PWM output traits
//!
//! [`PwmOutput`] is the single seam between routing and hardware: anything
//! that can set one channel's on/off ticks can drive the robot.
//! [`DriveExt`] adds the motor, chassis, servo and stepper operations on
//! top of it for every implementor.

use crate::drive::{
    ChannelWrite, Direction, DriveCommand, MecanumDirection, Motor, NormalDirection, Servo,
    StepperModel, StepperPair,
};

/// A bank of 12-bit PWM channels
pub trait PwmOutput {
    /// Error type for channel writes
    type Error;

    /// Set one channel's on and off tick
    ///
    /// Channels the bank does not have must be ignored, not reported.
    fn set_channel(&mut self, channel: u8, on: u16, off: u16) -> Result<(), Self::Error>;
}

/// Drive operations for any [`PwmOutput`]
pub trait DriveExt: PwmOutput {
    /// Write a plan in order, stopping at the first bus error
    fn apply(&mut self, plan: &[ChannelWrite]) -> Result<(), Self::Error> {
        for write in plan {
            self.set_channel(write.channel, write.on, write.off)?;
        }
        Ok(())
    }

    /// Route and write a command
    ///
    /// Saturated inputs are logged and still executed in clamped form.
    fn execute(&mut self, command: &DriveCommand) -> Result<(), Self::Error> {
        if let Err(warning) = command.validate() {
            warn!("Drive input clamped: {}", warning);
        }
        self.apply(&command.plan())
    }

    /// Run one motor (speed 0-255)
    fn run_motor(
        &mut self,
        motor: Motor,
        direction: Direction,
        speed: u16,
    ) -> Result<(), Self::Error> {
        self.execute(&DriveCommand::Motor {
            motor,
            direction,
            speed,
        })
    }

    /// Run a motor by board number; numbers outside 1-4 do nothing
    fn run_motor_index(
        &mut self,
        index: u8,
        direction: Direction,
        speed: u16,
    ) -> Result<(), Self::Error> {
        match Motor::from_index(index) {
            Some(motor) => self.run_motor(motor, direction, speed),
            None => {
                warn!("Ignoring motor index {=u8}", index);
                Ok(())
            }
        }
    }

    /// Move a mecanum chassis
    fn run_mecanum(&mut self, direction: MecanumDirection, speed: u16) -> Result<(), Self::Error> {
        self.execute(&DriveCommand::Mecanum { direction, speed })
    }

    /// Move a skid-steer chassis
    fn run_normal(&mut self, direction: NormalDirection, speed: u16) -> Result<(), Self::Error> {
        self.execute(&DriveCommand::Normal { direction, speed })
    }

    fn stop_motor(&mut self, motor: Motor) -> Result<(), Self::Error> {
        self.execute(&DriveCommand::Stop { motor })
    }

    fn stop_all(&mut self) -> Result<(), Self::Error> {
        self.execute(&DriveCommand::StopAll)
    }

    /// Move a servo (0-180 degrees)
    fn servo(&mut self, servo: Servo, degrees: i16) -> Result<(), Self::Error> {
        self.execute(&DriveCommand::Servo { servo, degrees })
    }

    /// Start a stepper turning
    fn stepper(
        &mut self,
        pair: StepperPair,
        model: StepperModel,
        direction: Direction,
    ) -> Result<(), Self::Error> {
        self.execute(&DriveCommand::Stepper {
            pair,
            model,
            direction,
        })
    }
}

// Blanket implementation for all PwmOutput types
impl<T: PwmOutput + ?Sized> DriveExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records writes; channel 99 fails to emulate a bus error
    #[derive(Default)]
    struct Recorder {
        writes: Vec<ChannelWrite>,
    }

    impl PwmOutput for Recorder {
        type Error = ();

        fn set_channel(&mut self, channel: u8, on: u16, off: u16) -> Result<(), ()> {
            if channel == 99 {
                return Err(());
            }
            self.writes.push(ChannelWrite::new(channel, on, off));
            Ok(())
        }
    }

    #[test]
    fn test_run_motor_end_to_end() {
        let mut out = Recorder::default();
        out.run_motor(Motor::M1, Direction::Clockwise, 128).unwrap();
        assert_eq!(
            out.writes,
            vec![ChannelWrite::new(7, 0, 2048), ChannelWrite::new(6, 0, 0)]
        );
    }

    #[test]
    fn test_invalid_motor_index_is_noop() {
        let mut out = Recorder::default();
        assert_eq!(out.run_motor_index(0, Direction::Clockwise, 100), Ok(()));
        assert_eq!(out.run_motor_index(5, Direction::Clockwise, 100), Ok(()));
        assert!(out.writes.is_empty());

        out.run_motor_index(4, Direction::Clockwise, 1).unwrap();
        assert_eq!(out.writes.len(), 2);
    }

    #[test]
    fn test_servo_end_to_end() {
        let mut out = Recorder::default();
        out.servo(Servo::S1, 90).unwrap();
        assert_eq!(out.writes, vec![ChannelWrite::new(8, 0, 307)]);
    }

    #[test]
    fn test_stop_all_then_mecanum_order() {
        let mut out = Recorder::default();
        out.stop_all().unwrap();
        out.run_mecanum(MecanumDirection::Forward, 10).unwrap();

        assert_eq!(out.writes.len(), 16);
        let mecanum: Vec<u8> = out.writes[8..].iter().map(|w| w.channel).collect();
        assert_eq!(mecanum, vec![7, 6, 5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_apply_stops_at_first_error() {
        let mut out = Recorder::default();
        let plan = [
            ChannelWrite::new(1, 0, 1),
            ChannelWrite::new(99, 0, 2),
            ChannelWrite::new(3, 0, 3),
        ];
        assert_eq!(out.apply(&plan), Err(()));
        assert_eq!(out.writes, vec![ChannelWrite::new(1, 0, 1)]);
    }

    #[test]
    fn test_stepper_and_normal() {
        let mut out = Recorder::default();
        out.stepper(StepperPair::M1M2, StepperModel::Nema42, Direction::Clockwise)
            .unwrap();
        out.run_normal(NormalDirection::Backward, 255).unwrap();
        out.stop_motor(Motor::M3).unwrap();

        assert_eq!(out.writes.len(), 4 + 8 + 2);
        assert_eq!(out.writes[12], ChannelWrite::new(2, 0, 0));
        assert_eq!(out.writes[13], ChannelWrite::new(3, 0, 0));
    }
}
