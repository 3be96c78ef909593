//! Channel routing
//!
//! Turns drive intents into the `(channel, on, off)` writes the PCA9685
//! needs. Everything here is pure; the result is a [`ChannelPlan`] that a
//! [`PwmOutput`](crate::traits::PwmOutput) applies in order.
//!
//! Write order is part of the contract: the chassis sees every
//! intermediate state, so plans reproduce the board's reference sequence
//! exactly.

use heapless::Vec;

use super::types::{Direction, MecanumDirection, Motor, NormalDirection, Servo};

/// Largest on/off tick value (12-bit counter)
pub const MAX_TICK: i32 = 4095;

/// Speed units are scaled by this to reach the tick range
pub const SPEED_SCALE: i32 = 16;

/// No operation writes more than every motor channel
pub const MAX_PLAN_LEN: usize = 8;

/// Servo pulse at 0 degrees
pub const SERVO_MIN_PULSE_US: u32 = 600;

/// Servo pulse span across 180 degrees
pub const SERVO_PULSE_SPAN_US: u32 = 1800;

/// PWM period at 50 Hz
pub const SERVO_PERIOD_US: u32 = 20_000;

/// One channel write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelWrite {
    pub channel: u8,
    pub on: u16,
    pub off: u16,
}

impl ChannelWrite {
    pub const fn new(channel: u8, on: u16, off: u16) -> Self {
        Self { channel, on, off }
    }
}

/// Ordered channel writes for one command
pub type ChannelPlan = Vec<ChannelWrite, MAX_PLAN_LEN>;

/// What one wheel does within a chassis move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wheel {
    Forward,
    Backward,
    Stop,
}

use Wheel::{Backward as B, Forward as F, Stop as S};

/// Per-heading wheel actions for M1..M4, indexed by keypad number - 1
const MECANUM_TABLE: [[Wheel; 4]; 9] = [
    [F, S, F, S], // ↖
    [F, F, F, F], // ↑
    [S, F, S, F], // ↗
    [F, B, F, B], // ←
    [S, S, S, S], // stop
    [B, F, B, F], // →
    [S, B, S, B], // ↙
    [B, B, B, B], // ↓
    [B, S, B, S], // ↘
];

/// Per-heading wheel actions for M1..M4, indexed by heading number - 1
const NORMAL_TABLE: [[Wheel; 4]; 4] = [
    [F, F, F, F], // forward
    [B, B, B, B], // backward
    [F, F, B, B], // rotate clockwise
    [B, B, F, F], // rotate counter-clockwise
];

/// Scale a speed (nominally 0-255) to signed ticks, saturating at ±4095
pub fn scale_speed(speed: u16, sign: i32) -> i32 {
    (i32::from(speed) * SPEED_SCALE * sign).clamp(-MAX_TICK, MAX_TICK)
}

fn push(plan: &mut ChannelPlan, write: ChannelWrite) {
    // Plans are built from fixed tables and never exceed MAX_PLAN_LEN
    let _ = plan.push(write);
}

/// Append the positive-then-negative write pair for a signed tick value
fn push_signed(plan: &mut ChannelPlan, motor: Motor, ticks: i32) {
    let magnitude = ticks.unsigned_abs().min(MAX_TICK as u32) as u16;
    if ticks >= 0 {
        push(plan, ChannelWrite::new(motor.positive_channel(), 0, magnitude));
        push(plan, ChannelWrite::new(motor.negative_channel(), 0, 0));
    } else {
        push(plan, ChannelWrite::new(motor.positive_channel(), 0, 0));
        push(plan, ChannelWrite::new(motor.negative_channel(), 0, magnitude));
    }
}

/// Signed ticks for a motor turning `direction` at `speed`
///
/// Inverted ports get their direction flipped before scaling.
fn motor_ticks(motor: Motor, direction: Direction, speed: u16) -> i32 {
    let direction = if motor.is_inverted() {
        direction.opposite()
    } else {
        direction
    };
    scale_speed(speed, direction.sign())
}

fn chassis_plan(wheels: &[Wheel; 4], speed: u16) -> ChannelPlan {
    let mut plan = ChannelPlan::new();
    for (motor, wheel) in Motor::ALL.iter().zip(wheels) {
        let ticks = match wheel {
            Wheel::Forward => motor_ticks(*motor, Direction::Clockwise, speed),
            Wheel::Backward => motor_ticks(*motor, Direction::CounterClockwise, speed),
            Wheel::Stop => 0,
        };
        push_signed(&mut plan, *motor, ticks);
    }
    plan
}

/// Run one motor
pub fn motor_plan(motor: Motor, direction: Direction, speed: u16) -> ChannelPlan {
    let mut plan = ChannelPlan::new();
    push_signed(&mut plan, motor, motor_ticks(motor, direction, speed));
    plan
}

/// Drive a mecanum chassis toward a keypad heading
pub fn mecanum_plan(direction: MecanumDirection, speed: u16) -> ChannelPlan {
    chassis_plan(&MECANUM_TABLE[usize::from(direction.index() - 1)], speed)
}

/// Drive a skid-steer chassis
pub fn normal_plan(direction: NormalDirection, speed: u16) -> ChannelPlan {
    chassis_plan(&NORMAL_TABLE[usize::from(direction.index() - 1)], speed)
}

/// Release one motor (negative channel first)
pub fn stop_plan(motor: Motor) -> ChannelPlan {
    let mut plan = ChannelPlan::new();
    push(&mut plan, ChannelWrite::new(motor.negative_channel(), 0, 0));
    push(&mut plan, ChannelWrite::new(motor.positive_channel(), 0, 0));
    plan
}

/// Release every motor, M1 first
pub fn stop_all_plan() -> ChannelPlan {
    let mut plan = ChannelPlan::new();
    for motor in Motor::ALL {
        for write in stop_plan(motor) {
            push(&mut plan, write);
        }
    }
    plan
}

/// Pulse width for an angle, clamped to 0-180 degrees
pub fn servo_pulse_us(degrees: i16) -> u32 {
    let degrees = degrees.clamp(0, 180) as u32;
    degrees * SERVO_PULSE_SPAN_US / 180 + SERVO_MIN_PULSE_US
}

/// Off tick for an angle at 50 Hz
pub fn servo_pulse_ticks(degrees: i16) -> u16 {
    (servo_pulse_us(degrees) * 4096 / SERVO_PERIOD_US) as u16
}

/// Move a servo to an angle
pub fn servo_plan(servo: Servo, degrees: i16) -> ChannelPlan {
    let mut plan = ChannelPlan::new();
    push(
        &mut plan,
        ChannelWrite::new(servo.channel(), 0, servo_pulse_ticks(degrees)),
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn w(channel: u8, off: u16) -> ChannelWrite {
        ChannelWrite::new(channel, 0, off)
    }

    /// Off ticks per channel 7..=0, the order chassis plans write in
    fn offs(plan: &ChannelPlan) -> [(u8, u16); 8] {
        let mut out = [(0, 0); 8];
        for (slot, write) in out.iter_mut().zip(plan.iter()) {
            assert_eq!(write.on, 0);
            *slot = (write.channel, write.off);
        }
        out
    }

    #[test]
    fn test_scale_speed_bounds() {
        assert_eq!(scale_speed(0, 1), 0);
        assert_eq!(scale_speed(128, 1), 2048);
        assert_eq!(scale_speed(255, 1), 4080);
        assert_eq!(scale_speed(255, -1), -4080);
        assert_eq!(scale_speed(256, 1), 4095);
        assert_eq!(scale_speed(1000, -1), -4095);
    }

    #[test]
    fn test_motor1_clockwise() {
        let plan = motor_plan(Motor::M1, Direction::Clockwise, 128);
        assert_eq!(plan.as_slice(), &[w(7, 2048), w(6, 0)]);
    }

    #[test]
    fn test_motor1_counter_clockwise() {
        let plan = motor_plan(Motor::M1, Direction::CounterClockwise, 100);
        assert_eq!(plan.as_slice(), &[w(7, 0), w(6, 1600)]);
    }

    #[test]
    fn test_motor3_is_inverted() {
        let plan = motor_plan(Motor::M3, Direction::Clockwise, 128);
        assert_eq!(plan.as_slice(), &[w(3, 0), w(2, 2048)]);

        let plan = motor_plan(Motor::M4, Direction::CounterClockwise, 10);
        assert_eq!(plan.as_slice(), &[w(1, 160), w(0, 0)]);
    }

    #[test]
    fn test_motor_saturates() {
        let plan = motor_plan(Motor::M2, Direction::Clockwise, u16::MAX);
        assert_eq!(plan.as_slice(), &[w(5, 4095), w(4, 0)]);
    }

    #[test]
    fn test_mecanum_forward() {
        let plan = mecanum_plan(MecanumDirection::Forward, 100);
        assert_eq!(
            offs(&plan),
            [(7, 1600), (6, 0), (5, 1600), (4, 0), (3, 0), (2, 1600), (1, 0), (0, 1600)]
        );
    }

    #[test]
    fn test_mecanum_full_table() {
        const S: u16 = 1600;
        let expected: [[(u8, u16); 8]; 9] = [
            // ↖
            [(7, S), (6, 0), (5, 0), (4, 0), (3, 0), (2, S), (1, 0), (0, 0)],
            // ↑
            [(7, S), (6, 0), (5, S), (4, 0), (3, 0), (2, S), (1, 0), (0, S)],
            // ↗
            [(7, 0), (6, 0), (5, S), (4, 0), (3, 0), (2, 0), (1, 0), (0, S)],
            // ←
            [(7, S), (6, 0), (5, 0), (4, S), (3, 0), (2, S), (1, S), (0, 0)],
            // stop
            [(7, 0), (6, 0), (5, 0), (4, 0), (3, 0), (2, 0), (1, 0), (0, 0)],
            // →
            [(7, 0), (6, S), (5, S), (4, 0), (3, S), (2, 0), (1, 0), (0, S)],
            // ↙
            [(7, 0), (6, 0), (5, 0), (4, S), (3, 0), (2, 0), (1, S), (0, 0)],
            // ↓
            [(7, 0), (6, S), (5, 0), (4, S), (3, S), (2, 0), (1, S), (0, 0)],
            // ↘
            [(7, 0), (6, S), (5, 0), (4, 0), (3, S), (2, 0), (1, 0), (0, 0)],
        ];

        for (direction, want) in MecanumDirection::ALL.iter().zip(expected.iter()) {
            let plan = mecanum_plan(*direction, 100);
            assert_eq!(plan.len(), 8);
            assert_eq!(&offs(&plan), want, "heading {:?}", direction);
        }
    }

    #[test]
    fn test_normal_full_table() {
        const S: u16 = 4080;
        let expected: [[(u8, u16); 8]; 4] = [
            [(7, S), (6, 0), (5, S), (4, 0), (3, 0), (2, S), (1, 0), (0, S)],
            [(7, 0), (6, S), (5, 0), (4, S), (3, S), (2, 0), (1, S), (0, 0)],
            [(7, S), (6, 0), (5, S), (4, 0), (3, S), (2, 0), (1, S), (0, 0)],
            [(7, 0), (6, S), (5, 0), (4, S), (3, 0), (2, S), (1, 0), (0, S)],
        ];

        for (direction, want) in NormalDirection::ALL.iter().zip(expected.iter()) {
            let plan = normal_plan(*direction, 255);
            assert_eq!(&offs(&plan), want, "heading {:?}", direction);
        }
    }

    #[test]
    fn test_stop_writes_negative_first() {
        let plan = stop_plan(Motor::M2);
        assert_eq!(plan.as_slice(), &[w(4, 0), w(5, 0)]);
    }

    #[test]
    fn test_stop_all_covers_every_motor_channel() {
        let plan = stop_all_plan();
        let channels: [u8; 8] = core::array::from_fn(|i| plan[i].channel);
        assert_eq!(channels, [6, 7, 4, 5, 2, 3, 0, 1]);
        assert!(plan.iter().all(|w| w.on == 0 && w.off == 0));
    }

    #[test]
    fn test_servo_pulse_reference_points() {
        assert_eq!(servo_pulse_ticks(0), 122);
        assert_eq!(servo_pulse_ticks(90), 307);
        assert_eq!(servo_pulse_ticks(180), 491);
    }

    #[test]
    fn test_servo_angle_is_clamped() {
        assert_eq!(servo_pulse_ticks(-45), servo_pulse_ticks(0));
        assert_eq!(servo_pulse_ticks(270), servo_pulse_ticks(180));
    }

    #[test]
    fn test_servo_plan_channel() {
        let plan = servo_plan(Servo::S1, 90);
        assert_eq!(plan.as_slice(), &[w(8, 307)]);
    }

    #[test]
    fn test_servo_pulse_width_at_center() {
        // 1500 us out of a 20 ms period
        assert_eq!(servo_pulse_us(90), 1500);
        assert_eq!(servo_pulse_ticks(90), (1500u32 * 4096 / 20_000) as u16);
    }

    fn any_motor() -> impl Strategy<Value = Motor> {
        (1u8..=4).prop_map(|i| Motor::from_index(i).unwrap())
    }

    proptest! {
        #[test]
        fn prop_scale_speed_monotonic(a in 0u16..=255, b in 0u16..=255) {
            prop_assume!(a <= b);
            prop_assert!(scale_speed(a, 1) <= scale_speed(b, 1));
            prop_assert_eq!(scale_speed(b, 1), i32::from(b) * 16);
        }

        #[test]
        fn prop_scale_speed_never_exceeds_tick_range(speed in any::<u16>(), negative in any::<bool>()) {
            let sign = if negative { -1 } else { 1 };
            let ticks = scale_speed(speed, sign);
            prop_assert!((-MAX_TICK..=MAX_TICK).contains(&ticks));
        }

        #[test]
        fn prop_servo_ticks_increase(degrees in 0i16..180) {
            prop_assert!(servo_pulse_ticks(degrees) < servo_pulse_ticks(degrees + 1));
        }

        #[test]
        fn prop_motor_plan_drives_one_channel(
            motor in any_motor(),
            clockwise in any::<bool>(),
            speed in 1u16..=255,
        ) {
            let direction = if clockwise { Direction::Clockwise } else { Direction::CounterClockwise };
            let plan = motor_plan(motor, direction, speed);

            prop_assert_eq!(plan.len(), 2);
            prop_assert_eq!(plan[0].channel, motor.positive_channel());
            prop_assert_eq!(plan[1].channel, motor.negative_channel());
            prop_assert_eq!(plan.iter().filter(|w| w.off != 0).count(), 1);
            prop_assert_eq!(plan.iter().map(|w| w.off).max(), Some(speed * 16));
        }

        #[test]
        fn prop_reversing_swaps_channels(motor in any_motor(), speed in 1u16..=255) {
            let cw = motor_plan(motor, Direction::Clockwise, speed);
            let ccw = motor_plan(motor, Direction::CounterClockwise, speed);
            prop_assert_eq!(cw[0].off, ccw[1].off);
            prop_assert_eq!(cw[1].off, ccw[0].off);
        }
    }
}
