//! Drive identifiers
//!
//! Numeric values match the labels printed on the board (M1..M4, S1..S8)
//! and the keypad numbering used for mecanum directions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// DC motor port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Motor {
    M1 = 1,
    M2 = 2,
    M3 = 3,
    M4 = 4,
}

impl Motor {
    /// All ports in routing order
    pub const ALL: [Motor; 4] = [Motor::M1, Motor::M2, Motor::M3, Motor::M4];

    /// Look up a port by its board number (1-4)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Motor::M1),
            2 => Some(Motor::M2),
            3 => Some(Motor::M3),
            4 => Some(Motor::M4),
            _ => None,
        }
    }

    /// Board number (1-4)
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Channel driven for negative (reverse) rotation
    pub const fn negative_channel(self) -> u8 {
        (4 - self.index()) * 2
    }

    /// Channel driven for positive (forward) rotation
    pub const fn positive_channel(self) -> u8 {
        (4 - self.index()) * 2 + 1
    }

    /// M3 and M4 are wired mirrored relative to M1 and M2
    pub const fn is_inverted(self) -> bool {
        matches!(self, Motor::M3 | Motor::M4)
    }
}

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Clockwise rotation
    Clockwise,
    /// Counter-clockwise rotation
    CounterClockwise,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// +1 for clockwise, -1 for counter-clockwise
    pub const fn sign(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// Servo header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Servo {
    S1 = 1,
    S2 = 2,
    S3 = 3,
    S4 = 4,
    S5 = 5,
    S6 = 6,
    S7 = 7,
    S8 = 8,
}

impl Servo {
    /// Look up a header by its board number (1-8)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Servo::S1),
            2 => Some(Servo::S2),
            3 => Some(Servo::S3),
            4 => Some(Servo::S4),
            5 => Some(Servo::S5),
            6 => Some(Servo::S6),
            7 => Some(Servo::S7),
            8 => Some(Servo::S8),
            _ => None,
        }
    }

    /// Board number (1-8)
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// PWM channel (8-15)
    pub const fn channel(self) -> u8 {
        self.index() + 7
    }
}

/// Pair of motor ports driving one stepper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepperPair {
    /// M1 + M2, channels 4-7
    M1M2 = 1,
    /// M3 + M4, channels 0-3
    M3M4 = 2,
}

impl StepperPair {
    /// Lowest of the four coil channels
    pub const fn base_channel(self) -> u8 {
        match self {
            StepperPair::M1M2 => 4,
            StepperPair::M3M4 => 0,
        }
    }
}

/// Supported stepper motors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepperModel {
    /// 42 mm bipolar (NEMA 17 class)
    Nema42 = 1,
    /// 28BYJ-48 geared unipolar
    Byj28 = 2,
}

/// Mecanum chassis heading, numbered like a phone keypad
///
/// ```text
/// 1 ↖   2 ↑   3 ↗
/// 4 ←   5 ■   6 →
/// 7 ↙   8 ↓   9 ↘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MecanumDirection {
    ForwardLeft = 1,
    Forward = 2,
    ForwardRight = 3,
    Left = 4,
    Stop = 5,
    Right = 6,
    BackwardLeft = 7,
    Backward = 8,
    BackwardRight = 9,
}

impl MecanumDirection {
    /// All headings in keypad order
    pub const ALL: [MecanumDirection; 9] = [
        MecanumDirection::ForwardLeft,
        MecanumDirection::Forward,
        MecanumDirection::ForwardRight,
        MecanumDirection::Left,
        MecanumDirection::Stop,
        MecanumDirection::Right,
        MecanumDirection::BackwardLeft,
        MecanumDirection::Backward,
        MecanumDirection::BackwardRight,
    ];

    /// Look up a heading by keypad number (1-9)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1..=9 => Some(Self::ALL[usize::from(index - 1)]),
            _ => None,
        }
    }

    /// Keypad number (1-9)
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Skid-steer chassis heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NormalDirection {
    Forward = 1,
    Backward = 2,
    /// Spin in place clockwise
    RotateCw = 3,
    /// Spin in place counter-clockwise
    RotateCcw = 4,
}

impl NormalDirection {
    pub const ALL: [NormalDirection; 4] = [
        NormalDirection::Forward,
        NormalDirection::Backward,
        NormalDirection::RotateCw,
        NormalDirection::RotateCcw,
    ];

    /// Look up a heading by number (1-4)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1..=4 => Some(Self::ALL[usize::from(index - 1)]),
            _ => None,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motor_channel_pairs() {
        let pairs: [(u8, u8); 4] = [(6, 7), (4, 5), (2, 3), (0, 1)];
        for (motor, (neg, pos)) in Motor::ALL.iter().zip(pairs) {
            assert_eq!(motor.negative_channel(), neg);
            assert_eq!(motor.positive_channel(), pos);
        }
    }

    #[test]
    fn test_motor_from_index() {
        assert_eq!(Motor::from_index(0), None);
        assert_eq!(Motor::from_index(3), Some(Motor::M3));
        assert_eq!(Motor::from_index(5), None);
    }

    #[test]
    fn test_inverted_motors() {
        assert!(!Motor::M1.is_inverted());
        assert!(!Motor::M2.is_inverted());
        assert!(Motor::M3.is_inverted());
        assert!(Motor::M4.is_inverted());
    }

    #[test]
    fn test_servo_channels() {
        assert_eq!(Servo::S1.channel(), 8);
        assert_eq!(Servo::S8.channel(), 15);
        assert_eq!(Servo::from_index(9), None);
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Clockwise.sign(), 1);
        assert_eq!(Direction::CounterClockwise.sign(), -1);
        assert_eq!(Direction::Clockwise.opposite(), Direction::CounterClockwise);
    }

    #[test]
    fn test_keypad_numbering() {
        for (i, dir) in MecanumDirection::ALL.iter().enumerate() {
            assert_eq!(dir.index() as usize, i + 1);
            assert_eq!(MecanumDirection::from_index(dir.index()), Some(*dir));
        }
        assert_eq!(MecanumDirection::from_index(0), None);
        assert_eq!(MecanumDirection::from_index(10), None);
        assert_eq!(NormalDirection::from_index(3), Some(NormalDirection::RotateCw));
    }
}
