//! Configuration type definitions
//!
//! Every field has a board default, so a configuration file only needs to
//! name what it changes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default PCA9685 address (all address straps low)
pub const PCA9685_ADDRESS: u8 = 0x40;

/// Default SSD1306 address
pub const SSD1306_ADDRESS: u8 = 0x3C;

/// PCA9685 internal oscillator frequency
pub const PCA9685_OSCILLATOR_HZ: u32 = 25_000_000;

/// Servo refresh rate
pub const SERVO_FREQUENCY_HZ: u16 = 50;

/// Lowest PWM frequency reachable with the internal oscillator (prescale 255)
pub const MIN_PWM_FREQUENCY_HZ: u16 = 24;

/// Highest PWM frequency reachable with the internal oscillator (prescale 3)
pub const MAX_PWM_FREQUENCY_HZ: u16 = 1526;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Input is not valid TOML or has wrongly typed fields
    Syntax,
    /// Address does not fit in 7 bits
    InvalidAddress,
    /// Both devices configured at the same address
    AddressConflict,
    /// PWM frequency outside what the prescaler can produce
    InvalidFrequency,
}

/// PWM bank (PCA9685) configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PwmConfig {
    /// 7-bit I2C address
    pub address: u8,
    /// Output frequency in Hz (servos need 50)
    pub frequency_hz: u16,
    /// Oscillator feeding the prescaler
    pub oscillator_hz: u32,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            address: PCA9685_ADDRESS,
            frequency_hz: SERVO_FREQUENCY_HZ,
            oscillator_hz: PCA9685_OSCILLATOR_HZ,
        }
    }
}

/// OLED (SSD1306) configuration
///
/// The rendering modes are fixed when the display is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    /// 7-bit I2C address
    pub address: u8,
    /// Render text as 10x16 glyphs built from 2x2 pixel blocks
    pub double_size: bool,
    /// Use the controller's zoom mode (every column sent twice)
    pub zoom: bool,
    /// Send drawing results to the panel as soon as they are made
    pub auto_flush: bool,
    /// Contrast level sent during init
    pub contrast: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            address: SSD1306_ADDRESS,
            double_size: false,
            zoom: false,
            auto_flush: true,
            contrast: 0xCF,
        }
    }
}

/// Complete board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardConfig {
    pub pwm: PwmConfig,
    pub display: DisplayConfig,
}

impl BoardConfig {
    /// Check the configuration against what the hardware can do
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pwm.address > 0x7F || self.display.address > 0x7F {
            return Err(ConfigError::InvalidAddress);
        }
        if self.pwm.address == self.display.address {
            return Err(ConfigError::AddressConflict);
        }
        if !(MIN_PWM_FREQUENCY_HZ..=MAX_PWM_FREQUENCY_HZ).contains(&self.pwm.frequency_hz) {
            return Err(ConfigError::InvalidFrequency);
        }
        Ok(())
    }
}
