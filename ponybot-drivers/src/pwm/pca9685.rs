//! PCA9685 16-channel PWM driver
//!
//! Every motor, servo and stepper output on the board is one PCA9685
//! channel. A channel is driven by two 12-bit counter values: the output
//! goes high at `on` and low at `off` within each 4096-tick period.
//!
//! # Frequency programming
//!
//! The prescaler can only be written while the oscillator sleeps:
//!
//! 1. read MODE1
//! 2. write MODE1 with SLEEP set (RESTART cleared)
//! 3. write PRESCALE
//! 4. restore the old MODE1 and wait 5 ms for the oscillator
//! 5. write MODE1 with RESTART, AI and ALLCALL set
//!
//! ```ignore
//! let mut pwm = Pca9685::open(i2c, &mut delay, PwmConfig::default())?;
//! pwm.run_motor(Motor::M1, Direction::Clockwise, 200)?;
//! pwm.servo(Servo::S1, 90)?;
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use ponybot_core::config::PwmConfig;
use ponybot_core::traits::PwmOutput;

/// PCA9685 register addresses
pub mod reg {
    /// Mode register 1
    pub const MODE1: u8 = 0x00;
    /// First channel's ON low byte; channel `c` starts at `LED0_ON_L + 4 * c`
    pub const LED0_ON_L: u8 = 0x06;
    /// Oscillator prescaler
    pub const PRESCALE: u8 = 0xFE;
}

/// MODE1 bits
pub mod mode1 {
    pub const RESTART: u8 = 0x80;
    pub const SLEEP: u8 = 0x10;
    /// Register auto-increment (needed for 4-byte channel writes)
    pub const AI: u8 = 0x20;
    pub const ALLCALL: u8 = 0x01;
}

/// Number of PWM channels
pub const CHANNEL_COUNT: u8 = 16;

/// Oscillator settle time after leaving sleep
const OSCILLATOR_SETTLE_US: u32 = 5_000;

/// Prescaler limits from the datasheet
const PRESCALE_MIN: u32 = 3;
const PRESCALE_MAX: u32 = 255;

/// Prescaler value for an output frequency
///
/// `oscillator / (4096 * frequency) - 1`, truncated and clamped to the
/// register's valid range.
pub fn prescale_for(oscillator_hz: u32, frequency_hz: u16) -> u8 {
    let period_ticks = 4096 * u32::from(frequency_hz.max(1));
    let prescale = (oscillator_hz / period_ticks).saturating_sub(1);
    prescale.clamp(PRESCALE_MIN, PRESCALE_MAX) as u8
}

/// PCA9685 driver
pub struct Pca9685<I2C> {
    i2c: I2C,
    config: PwmConfig,
}

impl<I2C> Pca9685<I2C>
where
    I2C: I2c,
{
    /// Create a driver without touching the bus
    pub fn new(i2c: I2C, config: PwmConfig) -> Self {
        Self { i2c, config }
    }

    /// Create a driver and program the chip
    pub fn open<D: DelayNs>(i2c: I2C, delay: &mut D, config: PwmConfig) -> Result<Self, I2C::Error> {
        let mut pwm = Self::new(i2c, config);
        pwm.init(delay)?;
        Ok(pwm)
    }

    /// Reset MODE1 and program the configured frequency
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), I2C::Error> {
        debug!("PCA9685 init at {=u8:#x}", self.config.address);
        self.write_reg(reg::MODE1, 0x00)?;
        self.set_frequency(delay, self.config.frequency_hz)
    }

    /// Change the output frequency of all channels
    pub fn set_frequency<D: DelayNs>(
        &mut self,
        delay: &mut D,
        frequency_hz: u16,
    ) -> Result<(), I2C::Error> {
        let prescale = prescale_for(self.config.oscillator_hz, frequency_hz);
        debug!("PCA9685 {=u16} Hz, prescale {=u8}", frequency_hz, prescale);

        let old_mode = self.read_reg(reg::MODE1)?;
        let sleep_mode = (old_mode & !mode1::RESTART) | mode1::SLEEP;

        self.write_reg(reg::MODE1, sleep_mode)?;
        self.write_reg(reg::PRESCALE, prescale)?;
        self.write_reg(reg::MODE1, old_mode)?;
        delay.delay_us(OSCILLATOR_SETTLE_US);
        self.write_reg(reg::MODE1, old_mode | mode1::RESTART | mode1::AI | mode1::ALLCALL)?;

        self.config.frequency_hz = frequency_hz;
        Ok(())
    }

    /// Set one channel's on and off tick
    ///
    /// Channels above 15 are ignored.
    pub fn set_pwm(&mut self, channel: u8, on: u16, off: u16) -> Result<(), I2C::Error> {
        if channel >= CHANNEL_COUNT {
            trace!("Dropping write to channel {=u8}", channel);
            return Ok(());
        }

        let [on_lo, on_hi] = on.to_le_bytes();
        let [off_lo, off_hi] = off.to_le_bytes();
        let register = reg::LED0_ON_L + 4 * channel;
        self.i2c
            .write(self.config.address, &[register, on_lo, on_hi, off_lo, off_hi])
    }

    /// Read a register
    pub fn read_reg(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(self.config.address, &[register], &mut buf)?;
        Ok(buf[0])
    }

    /// Write a register
    pub fn write_reg(&mut self, register: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.config.address, &[register, value])
    }

    pub fn config(&self) -> &PwmConfig {
        &self.config
    }

    /// Release the I2C bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> PwmOutput for Pca9685<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn set_channel(&mut self, channel: u8, on: u16, off: u16) -> Result<(), Self::Error> {
        self.set_pwm(channel, on, off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ponybot_core::config::PCA9685_ADDRESS;
    use ponybot_core::drive::{Direction, MecanumDirection, Motor, Servo, StepperModel, StepperPair};
    use ponybot_core::traits::DriveExt;
    use ponybot_hal::mock::{MockDelay, MockI2c, Transaction};

    fn open() -> (Pca9685<MockI2c>, MockI2c) {
        let bus = MockI2c::new();
        let mut delay = MockDelay::new();
        let pwm = Pca9685::open(bus.clone(), &mut delay, PwmConfig::default()).unwrap();
        bus.clear();
        (pwm, bus)
    }

    #[test]
    fn test_prescale_for_servo_frequency() {
        assert_eq!(prescale_for(25_000_000, 50), 121);
        assert_eq!(prescale_for(25_000_000, 1000), 5);
        assert_eq!(prescale_for(25_000_000, 24), 253);
    }

    #[test]
    fn test_prescale_is_clamped() {
        assert_eq!(prescale_for(25_000_000, 1526), 3);
        assert_eq!(prescale_for(25_000_000, 10_000), 3);
        assert_eq!(prescale_for(25_000_000, 1), 255);
        assert_eq!(prescale_for(25_000_000, 0), 255);
    }

    #[test]
    fn test_open_sequence() {
        let bus = MockI2c::new();
        let mut delay = MockDelay::new();
        let _pwm = Pca9685::open(bus.clone(), &mut delay, PwmConfig::default()).unwrap();

        let w = |bytes: &[u8]| Transaction::Write {
            address: PCA9685_ADDRESS,
            bytes: bytes.to_vec(),
        };
        assert_eq!(
            bus.transactions(),
            vec![
                w(&[0x00, 0x00]),
                w(&[0x00]),
                Transaction::Read {
                    address: PCA9685_ADDRESS,
                    len: 1,
                },
                w(&[0x00, 0x10]),
                w(&[0xFE, 121]),
                w(&[0x00, 0x00]),
                w(&[0x00, 0xA1]),
            ]
        );
        assert_eq!(delay.total_us(), 5_000);
    }

    #[test]
    fn test_set_frequency_preserves_mode() {
        let (mut pwm, bus) = open();
        let mut delay = MockDelay::new();
        bus.queue_read(0x81);

        pwm.set_frequency(&mut delay, 1000).unwrap();

        assert_eq!(
            bus.writes_to(PCA9685_ADDRESS),
            vec![
                vec![0x00],
                vec![0x00, 0x11],
                vec![0xFE, 5],
                vec![0x00, 0x81],
                vec![0x00, 0xA1],
            ]
        );
        assert_eq!(pwm.config().frequency_hz, 1000);
    }

    #[test]
    fn test_set_pwm_payload() {
        let (mut pwm, bus) = open();
        pwm.set_pwm(3, 0x123, 0xABC).unwrap();
        pwm.set_pwm(15, 0, 4095).unwrap();

        assert_eq!(
            bus.writes_to(PCA9685_ADDRESS),
            vec![vec![0x12, 0x23, 0x01, 0xBC, 0x0A], vec![0x42, 0x00, 0x00, 0xFF, 0x0F]]
        );
    }

    #[test]
    fn test_invalid_channel_dropped() {
        let (mut pwm, bus) = open();
        assert_eq!(pwm.set_pwm(16, 0, 100), Ok(()));
        assert_eq!(pwm.set_pwm(255, 0, 100), Ok(()));
        assert!(bus.transactions().is_empty());
    }

    #[test]
    fn test_drive_motor_over_bus() {
        let (mut pwm, bus) = open();
        pwm.run_motor(Motor::M1, Direction::Clockwise, 128).unwrap();

        // channel 7 gets 2048, channel 6 is released
        assert_eq!(
            bus.writes_to(PCA9685_ADDRESS),
            vec![vec![0x22, 0, 0, 0x00, 0x08], vec![0x1E, 0, 0, 0, 0]]
        );
    }

    #[test]
    fn test_drive_servo_over_bus() {
        let (mut pwm, bus) = open();
        pwm.servo(Servo::S1, 90).unwrap();

        // channel 8, off = 307
        assert_eq!(
            bus.writes_to(PCA9685_ADDRESS),
            vec![vec![0x26, 0, 0, 0x33, 0x01]]
        );
    }

    #[test]
    fn test_mecanum_and_stepper_write_counts() {
        let (mut pwm, bus) = open();
        pwm.run_mecanum(MecanumDirection::Forward, 100).unwrap();
        assert_eq!(bus.writes_to(PCA9685_ADDRESS).len(), 8);

        bus.clear();
        pwm.stepper(StepperPair::M3M4, StepperModel::Byj28, Direction::Clockwise)
            .unwrap();
        // BYJ28 phase A on channel 0
        assert_eq!(
            bus.writes_to(PCA9685_ADDRESS)[0],
            vec![0x06, 0xFF, 0x07, 0xFF, 0x0F]
        );
    }

    #[test]
    fn test_bus_error_propagates() {
        let (mut pwm, bus) = open();
        bus.fail_next();
        assert!(pwm.stop_all().is_err());
    }
}
