//! Board bring-up
//!
//! Opens the PWM bank and the OLED from one [`BoardConfig`]. The two chips
//! usually share a bus; pass two handles from `ponybot_hal::SharedBus` (or
//! any other `I2c` implementations) and they are driven independently.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use ponybot_core::config::{BoardConfig, ConfigError};
use ponybot_display::Ssd1306;

use crate::pwm::Pca9685;

/// Failure while opening the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError<P, D> {
    /// Configuration rejected before touching the bus
    Config(ConfigError),
    /// PWM bank bus error
    Pwm(P),
    /// Display bus error
    Display(D),
}

/// The Pony Bot expansion board: PWM bank plus OLED
pub struct Board<P, D> {
    pub pwm: Pca9685<P>,
    pub display: Ssd1306<D>,
}

impl<P, D> Board<P, D>
where
    P: I2c,
    D: I2c,
{
    /// Validate the configuration, then open the PWM bank and the display
    pub fn open<T: DelayNs>(
        pwm_bus: P,
        display_bus: D,
        delay: &mut T,
        config: &BoardConfig,
    ) -> Result<Self, BoardError<P::Error, D::Error>> {
        config.validate().map_err(|e| {
            warn!("Rejecting board config: {}", e);
            BoardError::Config(e)
        })?;

        let pwm = Pca9685::open(pwm_bus, delay, config.pwm).map_err(BoardError::Pwm)?;
        let display = Ssd1306::open(display_bus, config.display).map_err(BoardError::Display)?;

        debug!("Board ready");
        Ok(Self { pwm, display })
    }

    /// Give both buses back
    pub fn release(self) -> (P, D) {
        (self.pwm.release(), self.display.release())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ponybot_core::config::{PCA9685_ADDRESS, SSD1306_ADDRESS};
    use ponybot_core::drive::{Motor, NormalDirection};
    use ponybot_core::traits::DriveExt;
    use ponybot_display::BinaryColor;
    use ponybot_hal::mock::{MockDelay, MockError, MockI2c, Transaction};
    use ponybot_hal::SharedBus;

    #[test]
    fn test_open_on_shared_bus() {
        let mock = MockI2c::new();
        let shared = SharedBus::new(mock.clone());
        let mut delay = MockDelay::new();

        let mut board = Board::open(
            shared.device(),
            shared.device(),
            &mut delay,
            &BoardConfig::default(),
        )
        .unwrap();

        // PWM bring-up completes before the display's
        let log = mock.transactions();
        let first_display = log
            .iter()
            .position(|t| matches!(t, Transaction::Write { address, .. } if *address == SSD1306_ADDRESS))
            .unwrap();
        assert!(log[..first_display].iter().all(|t| match t {
            Transaction::Write { address, .. } | Transaction::Read { address, .. } =>
                *address == PCA9685_ADDRESS,
        }));
        assert_eq!(delay.total_us(), 5_000);

        mock.clear();
        board.pwm.run_normal(NormalDirection::Forward, 255).unwrap();
        board.display.print_string("GO", BinaryColor::On, true).unwrap();
        board.pwm.stop_motor(Motor::M1).unwrap();

        assert_eq!(mock.writes_to(PCA9685_ADDRESS).len(), 10);
        assert_eq!(mock.writes_to(SSD1306_ADDRESS).len(), 8);
    }

    #[test]
    fn test_invalid_config_touches_nothing() {
        let mock = MockI2c::new();
        let mut delay = MockDelay::new();
        let mut config = BoardConfig::default();
        config.display.address = config.pwm.address;

        let result = Board::open(mock.clone(), mock.clone(), &mut delay, &config);

        assert_eq!(
            result.err(),
            Some(BoardError::Config(ConfigError::AddressConflict))
        );
        assert!(mock.transactions().is_empty());
    }

    #[test]
    fn test_display_error_reported() {
        let pwm_bus = MockI2c::new();
        let display_bus = MockI2c::new();
        let mut delay = MockDelay::new();
        display_bus.fail_next();

        let result = Board::open(pwm_bus, display_bus, &mut delay, &BoardConfig::default());
        assert_eq!(result.err(), Some(BoardError::Display(MockError)));
    }

    #[test]
    fn test_release_returns_buses() {
        let mut delay = MockDelay::new();
        let board = Board::open(
            MockI2c::new(),
            MockI2c::new(),
            &mut delay,
            &BoardConfig::default(),
        )
        .unwrap();

        let (pwm_bus, display_bus) = board.release();
        assert!(!pwm_bus.transactions().is_empty());
        assert!(!display_bus.transactions().is_empty());
    }
}
