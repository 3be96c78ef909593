//! TOML configuration loading
//!
//! ```toml
//! [pwm]
//! frequency_hz = 60
//!
//! [display]
//! double_size = true
//! ```
//!
//! Missing sections and keys keep their defaults.

use super::types::{BoardConfig, ConfigError};

/// Parse and validate a board configuration
pub fn parse_config(input: &str) -> Result<BoardConfig, ConfigError> {
    let config: BoardConfig = ::toml::from_str(input).map_err(|_| {
        warn!("Board config is not valid TOML");
        ConfigError::Syntax
    })?;
    config.validate()?;
    debug!(
        "Board config: pwm @ {=u8:#x} {=u16} Hz, display @ {=u8:#x}",
        config.pwm.address,
        config.pwm.frequency_hz,
        config.display.address
    );
    Ok(config)
}
