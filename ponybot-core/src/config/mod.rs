//! Board configuration
//!
//! Configuration types with board defaults, and (with the `toml` feature)
//! a parser for configuration files. The crate's tests enable `toml`
//! through a dev-dependency, so `cargo test` covers the parser.

#[cfg(feature = "toml")]
mod toml;
mod types;

#[cfg(feature = "toml")]
pub use self::toml::parse_config;
pub use types::*;
