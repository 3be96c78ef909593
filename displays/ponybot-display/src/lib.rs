//! SSD1306 OLED rendering for the Pony Bot board
//!
//! This crate provides:
//! - [`Framebuffer`]: the 128x64 page-organized bitmap, laid out exactly as it
//!   is sent to the panel, with an `embedded-graphics` `DrawTarget`
//! - [`Ssd1306`]: the I2C driver that owns a framebuffer and a text cursor
//! - 5x7 text, pixel, line and rectangle drawing with incremental flushes
//!
//! # Architecture
//!
//! ```text
//! draw_char / pixel ──► Framebuffer ──► only the touched bytes ──► I2C
//! lines / rect / scroll ──► Framebuffer ──► one full frame ──────► I2C
//! ```
//!
//! Rendering modes (`double_size`, `zoom`, `auto_flush`) come from
//! [`DisplayConfig`] and are fixed when the display is opened.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod font;
pub mod framebuffer;
pub mod renderer;
pub mod ssd1306;

// Re-export key types
pub use embedded_graphics::pixelcolor::BinaryColor;
pub use framebuffer::{Framebuffer, BUFFER_LEN, HEIGHT, PAGES, WIDTH};
pub use ponybot_core::config::DisplayConfig;
pub use renderer::{CHAR_ADVANCE, DOUBLE_CHAR_ADVANCE};
pub use ssd1306::{Cursor, Ssd1306};
