//! SSD1306 OLED driver
//!
//! Driver for the 128x64 SSD1306 on the Pony Bot board via I2C. Owns the
//! framebuffer and the text cursor; drawing operations live in
//! [`renderer`](crate::renderer).

use embedded_hal::i2c::I2c;
use ponybot_core::config::DisplayConfig;

use crate::framebuffer::{Framebuffer, DATA_HEADER};

/// SSD1306 commands
#[allow(dead_code)]
pub mod cmd {
    /// Control byte announcing a command stream
    pub const COMMAND_HEADER: u8 = 0x00;

    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const DISPLAY_RESUME: u8 = 0xA4;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_COLUMN_RANGE: u8 = 0x21;
    pub const SET_PAGE_RANGE: u8 = 0x22;
    pub const SET_ZOOM: u8 = 0xD6;
}

/// Longest command group sent in one write
const MAX_COMMAND_LEN: usize = 3;

/// Text cursor: column in pixels, row in pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    pub col: u8,
    pub row: u8,
}

/// SSD1306 OLED driver
pub struct Ssd1306<I2C> {
    pub(crate) i2c: I2C,
    pub(crate) config: DisplayConfig,
    /// Frame buffer (header + 8 pages)
    pub(crate) buffer: Framebuffer,
    pub(crate) cursor: Cursor,
}

impl<I2C> Ssd1306<I2C>
where
    I2C: I2c,
{
    /// Create a driver without touching the bus
    pub fn new(i2c: I2C, config: DisplayConfig) -> Self {
        Self {
            i2c,
            config,
            buffer: Framebuffer::new(),
            cursor: Cursor::default(),
        }
    }

    /// Create a driver and bring the panel up
    pub fn open(i2c: I2C, config: DisplayConfig) -> Result<Self, I2C::Error> {
        let mut display = Self::new(i2c, config);
        display.init()?;
        Ok(display)
    }

    /// Run the power-up sequence and blank the panel
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        debug!(
            "SSD1306 init at {=u8:#x} (double_size={}, zoom={})",
            self.config.address,
            self.config.double_size,
            self.config.zoom
        );

        let init_cmds: [&[u8]; 19] = [
            &[cmd::DISPLAY_OFF],
            &[cmd::DISPLAY_RESUME],
            &[cmd::SET_CLOCK_DIV, 0xF0],
            &[cmd::SET_MUX_RATIO, 0x3F], // 64 lines
            &[cmd::SET_DISPLAY_OFFSET, 0x00],
            &[cmd::SET_START_LINE],
            &[cmd::SET_CHARGE_PUMP, 0x14], // Enable charge pump
            &[cmd::SET_MEMORY_MODE, 0x00], // Horizontal addressing
            &[cmd::SET_COLUMN_RANGE, 0x00, 0x7F],
            &[cmd::SET_PAGE_RANGE, 0x00, 0x07],
            &[cmd::SET_SEG_REMAP],    // Flip horizontally
            &[cmd::SET_COM_SCAN_DEC], // Flip vertically
            &[cmd::SET_COM_PINS, 0x12],
            &[cmd::SET_CONTRAST, self.config.contrast],
            &[cmd::SET_PRECHARGE, 0xF1],
            &[cmd::SET_VCOM_DETECT, 0x40],
            &[cmd::SET_NORMAL],
            &[cmd::SET_ZOOM, self.config.zoom as u8],
            &[cmd::DISPLAY_ON],
        ];

        for group in init_cmds {
            self.command(group)?;
        }

        self.buffer.clear();
        self.cursor = Cursor::default();
        self.flush()
    }

    /// Send a command group as `[0x00, bytes...]`
    pub(crate) fn command(&mut self, bytes: &[u8]) -> Result<(), I2C::Error> {
        let len = bytes.len().min(MAX_COMMAND_LEN);
        let mut frame = [cmd::COMMAND_HEADER; MAX_COMMAND_LEN + 1];
        frame[1..=len].copy_from_slice(&bytes[..len]);
        self.i2c.write(self.config.address, &frame[..=len])
    }

    /// Point the panel's write address at `col` of `page`
    ///
    /// In zoom mode the column address is doubled. Only the low three bits
    /// of `page` are used.
    pub fn set_position(&mut self, col: u8, page: u8) -> Result<(), I2C::Error> {
        let c = col as u16 * if self.config.zoom { 2 } else { 1 };
        self.command(&[cmd::SET_PAGE_ADDR | (page & 0x07)])?;
        self.command(&[cmd::SET_LOW_COLUMN | (c & 0x0F) as u8])?;
        self.command(&[cmd::SET_HIGH_COLUMN | (c >> 4) as u8])
    }

    /// Send the whole framebuffer
    pub fn flush(&mut self) -> Result<(), I2C::Error> {
        self.set_position(0, 0)?;
        self.i2c.write(self.config.address, self.buffer.as_bytes())
    }

    /// Stream one framebuffer byte to its place on the panel
    pub(crate) fn flush_byte(&mut self, index: usize) -> Result<(), I2C::Error> {
        let offset = index.saturating_sub(1);
        let col = (offset % crate::framebuffer::WIDTH) as u8;
        let page = (offset / crate::framebuffer::WIDTH) as u8;
        let byte = self.buffer.byte(index);

        self.set_position(col, page)?;
        if self.config.zoom {
            self.i2c.write(self.config.address, &[DATA_HEADER, byte, byte])
        } else {
            self.i2c.write(self.config.address, &[DATA_HEADER, byte])
        }
    }

    /// Full flush when auto-flush is enabled
    pub(crate) fn auto_flush(&mut self) -> Result<(), I2C::Error> {
        if self.config.auto_flush {
            self.flush()
        } else {
            Ok(())
        }
    }

    /// Invert display colors
    pub fn invert(&mut self, inverted: bool) -> Result<(), I2C::Error> {
        if inverted {
            self.command(&[cmd::SET_INVERSE])
        } else {
            self.command(&[cmd::SET_NORMAL])
        }
    }

    /// Turn display on/off
    pub fn set_display_on(&mut self, on: bool) -> Result<(), I2C::Error> {
        if on {
            self.command(&[cmd::DISPLAY_ON])
        } else {
            self.command(&[cmd::DISPLAY_OFF])
        }
    }

    /// Set display contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), I2C::Error> {
        self.config.contrast = contrast;
        self.command(&[cmd::SET_CONTRAST, contrast])
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.buffer
    }

    /// Framebuffer for direct drawing (for example with embedded-graphics);
    /// call [`flush`](Self::flush) to show the result
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.buffer
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }
}
