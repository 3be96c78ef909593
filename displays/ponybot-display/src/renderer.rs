//! Text and shape rendering
//!
//! Everything here draws into the framebuffer first. Single pixels and
//! normal-size glyphs are then streamed as just the bytes they touched;
//! shapes and scrolls send one full frame when they are done. With
//! `auto_flush` off nothing is sent until [`Ssd1306::flush`].

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_hal::i2c::I2c;
use heapless::String;

use crate::font::{glyph, GLYPH_WIDTH};
use crate::framebuffer::{Framebuffer, DATA_HEADER, HEIGHT, PAGES, WIDTH};
use crate::ssd1306::{Cursor, Ssd1306};

/// Column step of a normal glyph (5 columns + spacing)
pub const CHAR_ADVANCE: u8 = 6;

/// Column step of a double-size glyph
pub const DOUBLE_CHAR_ADVANCE: u8 = 12;

/// Rightmost column a printed line may reach
const PRINT_LIMIT: u8 = 126;

impl<I2C> Ssd1306<I2C>
where
    I2C: I2c,
{
    fn advance(&self) -> u8 {
        if self.config.double_size {
            DOUBLE_CHAR_ADVANCE
        } else {
            CHAR_ADVANCE
        }
    }

    fn glyph_pages(&self) -> u8 {
        if self.config.double_size {
            2
        } else {
            1
        }
    }

    /// Set one pixel and stream the byte holding it
    pub fn pixel(&mut self, x: u8, y: u8, color: BinaryColor) -> Result<(), I2C::Error> {
        match self.buffer.set_pixel(x, y, color.is_on()) {
            Some(index) if self.config.auto_flush => self.flush_byte(index),
            _ => Ok(()),
        }
    }

    /// Draw one character with its top-left corner at pixel column `col`, page `row`
    ///
    /// `BinaryColor::Off` draws the glyph inverted (light background).
    pub fn draw_char(
        &mut self,
        ch: char,
        col: u8,
        row: u8,
        color: BinaryColor,
    ) -> Result<(), I2C::Error> {
        if self.config.double_size {
            self.draw_char_double(ch, col, row, color);
            return Ok(());
        }

        let mask = if color.is_on() { 0x00 } else { 0xFF };
        let start = Framebuffer::column_index(col, row);
        for (i, &bits) in glyph(ch).iter().enumerate() {
            self.buffer.set_byte(start + i, bits ^ mask);
        }
        self.buffer.set_byte(start + GLYPH_WIDTH, mask);

        if !self.config.auto_flush || row as usize >= PAGES {
            return Ok(());
        }

        // Header + 6 columns, or 12 when every column is doubled
        let mut frame = [DATA_HEADER; 1 + 2 * (GLYPH_WIDTH + 1)];
        let len = if self.config.zoom {
            for i in 0..=GLYPH_WIDTH {
                let byte = self.buffer.byte(start + i);
                frame[1 + 2 * i] = byte;
                frame[2 + 2 * i] = byte;
            }
            frame.len()
        } else {
            for i in 0..=GLYPH_WIDTH {
                frame[1 + i] = self.buffer.byte(start + i);
            }
            GLYPH_WIDTH + 2
        };

        self.set_position(col, row)?;
        self.i2c.write(self.config.address, &frame[..len])
    }

    /// 10x16 glyph from 2x2 blocks; not flushed
    fn draw_char_double(&mut self, ch: char, col: u8, row: u8, color: BinaryColor) {
        let top = row as u16 * 8;
        let left = col as u16;
        let columns = glyph(ch).iter().copied().chain(core::iter::once(0));

        for (i, bits) in columns.enumerate() {
            for j in 0..8u16 {
                let on = (bits >> j) & 1 == 1;
                let lit = on == color.is_on();
                let x = left + 2 * i as u16;
                let y = top + 2 * j;
                for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    if let (Ok(px), Ok(py)) = (u8::try_from(x + dx), u8::try_from(y + dy)) {
                        self.buffer.set_pixel(px, py, lit);
                    }
                }
            }
        }
    }

    /// Draw text from (`col`, `row`) without wrapping
    pub fn draw_string(
        &mut self,
        text: &str,
        col: u8,
        row: u8,
        color: BinaryColor,
    ) -> Result<(), I2C::Error> {
        let advance = self.advance();
        let mut x = col;
        for ch in text.chars() {
            self.draw_char(ch, x, row, color)?;
            x = x.saturating_add(advance);
        }

        if self.config.double_size {
            self.auto_flush()?;
        }
        Ok(())
    }

    /// Draw a number in decimal from (`col`, `row`)
    pub fn draw_number(
        &mut self,
        value: i32,
        col: u8,
        row: u8,
        color: BinaryColor,
    ) -> Result<(), I2C::Error> {
        self.draw_string(&number_text(value), col, row, color)
    }

    /// Print text at the cursor, wrapping and scrolling as needed
    ///
    /// With `newline` the cursor moves to the start of the next line afterwards.
    pub fn print_string(
        &mut self,
        text: &str,
        color: BinaryColor,
        newline: bool,
    ) -> Result<(), I2C::Error> {
        let advance = self.advance();
        for ch in text.chars() {
            self.draw_char(ch, self.cursor.col, self.cursor.row, color)?;
            self.cursor.col = self.cursor.col.saturating_add(advance);
            if self.cursor.col > PRINT_LIMIT - advance {
                self.newline()?;
            }
        }

        if newline {
            self.newline()?;
        }
        if self.config.double_size {
            self.auto_flush()?;
        }
        Ok(())
    }

    /// Print a number at the cursor
    pub fn print_number(
        &mut self,
        value: i32,
        color: BinaryColor,
        newline: bool,
    ) -> Result<(), I2C::Error> {
        self.print_string(&number_text(value), color, newline)
    }

    /// Move the cursor to the next line, scrolling at the bottom
    pub fn newline(&mut self) -> Result<(), I2C::Error> {
        let pages = self.glyph_pages();
        let last_row = PAGES as u8 - pages;

        self.cursor.col = 0;
        self.cursor.row += pages;
        if self.cursor.row > last_row {
            trace!("Scrolling {=u8} page(s)", pages);
            self.cursor.row = last_row;
            self.buffer.scroll_up(pages as usize);
            self.auto_flush()?;
        }
        Ok(())
    }

    /// Move the text cursor (column in pixels, row in pages)
    pub fn set_cursor(&mut self, col: u8, row: u8) {
        self.cursor = Cursor {
            col,
            row: row.min(PAGES as u8 - self.glyph_pages()),
        };
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Horizontal line of `len` pixels starting at (`x`, `y`)
    pub fn hline(&mut self, x: i16, y: i16, len: i16, color: BinaryColor) -> Result<(), I2C::Error> {
        self.fill_hline(x, y, len, color);
        self.auto_flush()
    }

    /// Vertical line of `len` pixels starting at (`x`, `y`)
    pub fn vline(&mut self, x: i16, y: i16, len: i16, color: BinaryColor) -> Result<(), I2C::Error> {
        self.fill_vline(x, y, len, color);
        self.auto_flush()
    }

    /// Straight line between two points (Bresenham)
    pub fn line(
        &mut self,
        x0: i16,
        y0: i16,
        x1: i16,
        y1: i16,
        color: BinaryColor,
    ) -> Result<(), I2C::Error> {
        let (mut x, mut y) = (x0 as i32, y0 as i32);
        let (x1, y1) = (x1 as i32, y1 as i32);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }

        self.auto_flush()
    }

    /// Rectangle outline through two opposite corners
    pub fn rect(
        &mut self,
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
        color: BinaryColor,
    ) -> Result<(), I2C::Error> {
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (top, bottom) = (y1.min(y2), y1.max(y2));
        let width = right.saturating_sub(left).saturating_add(1);
        let height = bottom.saturating_sub(top).saturating_add(1);

        self.fill_hline(left, top, width, color);
        self.fill_hline(left, bottom, width, color);
        self.fill_vline(left, top, height, color);
        self.fill_vline(right, top, height, color);
        self.auto_flush()
    }

    /// Blank the screen and home the cursor
    pub fn clear(&mut self) -> Result<(), I2C::Error> {
        self.cursor = Cursor::default();
        self.buffer.clear();
        self.auto_flush()
    }

    fn plot(&mut self, x: i32, y: i32, color: BinaryColor) {
        if let (Ok(x), Ok(y)) = (u8::try_from(x), u8::try_from(y)) {
            self.buffer.set_pixel(x, y, color.is_on());
        }
    }

    fn fill_hline(&mut self, x: i16, y: i16, len: i16, color: BinaryColor) {
        if !(0..HEIGHT as i32).contains(&(y as i32)) {
            return;
        }
        let start = (x as i32).max(0);
        let end = (x as i32 + len as i32).min(WIDTH as i32);
        for px in start..end {
            self.plot(px, y as i32, color);
        }
    }

    fn fill_vline(&mut self, x: i16, y: i16, len: i16, color: BinaryColor) {
        if !(0..WIDTH as i32).contains(&(x as i32)) {
            return;
        }
        let start = (y as i32).max(0);
        let end = (y as i32 + len as i32).min(HEIGHT as i32);
        for py in start..end {
            self.plot(x as i32, py, color);
        }
    }
}

fn number_text(value: i32) -> String<12> {
    let mut text = String::new();
    // i32::MIN is 11 characters
    let _ = write!(text, "{}", value);
    text
}
