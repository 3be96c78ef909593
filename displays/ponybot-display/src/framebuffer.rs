//! Page-organized monochrome framebuffer
//!
//! The buffer is laid out exactly as it goes over the wire: one data
//! header byte followed by 8 pages of 128 column bytes. Bit `n` of a
//! column byte is row `n` of its page, so pixel `(x, y)` lives at
//! `x + (y >> 3) * 128 + 1`, bit `y % 8`.
//!
//! Keeping the header in the buffer lets a full flush be a single write.

use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::Pixel;

/// Display width in pixels
pub const WIDTH: usize = 128;

/// Display height in pixels
pub const HEIGHT: usize = 64;

/// Number of 8-row pages
pub const PAGES: usize = HEIGHT / 8;

/// Pixel bytes
pub const PAYLOAD_LEN: usize = WIDTH * PAGES;

/// Header + pixel bytes
pub const BUFFER_LEN: usize = PAYLOAD_LEN + 1;

/// Control byte announcing a data stream
pub const DATA_HEADER: u8 = 0x40;

/// 128x64 framebuffer with its wire header
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    bytes: [u8; BUFFER_LEN],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("lit", &self.payload().iter().map(|b| b.count_ones()).sum::<u32>())
            .finish()
    }
}

impl Framebuffer {
    /// Blank buffer
    pub const fn new() -> Self {
        let mut bytes = [0; BUFFER_LEN];
        bytes[0] = DATA_HEADER;
        Self { bytes }
    }

    /// Byte index of pixel `(x, y)`
    pub const fn index(x: u8, y: u8) -> usize {
        x as usize + (y as usize >> 3) * WIDTH + 1
    }

    /// Byte index of column `col` in `page`
    pub const fn column_index(col: u8, page: u8) -> usize {
        col as usize + page as usize * WIDTH + 1
    }

    fn in_bounds(x: u8, y: u8) -> bool {
        (x as usize) < WIDTH && (y as usize) < HEIGHT
    }

    /// Set or clear a pixel
    ///
    /// Returns the index of the byte that was touched, or `None` when the
    /// pixel is off-screen (nothing is written).
    pub fn set_pixel(&mut self, x: u8, y: u8, on: bool) -> Option<usize> {
        if !Self::in_bounds(x, y) {
            return None;
        }
        let index = Self::index(x, y);
        let mask = 1 << (y % 8);
        if on {
            self.bytes[index] |= mask;
        } else {
            self.bytes[index] &= !mask;
        }
        Some(index)
    }

    /// Whether a pixel is lit (off-screen pixels read as dark)
    pub fn pixel(&self, x: u8, y: u8) -> bool {
        Self::in_bounds(x, y) && self.bytes[Self::index(x, y)] & (1 << (y % 8)) != 0
    }

    /// Raw byte at `index` (0 is the header)
    pub fn byte(&self, index: usize) -> u8 {
        self.bytes.get(index).copied().unwrap_or(0)
    }

    /// Overwrite a pixel byte; the header and anything past the end are left alone
    pub fn set_byte(&mut self, index: usize, value: u8) {
        if (1..BUFFER_LEN).contains(&index) {
            self.bytes[index] = value;
        }
    }

    /// Blank every pixel and restore the header
    pub fn clear(&mut self) {
        self.bytes.fill(0);
        self.bytes[0] = DATA_HEADER;
    }

    /// Move the image up by `pages`, blanking the pages uncovered at the bottom
    pub fn scroll_up(&mut self, pages: usize) {
        let shift = (pages * WIDTH).min(PAYLOAD_LEN);
        self.bytes.copy_within(1 + shift.., 1);
        self.bytes[BUFFER_LEN - shift..].fill(0);
        self.bytes[0] = DATA_HEADER;
    }

    /// Wire image: header followed by every page
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pixel bytes without the header
    pub fn payload(&self) -> &[u8] {
        &self.bytes[1..]
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u8::try_from(point.x), u8::try_from(point.y)) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }
}
