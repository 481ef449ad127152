//! Pixel access functions
//!
//! Low-level functions for getting and setting individual pixels.
//!
//! # Pixel packing
//!
//! Pixels are packed MSB-to-LSB within each 32-bit word. In an 8-bit
//! image, pixel 0 occupies bits 24..32 of the first word; in a 16-bit
//! image it occupies bits 16..32.

use super::{Pix, PixMut, PixelDepth};
use crate::color;
use crate::error::{Error, Result};

#[inline]
fn read_packed(line: &[u32], depth: PixelDepth, x: u32) -> u32 {
    match depth {
        PixelDepth::Bit8 => get_data_byte(line, x),
        PixelDepth::Bit16 => get_data_two_bytes(line, x),
        PixelDepth::Bit32 => get_data_four_bytes(line, x),
    }
}

#[inline]
fn write_packed(line: &mut [u32], depth: PixelDepth, x: u32, val: u32) {
    match depth {
        PixelDepth::Bit8 => set_data_byte(line, x, val),
        PixelDepth::Bit16 => set_data_two_bytes(line, x, val),
        PixelDepth::Bit32 => set_data_four_bytes(line, x, val),
    }
}

fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Error {
    Error::PixelOutOfBounds {
        x: x as i64,
        y: y as i64,
        width,
        height,
    }
}

impl Pix {
    /// Get a pixel value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`, or if `x` falls past the row's words.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        read_packed(self.row_data(y), self.depth(), x)
    }

    /// Get RGB values at (x, y).
    ///
    /// Only valid for 32-bit images.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if self.depth() != PixelDepth::Bit32 {
            return None;
        }
        self.get_pixel(x, y).map(color::extract_rgb)
    }
}

impl PixMut {
    /// Get a pixel value at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        let start = (y * self.wpl()) as usize;
        let line = &self.data()[start..start + self.wpl() as usize];
        read_packed(line, self.depth(), x)
    }

    /// Set a pixel value at (x, y).
    ///
    /// The value is masked to the image depth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PixelOutOfBounds`] if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(out_of_bounds(x, y, self.width(), self.height()));
        }
        self.set_pixel_unchecked(x, y, val);
        Ok(())
    }

    /// Set a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`, or if `x` falls past the row's words.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let depth = self.depth();
        write_packed(self.row_data_mut(y), depth, x, val);
    }

    /// Set an RGB pixel at (x, y).
    ///
    /// Only valid for 32-bit images. Alpha is set to 255.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        self.set_pixel(x, y, color::compose_rgb(r, g, b))
    }
}

/// Get an 8-bit pixel value.
#[inline]
pub fn get_data_byte(line: &[u32], x: u32) -> u32 {
    let shift = 24 - 8 * (x & 3);
    (line[(x >> 2) as usize] >> shift) & 0xff
}

/// Set an 8-bit pixel value.
#[inline]
pub fn set_data_byte(line: &mut [u32], x: u32, val: u32) {
    let shift = 24 - 8 * (x & 3);
    let word = &mut line[(x >> 2) as usize];
    *word = (*word & !(0xff << shift)) | ((val & 0xff) << shift);
}

/// Get a 16-bit pixel value.
#[inline]
pub fn get_data_two_bytes(line: &[u32], x: u32) -> u32 {
    let shift = 16 - 16 * (x & 1);
    (line[(x >> 1) as usize] >> shift) & 0xffff
}

/// Set a 16-bit pixel value.
#[inline]
pub fn set_data_two_bytes(line: &mut [u32], x: u32, val: u32) {
    let shift = 16 - 16 * (x & 1);
    let word = &mut line[(x >> 1) as usize];
    *word = (*word & !(0xffff << shift)) | ((val & 0xffff) << shift);
}

/// Get a 32-bit pixel value.
#[inline]
pub fn get_data_four_bytes(line: &[u32], x: u32) -> u32 {
    line[x as usize]
}

/// Set a 32-bit pixel value.
#[inline]
pub fn set_data_four_bytes(line: &mut [u32], x: u32, val: u32) {
    line[x as usize] = val;
}
