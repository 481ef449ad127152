//! Synthetic fixture images
//!
//! Regression tests build their inputs in memory instead of loading
//! image files, so every expected value can be derived by hand.

use crate::error::{TestError, TestResult};
use violajones_core::{Pix, PixMut, PixelDepth, color};

fn build(
    name: &'static str,
    width: u32,
    height: u32,
    depth: PixelDepth,
    value: impl Fn(u32, u32) -> u32,
) -> TestResult<Pix> {
    let mut pix =
        PixMut::new(width, height, depth).map_err(|source| TestError::Fixture { name, source })?;
    for y in 0..height {
        for x in 0..width {
            pix.set_pixel_unchecked(x, y, value(x, y));
        }
    }
    Ok(pix.into())
}

/// 8 bpp image with every pixel set to `value`.
pub fn constant_pix(width: u32, height: u32, value: u8) -> TestResult<Pix> {
    build("constant", width, height, PixelDepth::Bit8, |_, _| {
        value as u32
    })
}

/// 8 bpp image whose pixel `(x, y)` is `(x + y) mod 256`.
pub fn ramp_pix(width: u32, height: u32) -> TestResult<Pix> {
    build("ramp", width, height, PixelDepth::Bit8, |x, y| (x + y) & 0xff)
}

/// 8 bpp image whose pixel `(x, y)` is `(y * width + x) mod 256`.
pub fn index_pix(width: u32, height: u32) -> TestResult<Pix> {
    build("index", width, height, PixelDepth::Bit8, |x, y| {
        (y * width + x) & 0xff
    })
}

/// 8 bpp image split at column `split`: `left` before it, `right` from it on.
pub fn split_pix(width: u32, height: u32, split: u32, left: u8, right: u8) -> TestResult<Pix> {
    if split > width {
        return Err(TestError::InvalidFixture(format!(
            "split column {} past width {}",
            split, width
        )));
    }
    build("split", width, height, PixelDepth::Bit8, |x, _| {
        if x < split { left as u32 } else { right as u32 }
    })
}

/// 32 bpp image with rows of colors given top to bottom.
pub fn rgb_rows_pix(rows: &[&[(u8, u8, u8)]]) -> TestResult<Pix> {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.len()) as u32;
    if rows.iter().any(|r| r.len() as u32 != width) {
        return Err(TestError::InvalidFixture("ragged rgb rows".into()));
    }
    build("rgb_rows", width, height, PixelDepth::Bit32, |x, y| {
        let (r, g, b) = rows[y as usize][x as usize];
        color::compose_rgb(r, g, b)
    })
}
