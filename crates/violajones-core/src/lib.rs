//! violajones-core - Basic data structures for Haar feature training
//!
//! This crate provides the fundamental data structures used throughout
//! the workspace:
//!
//! - [`Pix`] / [`PixMut`] - The pixel buffer (immutable / mutable)
//! - [`Box`] / [`Boxa`] - Rectangle regions
//! - [`IntegralImage`] - Summed-area table with O(1) rectangle sums
//! - [`Sample`] - A vectorized window cut from an integral image
//! - [`SummedArea`] - Rectangle-sum queries shared by images, windows and samples

pub mod box_;
pub mod error;
pub mod integral;
pub mod pix;

pub use box_::{Box, Boxa};
pub use error::{Error, Result};
pub use integral::{IntegralImage, IntegralWindow, Sample, SummedArea};
pub use pix::{ImageFormat, Pix, PixMut, PixelDepth, RgbComponent};

/// Packing of 32 bpp pixels as `0xRRGGBBAA`.
pub mod color {
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;
    pub const ALPHA_SHIFT: u32 = 0;

    #[inline]
    pub fn red(pixel: u32) -> u8 {
        (pixel >> RED_SHIFT) as u8
    }

    #[inline]
    pub fn green(pixel: u32) -> u8 {
        (pixel >> GREEN_SHIFT) as u8
    }

    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        (pixel >> BLUE_SHIFT) as u8
    }

    #[inline]
    pub fn alpha(pixel: u32) -> u8 {
        (pixel >> ALPHA_SHIFT) as u8
    }

    /// Opaque pixel from three channels.
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        compose_rgba(r, g, b, 0xff)
    }

    #[inline]
    pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
        u32::from_be_bytes([r, g, b, a])
    }

    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        let [r, g, b, _] = pixel.to_be_bytes();
        (r, g, b)
    }

    #[inline]
    pub fn extract_rgba(pixel: u32) -> (u8, u8, u8, u8) {
        let [r, g, b, a] = pixel.to_be_bytes();
        (r, g, b, a)
    }

}
