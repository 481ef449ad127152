//! Pix - The pixel buffer
//!
//! `Pix` is the raster every integral image is built from: 8 or 16 bpp
//! gray, or packed RGB at 32 bpp.
//!
//! Rows are stored in 32-bit words, each row starting on a word boundary,
//! with pixels packed from the most significant end. A 32 bpp pixel is
//! `R G B A` from high byte to low.
//!
//! `Pix` shares its storage through an `Arc` and is read-only. Pixels
//! are written through a [`PixMut`], which converts into a `Pix` once
//! filled.

mod access;
mod convert;
mod rgb;

pub use access::*;
pub use convert::{L_BLUE_WEIGHT, L_GREEN_WEIGHT, L_RED_WEIGHT};
pub use rgb::RgbComponent;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Bits per pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// 8-bit gray
    Bit8 = 8,
    /// 16-bit gray
    Bit16 = 16,
    /// Packed RGB(A)
    Bit32 = 32,
}

impl PixelDepth {
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// True for gray depths, whose pixels are a single intensity.
    pub fn is_scalar(self) -> bool {
        !matches!(self, PixelDepth::Bit32)
    }
}

/// File format an image was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    #[default]
    Unknown,
    Bmp,
    Png,
    /// PGM / PPM
    Pnm,
}

#[derive(Debug, Clone)]
struct PixData {
    width: u32,
    height: u32,
    depth: PixelDepth,
    /// 1 for gray, 3 for RGB, 4 when alpha is meaningful
    spp: u32,
    /// Words per row
    wpl: u32,
    informat: ImageFormat,
    data: Vec<u32>,
}

impl PixData {
    fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        let too_large = || Error::InvalidDimension { width, height };
        if width == 0 || height == 0 {
            return Err(too_large());
        }
        let wpl = words_per_line(width, depth).ok_or_else(too_large)?;
        let len = (wpl as usize)
            .checked_mul(height as usize)
            .ok_or_else(too_large)?;
        Ok(PixData {
            width,
            height,
            depth,
            spp: if depth.is_scalar() { 1 } else { 3 },
            wpl,
            informat: ImageFormat::Unknown,
            data: vec![0u32; len],
        })
    }
}

/// `None` if a row would need more than `u32::MAX` words.
#[inline]
fn words_per_line(width: u32, depth: PixelDepth) -> Option<u32> {
    let bits = u64::from(width) * u64::from(depth.bits());
    u32::try_from(bits.div_ceil(32)).ok()
}

/// Shared, read-only pixel buffer
///
/// # Examples
///
/// ```
/// use violajones_core::{Pix, PixelDepth};
///
/// let pix = Pix::new(24, 24, PixelDepth::Bit8).unwrap();
/// assert_eq!(pix.dimensions(), (24, 24));
/// assert_eq!(pix.get_pixel(23, 23), Some(0));
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Create a zero-filled image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        Ok(PixMut::new(width, height, depth)?.into())
    }

    /// Build an 8 bpp image from row-major gray values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for an empty image and
    /// [`Error::InvalidParameter`] if `values.len() != width * height`.
    pub fn from_gray_values(width: u32, height: u32, values: &[u8]) -> Result<Self> {
        let mut pix = PixMut::new(width, height, PixelDepth::Bit8)?;
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "expected {} gray values for {}x{}, got {}",
                expected,
                width,
                height,
                values.len()
            )));
        }
        for (i, &v) in values.iter().enumerate() {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            pix.set_pixel_unchecked(x, y, v as u32);
        }
        Ok(pix.into())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.spp
    }

    /// Words per row.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Format the image was read from, `Unknown` if it was built in memory.
    #[inline]
    pub fn informat(&self) -> ImageFormat {
        self.inner.informat
    }

    /// Packed words, row after row.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Packed words of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let wpl = self.inner.wpl as usize;
        &self.inner.data[y as usize * wpl..][..wpl]
    }

    /// Same width, height and depth.
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.dimensions() == other.dimensions() && self.depth() == other.depth()
    }

    /// A copy that does not share storage with `self`.
    pub fn deep_clone(&self) -> Self {
        Pix {
            inner: Arc::new((*self.inner).clone()),
        }
    }

    /// A writable copy.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: (*self.inner).clone(),
        }
    }
}

/// Exclusively owned, writable pixel buffer
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Create a zero-filled image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0 or a
    /// row does not fit in memory.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        Ok(PixMut {
            inner: PixData::new(width, height, depth)?,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    pub fn set_informat(&mut self, format: ImageFormat) {
        self.inner.informat = format;
    }

    pub fn set_spp(&mut self, spp: u32) {
        self.inner.spp = spp;
    }

    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Packed words of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data_mut(&mut self, y: u32) -> &mut [u32] {
        let wpl = self.inner.wpl as usize;
        &mut self.inner.data[y as usize * wpl..][..wpl]
    }
}

impl From<PixMut> for Pix {
    fn from(pix_mut: PixMut) -> Self {
        Pix {
            inner: Arc::new(pix_mut.inner),
        }
    }
}
