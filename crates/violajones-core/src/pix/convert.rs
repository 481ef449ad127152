//! Depth conversion
//!
//! Color images are reduced to a single gray channel before an integral
//! image is built from them.

use super::{Pix, PixMut, PixelDepth};
use crate::color;
use crate::error::{Error, Result};

/// Default red weight for luminance conversion
pub const L_RED_WEIGHT: f32 = 0.3;
/// Default green weight for luminance conversion
pub const L_GREEN_WEIGHT: f32 = 0.5;
/// Default blue weight for luminance conversion
pub const L_BLUE_WEIGHT: f32 = 0.2;

impl Pix {
    /// Reduce 32 bpp color to 8 bpp gray as `0.3 R + 0.5 G + 0.2 B`.
    pub fn convert_rgb_to_luminance(&self) -> Result<Pix> {
        self.convert_rgb_to_gray(0.0, 0.0, 0.0)
    }

    /// Reduce 32 bpp color to 8 bpp gray with the given channel weights.
    ///
    /// All-zero weights select the luminance weights. Other weights are
    /// scaled to sum to 1.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedDepth`] unless the image is 32 bpp, and
    /// [`Error::InvalidParameter`] for a negative weight.
    pub fn convert_rgb_to_gray(&self, rwt: f32, gwt: f32, bwt: f32) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        if [rwt, gwt, bwt].iter().any(|&w| w < 0.0) {
            return Err(Error::InvalidParameter(format!(
                "negative channel weight in ({}, {}, {})",
                rwt, gwt, bwt
            )));
        }

        let sum = rwt + gwt + bwt;
        let [rwt, gwt, bwt] = if sum == 0.0 {
            [L_RED_WEIGHT, L_GREEN_WEIGHT, L_BLUE_WEIGHT]
        } else {
            [rwt / sum, gwt / sum, bwt / sum]
        };
        let to_gray = |pixel: u32| {
            let (r, g, b) = color::extract_rgb(pixel);
            let val = rwt * r as f32 + gwt * g as f32 + bwt * b as f32;
            (val + 0.5).min(255.0) as u32
        };

        let (w, h) = self.dimensions();
        let mut gray = PixMut::new(w, h, PixelDepth::Bit8)?;
        gray.set_informat(self.informat());
        for y in 0..h {
            for x in 0..w {
                gray.set_pixel_unchecked(x, y, to_gray(self.get_pixel_unchecked(x, y)));
            }
        }
        Ok(gray.into())
    }

    /// Get a scalar (8 or 16 bpp) view of this image.
    ///
    /// Scalar images are returned as a shared clone; 32 bpp images are
    /// reduced with [`Pix::convert_rgb_to_luminance`].
    pub fn convert_to_scalar(&self) -> Result<Pix> {
        if self.depth().is_scalar() {
            Ok(self.clone())
        } else {
            self.convert_rgb_to_luminance()
        }
    }
}
