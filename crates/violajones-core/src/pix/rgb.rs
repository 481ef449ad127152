//! Single-channel planes of 32 bpp images

use super::{Pix, PixMut, PixelDepth};
use crate::color;
use crate::error::{Error, Result};

/// One byte of a packed `R G B A` pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RgbComponent {
    Red,
    Green,
    Blue,
    Alpha,
}

impl RgbComponent {
    #[inline]
    pub fn extract(self, pixel: u32) -> u8 {
        match self {
            RgbComponent::Red => color::red(pixel),
            RgbComponent::Green => color::green(pixel),
            RgbComponent::Blue => color::blue(pixel),
            RgbComponent::Alpha => color::alpha(pixel),
        }
    }
}

impl Pix {
    /// The 8 bpp plane holding one channel of a color image.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedDepth`] unless the image is 32 bpp.
    pub fn get_rgb_component(&self, comp: RgbComponent) -> Result<Pix> {
        if self.depth().is_scalar() {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }

        let (w, h) = self.dimensions();
        let mut plane = PixMut::new(w, h, PixelDepth::Bit8)?;
        plane.set_informat(self.informat());
        for y in 0..h {
            for x in 0..w {
                let byte = comp.extract(self.get_pixel_unchecked(x, y));
                plane.set_pixel_unchecked(x, y, u32::from(byte));
            }
        }
        Ok(plane.into())
    }
}
