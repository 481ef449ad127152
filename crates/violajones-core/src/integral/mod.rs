//! Integral image (summed-area table)
//!
//! Cell `(x, y)` of an [`IntegralImage`] holds the sum of every source
//! pixel in `[0, x] x [0, y]`. Any axis-aligned rectangle sum then costs
//! four lookups:
//!
//! ```text
//! sum = A(x2, y2) - A(x1-1, y2) - A(x2, y1-1) + A(x1-1, y1-1)
//! ```
//!
//! where `x2 = x + w - 1`, `y2 = y + h - 1`, and any lookup at `-1`
//! contributes zero.
//!
//! Three types answer rectangle queries through the [`SummedArea`] trait:
//! the full [`IntegralImage`], a borrowed [`IntegralWindow`] into it, and
//! an owned [`Sample`] cut from it. A rectangle given in window-local
//! coordinates sums to the same value on all three.

mod sample;

pub use sample::Sample;

use crate::box_::Box;
use crate::error::{Error, Result};
use crate::pix::{Pix, PixelDepth, RgbComponent};
use log::trace;

/// Rectangle-sum queries in local coordinates.
pub trait SummedArea {
    /// `(width, height)` of the queryable area.
    fn extent(&self) -> (u32, u32);

    /// Cumulative value at local `(x, y)`.
    ///
    /// `x` may range over `-1..width` and `y` over `-1..height`; the `-1`
    /// row and column hold whatever lies just outside the area (zero at an
    /// image border). Only differences of these values are meaningful.
    ///
    /// # Panics
    ///
    /// May panic for coordinates outside that range.
    fn cumulative(&self, x: i64, y: i64) -> u64;

    /// Sum of the pixels covered by `rect`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RectOutOfBounds`] if `rect` is empty or leaves the
    /// area.
    fn rect_sum(&self, rect: &Box) -> Result<i64> {
        let (width, height) = self.extent();
        if !rect.fits_within(width, height) {
            return Err(Error::RectOutOfBounds {
                x: rect.x,
                y: rect.y,
                w: rect.w,
                h: rect.h,
                width,
                height,
            });
        }
        let x1 = rect.x as i64 - 1;
        let y1 = rect.y as i64 - 1;
        let x2 = rect.right() - 1;
        let y2 = rect.bottom() - 1;
        let sum = self.cumulative(x2, y2) as i64
            - self.cumulative(x1, y2) as i64
            - self.cumulative(x2, y1) as i64
            + self.cumulative(x1, y1) as i64;
        Ok(sum)
    }
}

/// Summed-area table over a scalar image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegralImage {
    width: u32,
    height: u32,
    data: Vec<u64>,
}

impl IntegralImage {
    /// Build the integral image of an 8 or 16 bpp image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] for 32 bpp images. Use
    /// [`IntegralImage::from_component`] or convert to gray first.
    ///
    /// # Examples
    ///
    /// ```
    /// use violajones_core::{IntegralImage, Pix};
    ///
    /// let pix = Pix::from_gray_values(2, 2, &[1, 2, 3, 4]).unwrap();
    /// let ii = IntegralImage::new(&pix).unwrap();
    /// assert_eq!(ii.at(1, 1).unwrap(), 10);
    /// ```
    pub fn new(pix: &Pix) -> Result<Self> {
        if !pix.depth().is_scalar() {
            return Err(Error::UnsupportedDepth(pix.depth().bits()));
        }
        let (w, h) = pix.dimensions();
        Ok(Self::accumulate(w, h, |x, y| {
            pix.get_pixel_unchecked(x, y) as u64
        }))
    }

    /// Build the integral image of one channel of a 32 bpp image.
    pub fn from_component(pix: &Pix, comp: RgbComponent) -> Result<Self> {
        if pix.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(pix.depth().bits()));
        }
        let (w, h) = pix.dimensions();
        Ok(Self::accumulate(w, h, |x, y| {
            comp.extract(pix.get_pixel_unchecked(x, y)) as u64
        }))
    }

    /// Build the integral image of any supported image, reducing color to
    /// luminance first.
    pub fn from_luminance(pix: &Pix) -> Result<Self> {
        Self::new(&pix.convert_to_scalar()?)
    }

    /// Build from raw row-major scalar values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either dimension is zero and
    /// [`Error::DimensionMismatch`] if `values.len() != width * height`.
    pub fn from_raw<T: Copy + Into<u64>>(width: u32, height: u32, values: &[T]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize;
        if values.len() != expected {
            let rows = (values.len() / width as usize) as u32;
            return Err(Error::DimensionMismatch {
                expected: (width, height),
                actual: (width, rows),
            });
        }
        Ok(Self::accumulate(width, height, |x, y| {
            values[y as usize * width as usize + x as usize].into()
        }))
    }

    /// Single forward pass: running row sum plus the cell above.
    fn accumulate(width: u32, height: u32, pixel: impl Fn(u32, u32) -> u64) -> Self {
        let w = width as usize;
        let mut data = vec![0u64; w * height as usize];
        for y in 0..height {
            let row = y as usize * w;
            let mut row_sum = 0u64;
            for x in 0..width {
                row_sum += pixel(x, y);
                let above = if y > 0 { data[row - w + x as usize] } else { 0 };
                data[row + x as usize] = row_sum + above;
            }
        }
        trace!(
            "integral image {}x{}: total {}",
            width,
            height,
            data.last().copied().unwrap_or(0)
        );
        IntegralImage {
            width,
            height,
            data,
        }
    }

    /// Get the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the row-major cumulative sums.
    #[inline]
    pub fn data(&self) -> &[u64] {
        &self.data
    }

    /// Sum of every pixel in the image.
    pub fn total(&self) -> u64 {
        self.data.last().copied().unwrap_or(0)
    }

    /// Cumulative sum over `[0, x] x [0, y]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PixelOutOfBounds`] outside the image.
    pub fn at(&self, x: i64, y: i64) -> Result<u64> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return Err(Error::PixelOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.at_unchecked(x as u32, y as u32))
    }

    /// Cumulative sum without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height` or `(x, y)` lands past the table.
    #[inline]
    pub fn at_unchecked(&self, x: u32, y: u32) -> u64 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Same as [`IntegralImage::at`] but zero for `x == -1` or `y == -1`.
    #[inline]
    fn at_or_zero(&self, x: i64, y: i64) -> u64 {
        if x < 0 || y < 0 {
            0
        } else {
            self.at_unchecked(x as u32, y as u32)
        }
    }

    /// Borrow a `w x h` window with origin `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RectOutOfBounds`] if the window leaves the image.
    pub fn window(&self, x: u32, y: u32, w: u32, h: u32) -> Result<IntegralWindow<'_>> {
        // Anything past i32::MAX is outside every image
        let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        let rect = Box::new_unchecked(clamp(x), clamp(y), clamp(w), clamp(h));
        self.check_rect(&rect)?;
        Ok(IntegralWindow {
            image: self,
            x,
            y,
            width: w,
            height: h,
        })
    }

    /// Copy the integral values of every pixel in `rect` into a [`Sample`].
    ///
    /// Values are taken row by row, left to right, so two calls with the
    /// same rectangle produce identical samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RectOutOfBounds`] if `rect` is empty or leaves the
    /// image.
    pub fn vectorize_window(&self, rect: &Box) -> Result<Sample> {
        self.check_rect(rect)?;
        let (x0, y0) = (rect.x as i64, rect.y as i64);
        let (w, h) = (rect.w as usize, rect.h as usize);

        let mut values = Vec::with_capacity(w * h);
        for y in y0..y0 + h as i64 {
            for x in x0..x0 + w as i64 {
                values.push(self.at_unchecked(x as u32, y as u32));
            }
        }
        // Row above includes the corner at index 0.
        let above = (x0 - 1..x0 + w as i64)
            .map(|x| self.at_or_zero(x, y0 - 1))
            .collect();
        let left = (y0..y0 + h as i64)
            .map(|y| self.at_or_zero(x0 - 1, y))
            .collect();

        Ok(Sample::from_parts(rect.w as u32, rect.h as u32, values, above, left))
    }

    fn check_rect(&self, rect: &Box) -> Result<()> {
        if rect.fits_within(self.width, self.height) {
            Ok(())
        } else {
            Err(Error::RectOutOfBounds {
                x: rect.x,
                y: rect.y,
                w: rect.w,
                h: rect.h,
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl SummedArea for IntegralImage {
    fn extent(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn cumulative(&self, x: i64, y: i64) -> u64 {
        self.at_or_zero(x, y)
    }
}

/// Borrowed window into an [`IntegralImage`].
///
/// Rectangle queries are relative to the window origin.
#[derive(Debug, Clone, Copy)]
pub struct IntegralWindow<'a> {
    image: &'a IntegralImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl<'a> IntegralWindow<'a> {
    /// Window origin in image coordinates.
    pub fn origin(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    /// The image this window borrows from.
    pub fn image(&self) -> &'a IntegralImage {
        self.image
    }

    /// Window bounds in image coordinates.
    pub fn bounds(&self) -> Box {
        Box::new_unchecked(
            self.x as i32,
            self.y as i32,
            self.width as i32,
            self.height as i32,
        )
    }

    /// Copy this window into an owned [`Sample`].
    pub fn to_sample(&self) -> Result<Sample> {
        self.image.vectorize_window(&self.bounds())
    }
}

impl SummedArea for IntegralWindow<'_> {
    fn extent(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn cumulative(&self, x: i64, y: i64) -> u64 {
        self.image.at_or_zero(self.x as i64 + x, self.y as i64 + y)
    }
}
