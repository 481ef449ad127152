//! Vectorized window samples

use super::SummedArea;

/// A window copied out of an [`IntegralImage`](super::IntegralImage).
///
/// [`Sample::values`] holds the integral value of every window pixel,
/// row-major. The sample also keeps the integral values on the row just
/// above and the column just left of the window, so rectangle sums that
/// touch the window's top or left edge come out exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sample {
    width: u32,
    height: u32,
    values: Vec<u64>,
    /// `width + 1` values; index 0 is the corner above-left.
    above: Vec<u64>,
    /// `height` values.
    left: Vec<u64>,
}

impl Sample {
    pub(super) fn from_parts(
        width: u32,
        height: u32,
        values: Vec<u64>,
        above: Vec<u64>,
        left: Vec<u64>,
    ) -> Self {
        debug_assert_eq!(values.len(), width as usize * height as usize);
        debug_assert_eq!(above.len(), width as usize + 1);
        debug_assert_eq!(left.len(), height as usize);
        Sample {
            width,
            height,
            values,
            above,
            left,
        }
    }

    /// Window width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Window height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Integral values of the window pixels, row-major.
    #[inline]
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Number of window pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a sample cut from a real window.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SummedArea for Sample {
    fn extent(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn cumulative(&self, x: i64, y: i64) -> u64 {
        if y < 0 {
            self.above[(x + 1) as usize]
        } else if x < 0 {
            self.left[y as usize]
        } else {
            self.values[y as usize * self.width as usize + x as usize]
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::box_::Box;
    use crate::integral::{IntegralImage, SummedArea};

    fn grid() -> IntegralImage {
        let values: Vec<u16> = (1..=30).collect();
        IntegralImage::from_raw(6, 5, &values).unwrap()
    }

    #[test]
    fn test_sample_shape() {
        let sample = grid().vectorize_window(&Box::new_unchecked(2, 1, 3, 4)).unwrap();
        assert_eq!(sample.extent(), (3, 4));
        assert_eq!(sample.len(), 12);
        assert!(!sample.is_empty());
    }

    #[test]
    fn test_sample_sums_match_window() {
        let ii = grid();
        let sample = ii.vectorize_window(&Box::new_unchecked(2, 1, 3, 4)).unwrap();
        let window = ii.window(2, 1, 3, 4).unwrap();

        for y in 0..4 {
            for x in 0..3 {
                for h in 1..=4 - y {
                    for w in 1..=3 - x {
                        let r = Box::new_unchecked(x, y, w, h);
                        assert_eq!(sample.rect_sum(&r).unwrap(), window.rect_sum(&r).unwrap());
                        let global = r.translate(2, 1);
                        assert_eq!(sample.rect_sum(&r).unwrap(), ii.rect_sum(&global).unwrap());
                    }
                }
            }
        }
    }

    #[test]
    fn test_sample_at_image_corner() {
        let ii = grid();
        let sample = ii.vectorize_window(&Box::new_unchecked(0, 0, 2, 2)).unwrap();
        // 1 + 2 + 7 + 8
        assert_eq!(sample.rect_sum(&Box::new_unchecked(0, 0, 2, 2)).unwrap(), 18);
        assert_eq!(sample.values()[0], 1);
        assert!(sample.rect_sum(&Box::new_unchecked(1, 1, 2, 1)).is_err());
    }
}
