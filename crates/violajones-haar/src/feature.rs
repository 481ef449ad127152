//! Haar features
//!
//! A [`HaarFeature`] is a window size plus two sets of rectangles in
//! window-local coordinates. Its value on a window is the pixel sum under
//! the positive rectangles minus the pixel sum under the negative ones.
//! No normalization is applied.

use crate::error::{HaarError, HaarResult};
use violajones_core::{Box, Boxa, IntegralImage, Sample, SummedArea};

/// A signed combination of rectangles inside a `width x height` window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HaarFeature {
    width: u32,
    height: u32,
    positive: Boxa,
    negative: Boxa,
}

impl HaarFeature {
    /// Create a feature from its rectangle sets.
    ///
    /// Rectangles are kept verbatim, in the given order. Either set may be
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns [`HaarError::InvalidParameter`] for a zero-sized window and
    /// [`HaarError::RectOutsideWindow`] if any rectangle is empty or does
    /// not lie inside the window.
    pub fn new(width: u32, height: u32, positive: Boxa, negative: Boxa) -> HaarResult<Self> {
        if width == 0 || height == 0 {
            return Err(HaarError::InvalidParameter(format!(
                "feature window must be non-empty, got {}x{}",
                width, height
            )));
        }
        if let Some(rect) = positive
            .iter()
            .chain(negative.iter())
            .find(|r| !r.fits_within(width, height))
        {
            return Err(HaarError::RectOutsideWindow {
                rect: *rect,
                width,
                height,
            });
        }
        Ok(Self::from_parts(width, height, positive, negative))
    }

    /// Assemble a feature whose rectangles are known to fit.
    pub(crate) fn from_parts(width: u32, height: u32, positive: Boxa, negative: Boxa) -> Self {
        HaarFeature {
            width,
            height,
            positive,
            negative,
        }
    }

    /// Window size as `(width, height)`.
    pub fn window(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Rectangles counted with a plus sign.
    pub fn positive(&self) -> &Boxa {
        &self.positive
    }

    /// Rectangles counted with a minus sign.
    pub fn negative(&self) -> &Boxa {
        &self.negative
    }

    /// Total number of rectangles.
    pub fn rect_count(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    /// Smallest box covering every rectangle, `None` for an empty feature.
    pub fn bounding_box(&self) -> Option<Box> {
        match (self.positive.bounding_box(), self.negative.bounding_box()) {
            (Some(p), Some(n)) => Some(p.union(&n)),
            (p, n) => p.or(n),
        }
    }

    /// The same feature with x and y swapped.
    pub fn transpose(&self) -> HaarFeature {
        HaarFeature {
            width: self.height,
            height: self.width,
            positive: self.positive.iter().map(Box::transpose).collect(),
            negative: self.negative.iter().map(Box::transpose).collect(),
        }
    }

    /// Evaluate on anything that answers rectangle sums.
    ///
    /// Rectangles are read in the area's local coordinates.
    pub fn evaluate_on<S: SummedArea + ?Sized>(&self, area: &S) -> HaarResult<i64> {
        let mut value = 0i64;
        for rect in &self.positive {
            value += area.rect_sum(rect)?;
        }
        for rect in &self.negative {
            value -= area.rect_sum(rect)?;
        }
        Ok(value)
    }

    /// Evaluate on the window of `ii` whose top-left corner is `origin`.
    ///
    /// # Errors
    ///
    /// Returns a core `RectOutOfBounds` error if the window leaves the image.
    pub fn evaluate(&self, ii: &IntegralImage, origin: (u32, u32)) -> HaarResult<i64> {
        let window = ii.window(origin.0, origin.1, self.width, self.height)?;
        self.evaluate_on(&window)
    }

    /// Evaluate on a cached sample.
    ///
    /// # Errors
    ///
    /// Returns [`HaarError::WindowMismatch`] unless the sample has exactly
    /// the feature's window size.
    pub fn evaluate_sample(&self, sample: &Sample) -> HaarResult<i64> {
        let actual = sample.extent();
        if actual != self.window() {
            return Err(HaarError::WindowMismatch {
                expected: self.window(),
                actual,
            });
        }
        self.evaluate_on(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_horizontal() -> HaarFeature {
        HaarFeature::new(
            4,
            2,
            Boxa::from(vec![Box::new_unchecked(0, 0, 2, 2)]),
            Boxa::from(vec![Box::new_unchecked(2, 0, 2, 2)]),
        )
        .unwrap()
    }

    #[test]
    fn test_new_checks_geometry() {
        let inside = Boxa::from(vec![Box::new_unchecked(0, 0, 4, 2)]);
        assert!(HaarFeature::new(4, 2, inside.clone(), Boxa::new()).is_ok());
        assert!(matches!(
            HaarFeature::new(3, 2, inside, Boxa::new()),
            Err(HaarError::RectOutsideWindow { width: 3, .. })
        ));
        let empty_rect = Boxa::from(vec![Box::new_unchecked(1, 1, 0, 1)]);
        assert!(HaarFeature::new(4, 2, Boxa::new(), empty_rect).is_err());
        assert!(HaarFeature::new(0, 2, Boxa::new(), Boxa::new()).is_err());
    }

    #[test]
    fn test_evaluate_light_dark() {
        // Left half 10, right half 1
        let ii = IntegralImage::from_raw(4, 2, &[10u8, 10, 1, 1, 10, 10, 1, 1]).unwrap();
        let f = two_horizontal();
        assert_eq!(f.evaluate(&ii, (0, 0)).unwrap(), 40 - 4);
        assert_eq!(f.transpose().window(), (2, 4));
        assert!(f.evaluate(&ii, (1, 0)).is_err());
    }

    #[test]
    fn test_evaluate_sample_matches_live() {
        let values: Vec<u8> = (0..48).collect();
        let ii = IntegralImage::from_raw(8, 6, &values).unwrap();
        let f = two_horizontal();
        for (ox, oy) in [(0, 0), (3, 2), (4, 4)] {
            let sample = ii
                .vectorize_window(&Box::new_unchecked(ox as i32, oy as i32, 4, 2))
                .unwrap();
            assert_eq!(
                f.evaluate_sample(&sample).unwrap(),
                f.evaluate(&ii, (ox, oy)).unwrap()
            );
        }
        let wrong = ii.vectorize_window(&Box::new_unchecked(0, 0, 3, 2)).unwrap();
        assert!(matches!(
            f.evaluate_sample(&wrong),
            Err(HaarError::WindowMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_sets() {
        let ii = IntegralImage::from_raw(2, 2, &[5u8, 5, 5, 5]).unwrap();
        let only_neg = HaarFeature::new(
            2,
            2,
            Boxa::new(),
            Boxa::from(vec![Box::new_unchecked(0, 0, 2, 2)]),
        )
        .unwrap();
        assert_eq!(only_neg.evaluate(&ii, (0, 0)).unwrap(), -20);
        let nothing = HaarFeature::new(2, 2, Boxa::new(), Boxa::new()).unwrap();
        assert_eq!(nothing.evaluate(&ii, (0, 0)).unwrap(), 0);
        assert!(nothing.bounding_box().is_none());
    }

    #[test]
    fn test_transpose_and_bounds() {
        let f = two_horizontal();
        let t = f.transpose();
        assert_eq!(t.positive().get(0), Some(&Box::new_unchecked(0, 0, 2, 2)));
        assert_eq!(t.negative().get(0), Some(&Box::new_unchecked(0, 2, 2, 2)));
        assert_eq!(t.transpose(), f);
        assert_eq!(f.bounding_box(), Some(Box::new_unchecked(0, 0, 4, 2)));
        assert_eq!(f.rect_count(), 2);
    }
}
