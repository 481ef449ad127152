//! Feature generation
//!
//! A [`FeatureGenerator`] enumerates every placement of one
//! [`FeatureKind`] inside a window. Each tile column has its own width and
//! each tile row its own height, so a placement is one *axis layout* per
//! axis: a tuple of tile sizes plus an offset.
//!
//! For an axis of length `L` split into `n` tiles there are
//! `C(L + 1, n + 1)` layouts, and the number of features is the product
//! of the two axis counts. A 24x24 window holds 690000 features of kind 1.
//!
//! Size tuples come from a [`Odometer`] whose digit `d` stands for a
//! size of `d + 1`, filtered to tuples that fit the axis.

use crate::classifier::WeakClassifier;
use crate::error::{HaarError, HaarResult};
use crate::feature::HaarFeature;
use crate::kind::FeatureKind;
use crate::odometer::Odometer;
use log::debug;
use violajones_core::{Box, Boxa};

/// Options for generating features over several kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Window width in pixels (default: 24)
    pub window_width: u32,

    /// Window height in pixels (default: 24)
    pub window_height: u32,

    /// Kinds to generate, in order (default: all five)
    pub kinds: Vec<FeatureKind>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            window_width: 24,
            window_height: 24,
            kinds: FeatureKind::ALL.to_vec(),
        }
    }
}

impl GeneratorOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window size
    pub fn with_window(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set the kinds to generate
    pub fn with_kinds(mut self, kinds: impl Into<Vec<FeatureKind>>) -> Self {
        self.kinds = kinds.into();
        self
    }

    /// Validate options
    pub fn validate(&self) -> HaarResult<()> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(HaarError::InvalidParameter(
                "window size must be positive".to_string(),
            ));
        }
        if self.kinds.is_empty() {
            return Err(HaarError::InvalidParameter(
                "at least one feature kind is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Most tiles any kind places along one axis.
const MAX_TILES: usize = 3;

/// Tile sizes along one axis plus the offset of the first tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AxisLayout {
    offset: u32,
    tiles: usize,
    sizes: [u32; MAX_TILES],
}

impl AxisLayout {
    fn sizes(&self) -> &[u32] {
        &self.sizes[..self.tiles]
    }

    /// `(start, size)` of every tile.
    fn spans(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.sizes().iter().scan(self.offset, |start, &size| {
            let span = (*start, size);
            *start += size;
            Some(span)
        })
    }
}

/// Every layout of some number of tiles on one axis.
///
/// Only the size tuples are stored; layout `i` is found by locating its
/// tuple in `starts`, the remainder being the offset.
#[derive(Debug, Clone)]
struct AxisLayouts {
    tiles: usize,
    sizes: Vec<[u32; MAX_TILES]>,
    /// Index of the first layout of each tuple, then the total.
    starts: Vec<usize>,
}

impl AxisLayouts {
    /// Layouts of `tiles` tiles on an axis of length `len`.
    fn new(len: u32, tiles: usize) -> Self {
        let mut layouts = AxisLayouts {
            tiles,
            sizes: Vec::new(),
            starts: vec![0],
        };
        if len == 0 || tiles == 0 || tiles > MAX_TILES {
            return layouts;
        }

        let len = len as usize;
        let mut odometer = Odometer::new(tiles, len - 1);
        loop {
            // Tiles are at least 1 wide, so a prefix that already leaves
            // too little room rules out every tuple sharing it.
            let mut extent = 0;
            let overflow = odometer.digits().iter().enumerate().position(|(i, &d)| {
                extent += d + 1;
                extent + (tiles - 1 - i) > len
            });
            let more = match overflow {
                Some(i) => odometer.carry_from(i),
                None => {
                    let mut sizes = [0; MAX_TILES];
                    for (size, &d) in sizes.iter_mut().zip(odometer.digits()) {
                        *size = d as u32 + 1;
                    }
                    let last = layouts.starts[layouts.starts.len() - 1];
                    layouts.sizes.push(sizes);
                    layouts.starts.push(last + (len - extent) + 1);
                    odometer.advance()
                }
            };
            if !more {
                break;
            }
        }
        layouts
    }

    fn len(&self) -> usize {
        self.starts[self.starts.len() - 1]
    }

    /// Layout number `index`, ordered by size tuple then offset.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    fn get(&self, index: usize) -> AxisLayout {
        let tuple = self.starts.partition_point(|&start| start <= index) - 1;
        AxisLayout {
            offset: (index - self.starts[tuple]) as u32,
            tiles: self.tiles,
            sizes: self.sizes[tuple],
        }
    }

    fn iter(&self) -> impl Iterator<Item = AxisLayout> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }
}

/// `C(n, k)` in u64, exact for the window sizes used here.
fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1u64, |acc, i| acc * (n - i) / (i + 1))
}

/// Number of features of `kind` in a `width x height` window, computed
/// without enumerating them.
pub fn count_features(width: u32, height: u32, kind: FeatureKind) -> u64 {
    let (cols, rows) = kind.tiles();
    let axis = |len: u32, tiles: usize| {
        if len == 0 {
            0
        } else {
            binomial(len as u64 + 1, tiles as u64 + 1)
        }
    };
    axis(width, cols) * axis(height, rows)
}

/// Enumerates every feature of one kind in one window size.
#[derive(Debug, Clone)]
pub struct FeatureGenerator {
    width: u32,
    height: u32,
    kind: FeatureKind,
    x_layouts: AxisLayouts,
    y_layouts: AxisLayouts,
}

impl FeatureGenerator {
    /// Prepare enumeration of `kind` over a `width x height` window.
    ///
    /// # Errors
    ///
    /// Returns [`HaarError::InvalidParameter`] for a zero-sized window.
    pub fn new(width: u32, height: u32, kind: FeatureKind) -> HaarResult<Self> {
        if width == 0 || height == 0 {
            return Err(HaarError::InvalidParameter(format!(
                "window must be non-empty, got {}x{}",
                width, height
            )));
        }
        let (cols, rows) = kind.tiles();
        let x_layouts = AxisLayouts::new(width, cols);
        let y_layouts = AxisLayouts::new(height, rows);
        debug!(
            "{:?} in {}x{}: {} x-layouts, {} y-layouts, {} features",
            kind,
            width,
            height,
            x_layouts.len(),
            y_layouts.len(),
            x_layouts.len() * y_layouts.len()
        );
        Ok(FeatureGenerator {
            width,
            height,
            kind,
            x_layouts,
            y_layouts,
        })
    }

    /// The kind being generated.
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    /// Window size as `(width, height)`.
    pub fn window(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of features, without enumerating them.
    pub fn len(&self) -> usize {
        self.x_layouts.len() * self.y_layouts.len()
    }

    /// True when the window is too small for even one feature.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lazily enumerate the features. Each call starts over.
    pub fn iter(&self) -> Features<'_> {
        Features {
            generator: self,
            next: 0,
            end: self.len(),
        }
    }

    /// Append one untrained classifier per feature to `sink`.
    ///
    /// Returns the number appended.
    pub fn generate_into<E: Extend<WeakClassifier>>(&self, sink: &mut E) -> usize {
        let count = self.len();
        sink.extend(self.iter().map(WeakClassifier::new));
        count
    }

    /// Build feature number `index` (y-layout major, x-layout minor).
    fn feature_at(&self, index: usize) -> HaarFeature {
        let nx = self.x_layouts.len();
        let x_layout = self.x_layouts.get(index % nx);
        let y_layout = self.y_layouts.get(index / nx);

        let (cols, rows) = self.kind.tiles();
        let mut positive = Boxa::with_capacity(cols * rows);
        let mut negative = Boxa::with_capacity(cols * rows);
        for (row, (y, h)) in y_layout.spans().enumerate() {
            for (col, (x, w)) in x_layout.spans().enumerate() {
                let tile = Box::new_unchecked(x as i32, y as i32, w as i32, h as i32);
                if FeatureKind::is_positive_tile(col, row) {
                    positive.push(tile);
                } else {
                    negative.push(tile);
                }
            }
        }
        HaarFeature::from_parts(self.width, self.height, positive, negative)
    }
}

impl<'a> IntoIterator for &'a FeatureGenerator {
    type Item = HaarFeature;
    type IntoIter = Features<'a>;

    fn into_iter(self) -> Features<'a> {
        self.iter()
    }
}

/// Iterator over the features of a [`FeatureGenerator`].
#[derive(Debug, Clone)]
pub struct Features<'a> {
    generator: &'a FeatureGenerator,
    next: usize,
    end: usize,
}

impl Iterator for Features<'_> {
    type Item = HaarFeature;

    fn next(&mut self) -> Option<HaarFeature> {
        if self.next >= self.end {
            return None;
        }
        let feature = self.generator.feature_at(self.next);
        self.next += 1;
        Some(feature)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<HaarFeature> {
        self.next = self.next.saturating_add(n).min(self.end);
        self.next()
    }
}

impl ExactSizeIterator for Features<'_> {}

/// Generate untrained classifiers for every kind in `options`.
///
/// Returns the total number appended to `sink`.
pub fn generate_all<E: Extend<WeakClassifier>>(
    options: &GeneratorOptions,
    sink: &mut E,
) -> HaarResult<usize> {
    options.validate()?;
    let mut total = 0;
    for &kind in &options.kinds {
        let generator = FeatureGenerator::new(options.window_width, options.window_height, kind)?;
        total += generator.generate_into(sink);
    }
    debug!(
        "generated {} classifiers for {}x{}",
        total, options.window_width, options.window_height
    );
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_axis_layout_counts() {
        // C(L+1, n+1)
        assert_eq!(AxisLayouts::new(3, 1).len(), 6);
        assert_eq!(AxisLayouts::new(3, 2).len(), 4);
        assert_eq!(AxisLayouts::new(2, 3).len(), 0);
        assert_eq!(AxisLayouts::new(24, 2).len(), 2300);
        assert_eq!(AxisLayouts::new(24, 1).len(), 300);
    }

    #[test]
    fn test_large_axis_stores_only_size_tuples() {
        let layouts = AxisLayouts::new(200, 3);
        assert_eq!(layouts.len() as u64, binomial(201, 4));
        // One entry per size tuple with sum <= 200, C(200, 3)
        assert_eq!(layouts.sizes.len() as u64, binomial(200, 3));
        let last = layouts.get(layouts.len() - 1);
        assert_eq!(last.sizes(), &[198, 1, 1]);
        assert_eq!(last.offset, 0);
    }

    #[test]
    fn test_axis_layouts_are_distinct_and_fit() {
        let layouts = AxisLayouts::new(7, 3);
        let all: Vec<AxisLayout> = layouts.iter().collect();
        let distinct: HashSet<_> = all.iter().collect();
        assert_eq!(distinct.len(), all.len());
        for l in &all {
            assert!(l.offset + l.sizes().iter().sum::<u32>() <= 7);
            assert!(l.sizes().iter().all(|&s| s >= 1));
        }
    }

    #[test]
    fn test_axis_layout_order() {
        let layouts = AxisLayouts::new(4, 2);
        let first: Vec<(u32, Vec<u32>)> = layouts
            .iter()
            .take(4)
            .map(|l| (l.offset, l.sizes().to_vec()))
            .collect();
        assert_eq!(
            first,
            vec![
                (0, vec![1, 1]),
                (1, vec![1, 1]),
                (2, vec![1, 1]),
                (0, vec![1, 2]),
            ]
        );
    }

    #[test]
    fn test_spans() {
        let layout = AxisLayout {
            offset: 2,
            tiles: 3,
            sizes: [1, 3, 2],
        };
        let spans: Vec<_> = layout.spans().collect();
        assert_eq!(spans, vec![(2, 1), (3, 3), (6, 2)]);
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(25, 3), 2300);
        assert_eq!(binomial(25, 2), 300);
        assert_eq!(binomial(4, 3), 4);
        assert_eq!(binomial(3, 4), 0);
    }

    #[test]
    fn test_checkerboard_3x3() {
        let generator = FeatureGenerator::new(3, 3, FeatureKind::Checkerboard).unwrap();
        assert_eq!(generator.len(), 16);
        assert_eq!(generator.iter().count(), 16);
        for feature in &generator {
            assert_eq!(feature.positive().len(), 2);
            assert_eq!(feature.negative().len(), 2);
        }
    }

    #[test]
    fn test_polarity_of_three_horizontal() {
        let generator = FeatureGenerator::new(3, 1, FeatureKind::ThreeHorizontal).unwrap();
        let features: Vec<_> = generator.iter().collect();
        assert_eq!(features.len(), 1);
        let f = &features[0];
        assert_eq!(
            f.positive().boxes(),
            &[Box::new_unchecked(0, 0, 1, 1), Box::new_unchecked(2, 0, 1, 1)]
        );
        assert_eq!(f.negative().boxes(), &[Box::new_unchecked(1, 0, 1, 1)]);
    }

    #[test]
    fn test_iterator_is_exact_and_restartable() {
        let generator = FeatureGenerator::new(5, 4, FeatureKind::TwoVertical).unwrap();
        let mut it = generator.iter();
        assert_eq!(it.len(), generator.len());
        it.next();
        assert_eq!(it.len(), generator.len() - 1);
        let third = generator.iter().nth(2);
        assert_eq!(third, generator.iter().nth(2));
        assert_eq!(generator.iter().nth(generator.len()), None);
    }

    #[test]
    fn test_window_too_small() {
        let generator = FeatureGenerator::new(2, 5, FeatureKind::ThreeHorizontal).unwrap();
        assert!(generator.is_empty());
        assert_eq!(generator.iter().next(), None);
        assert!(FeatureGenerator::new(0, 5, FeatureKind::TwoVertical).is_err());
    }

    #[test]
    fn test_options_validate() {
        assert!(GeneratorOptions::default().validate().is_ok());
        assert!(GeneratorOptions::new().with_window(0, 3).validate().is_err());
        let none: Vec<FeatureKind> = Vec::new();
        assert!(GeneratorOptions::new().with_kinds(none).validate().is_err());
    }

    #[test]
    fn test_generate_all_counts() {
        let options = GeneratorOptions::new()
            .with_window(4, 3)
            .with_kinds([FeatureKind::TwoHorizontal, FeatureKind::Checkerboard]);
        let mut sink = Vec::new();
        let total = generate_all(&options, &mut sink).unwrap();
        let expected = count_features(4, 3, FeatureKind::TwoHorizontal)
            + count_features(4, 3, FeatureKind::Checkerboard);
        assert_eq!(total as u64, expected);
        assert_eq!(sink.len(), total);
        assert!(sink.iter().all(|c| !c.is_trained()));
    }
}
