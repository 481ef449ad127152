//! Feature kinds
//!
//! Each kind is a grid of tiles whose signs alternate like a
//! checkerboard: tile `(col, row)` is positive when `col + row` is even.

use crate::error::{HaarError, HaarResult};

/// The five classic Haar feature shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKind {
    /// Two tiles side by side (light | dark)
    TwoHorizontal,
    /// Two tiles stacked vertically
    TwoVertical,
    /// Three tiles side by side (light | dark | light)
    ThreeHorizontal,
    /// Three tiles stacked vertically
    ThreeVertical,
    /// 2x2 diagonal checkerboard
    Checkerboard,
}

impl FeatureKind {
    /// All kinds in index order.
    pub const ALL: [FeatureKind; 5] = [
        FeatureKind::TwoHorizontal,
        FeatureKind::TwoVertical,
        FeatureKind::ThreeHorizontal,
        FeatureKind::ThreeVertical,
        FeatureKind::Checkerboard,
    ];

    /// Look up a kind by its 1-based index.
    ///
    /// # Errors
    ///
    /// Returns [`HaarError::InvalidParameter`] outside `1..=5`.
    pub fn from_index(index: u32) -> HaarResult<Self> {
        match index {
            1..=5 => Ok(Self::ALL[(index - 1) as usize]),
            _ => Err(HaarError::InvalidParameter(format!(
                "feature kind must be 1..=5, got {}",
                index
            ))),
        }
    }

    /// 1-based index of this kind.
    pub fn index(self) -> u32 {
        match self {
            FeatureKind::TwoHorizontal => 1,
            FeatureKind::TwoVertical => 2,
            FeatureKind::ThreeHorizontal => 3,
            FeatureKind::ThreeVertical => 4,
            FeatureKind::Checkerboard => 5,
        }
    }

    /// Tile grid as `(columns, rows)`.
    pub fn tiles(self) -> (usize, usize) {
        match self {
            FeatureKind::TwoHorizontal => (2, 1),
            FeatureKind::TwoVertical => (1, 2),
            FeatureKind::ThreeHorizontal => (3, 1),
            FeatureKind::ThreeVertical => (1, 3),
            FeatureKind::Checkerboard => (2, 2),
        }
    }

    /// The kind obtained by swapping the axes.
    pub fn transposed(self) -> Self {
        match self {
            FeatureKind::TwoHorizontal => FeatureKind::TwoVertical,
            FeatureKind::TwoVertical => FeatureKind::TwoHorizontal,
            FeatureKind::ThreeHorizontal => FeatureKind::ThreeVertical,
            FeatureKind::ThreeVertical => FeatureKind::ThreeHorizontal,
            FeatureKind::Checkerboard => FeatureKind::Checkerboard,
        }
    }

    /// Sign of tile `(col, row)`.
    #[inline]
    pub fn is_positive_tile(col: usize, row: usize) -> bool {
        (col + row) % 2 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for kind in FeatureKind::ALL {
            assert_eq!(FeatureKind::from_index(kind.index()).unwrap(), kind);
        }
        assert!(FeatureKind::from_index(0).is_err());
        assert!(FeatureKind::from_index(6).is_err());
    }

    #[test]
    fn test_transposed_swaps_tiles() {
        for kind in FeatureKind::ALL {
            let (c, r) = kind.tiles();
            assert_eq!(kind.transposed().tiles(), (r, c));
            assert_eq!(kind.transposed().transposed(), kind);
        }
    }

    #[test]
    fn test_polarity_pattern() {
        assert!(FeatureKind::is_positive_tile(0, 0));
        assert!(!FeatureKind::is_positive_tile(1, 0));
        assert!(FeatureKind::is_positive_tile(2, 0));
        assert!(!FeatureKind::is_positive_tile(0, 1));
        assert!(FeatureKind::is_positive_tile(1, 1));
    }
}
