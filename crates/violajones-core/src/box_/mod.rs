//! Box, Boxa - Rectangle regions
//!
//! A [`Box`] describes every rectangle in the workspace: integral-image
//! queries, sample windows and the tiles of a Haar feature. A [`Boxa`]
//! keeps boxes in insertion order; features hold one for each sign.

use crate::error::{Error, Result};

/// An axis-aligned rectangle `(x, y, w, h)`.
///
/// Coordinates are signed so offsets and the `-1` neighbours of
/// summed-area lookups stay representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Box {
    /// Left column
    pub x: i32,
    /// Top row
    pub y: i32,
    /// Width in pixels
    pub w: i32,
    /// Height in pixels
    pub h: i32,
}

impl Box {
    /// Create a box, rejecting negative sizes.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "box size must be non-negative, got {}x{}",
                w, h
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// Create a box without validation.
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// One past the last column.
    ///
    /// Widened to `i64` so that no `i32` box overflows.
    #[inline]
    pub fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    /// One past the last row.
    #[inline]
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    /// True if the box covers no pixel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// True if the box is non-empty and inside `[0, width) x [0, height)`.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        !self.is_empty()
            && self.x >= 0
            && self.y >= 0
            && self.right() <= width as i64
            && self.bottom() <= height as i64
    }

    /// Smallest box covering both.
    ///
    /// A size beyond `i32::MAX` saturates.
    pub fn union(&self, other: &Box) -> Box {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let size = |far: i64, near: i32| i32::try_from(far - near as i64).unwrap_or(i32::MAX);
        Box {
            x,
            y,
            w: size(self.right().max(other.right()), x),
            h: size(self.bottom().max(other.bottom()), y),
        }
    }

    /// The box moved by `(dx, dy)`.
    pub fn translate(&self, dx: i32, dy: i32) -> Box {
        Box {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Mirror about the main diagonal.
    pub fn transpose(&self) -> Box {
        Box {
            x: self.y,
            y: self.x,
            w: self.h,
            h: self.w,
        }
    }
}

/// Ordered list of boxes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Boxa {
    boxes: Vec<Box>,
}

impl Boxa {
    /// An empty list.
    pub fn new() -> Self {
        Self { boxes: Vec::new() }
    }

    /// An empty list with room for `capacity` boxes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            boxes: Vec::with_capacity(capacity),
        }
    }

    /// Number of boxes.
    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// True if the list holds no box.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Box at `index`, `None` past the end.
    pub fn get(&self, index: usize) -> Option<&Box> {
        self.boxes.get(index)
    }

    /// Append a box.
    pub fn push(&mut self, b: Box) {
        self.boxes.push(b);
    }

    /// All boxes, in insertion order.
    pub fn boxes(&self) -> &[Box] {
        &self.boxes
    }

    /// Union of every box, `None` when empty.
    pub fn bounding_box(&self) -> Option<Box> {
        self.boxes.iter().copied().reduce(|acc, b| acc.union(&b))
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Box> {
        self.boxes.iter()
    }
}

impl FromIterator<Box> for Boxa {
    fn from_iter<T: IntoIterator<Item = Box>>(iter: T) -> Self {
        Self {
            boxes: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Box>> for Boxa {
    fn from(boxes: Vec<Box>) -> Self {
        Self { boxes }
    }
}

impl<'a> IntoIterator for &'a Boxa {
    type Item = &'a Box;
    type IntoIter = std::slice::Iter<'a, Box>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}
