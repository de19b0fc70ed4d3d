//! Axis-aligned pixel regions.

use serde::{Deserialize, Serialize};

/// Axis-aligned box with `usize` coordinates.
///
/// Uses inclusive bounds: a pixel at (x, y) is inside if
/// `x_min <= x <= x_max` and `y_min <= y <= y_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x_min: usize,
    pub x_max: usize,
    pub y_min: usize,
    pub y_max: usize,
}

impl Region {
    #[inline]
    pub const fn new(x_min: usize, x_max: usize, y_min: usize, y_max: usize) -> Self {
        debug_assert!(x_min <= x_max && y_min <= y_max);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Region covering a whole `width x height` image.
    ///
    /// # Panics
    /// Panics if either dimension is zero.
    pub fn full(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "image must not be empty");
        Self::new(0, width - 1, 0, height - 1)
    }

    /// Region of the given size with its top-left corner at (x, y).
    pub fn from_origin_size(x: usize, y: usize, width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "region must not be empty");
        Self::new(x, x + width - 1, y, y + height - 1)
    }

    /// Smallest region containing every point, or `None` for an empty input.
    pub fn bounding<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut points = points.into_iter();
        let (x, y) = points.next()?;
        let mut region = Self::new(x, x, y, y);
        for (x, y) in points {
            region.include(x, y);
        }
        Some(region)
    }

    /// Expand this region to include the given point.
    #[inline]
    pub fn include(&mut self, x: usize, y: usize) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    /// Number of columns.
    #[inline]
    pub const fn width(&self) -> usize {
        self.x_max - self.x_min + 1
    }

    /// Number of rows.
    #[inline]
    pub const fn height(&self) -> usize {
        self.y_max - self.y_min + 1
    }

    #[inline]
    pub const fn area(&self) -> usize {
        self.width() * self.height()
    }

    #[inline]
    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// True if the region lies entirely inside a `width x height` image.
    #[inline]
    pub const fn fits_in(&self, width: usize, height: usize) -> bool {
        self.x_max < width && self.y_max < height
    }

    /// Grows the region by `margin` pixels on every side.
    ///
    /// Returns `None` if the grown region would cross the zero origin.
    pub fn grow(&self, margin: usize) -> Option<Self> {
        Some(Self::new(
            self.x_min.checked_sub(margin)?,
            self.x_max + margin,
            self.y_min.checked_sub(margin)?,
            self.y_max + margin,
        ))
    }

    /// Moves the region by a signed offset.
    ///
    /// Returns `None` if any coordinate would become negative.
    pub fn translate(&self, dx: i64, dy: i64) -> Option<Self> {
        let shift = |v: usize, d: i64| -> Option<usize> { usize::try_from(v as i64 + d).ok() };
        Some(Self::new(
            shift(self.x_min, dx)?,
            shift(self.x_max, dx)?,
            shift(self.y_min, dy)?,
            shift(self.y_max, dy)?,
        ))
    }
}
