//! Owned 2D rasters.
//!
//! [`Raster`] is a single-channel row-major buffer. Multi-channel images are
//! stored planar in [`ChannelImage`] so that each channel can be handed to the
//! single-channel solver without copying.

mod channels;


use std::ops::{Index, IndexMut};
use std::slice;

use crate::error::{Error, Result};
use crate::region::Region;

pub use channels::ChannelImage;

#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T> {
    pixels: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Raster<T> {
    /// # Panics
    /// Panics if `pixels.len() != width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<T>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixels length must equal width * height"
        );
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Fallible counterpart of [`Raster::new`] for data coming from outside the crate.
    pub fn try_new(width: usize, height: usize, pixels: Vec<T>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(Error::DimensionMismatch {
                what: "raster data",
                expected: (width, height),
                actual: (pixels.len(), 1),
            });
        }
        Ok(Self::new(width, height, pixels))
    }

    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        debug_assert!(x < self.width && y < self.height);
        &self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        debug_assert!(x < self.width && y < self.height);
        &mut self.pixels[y * self.width + x]
    }

    /// Linear offset of (x, y) in the pixel buffer.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// True if the signed coordinate lies inside the raster.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.pixels
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.pixels.iter()
    }

    pub fn map<U, F>(&self, f: F) -> Raster<U>
    where
        F: FnMut(&T) -> U,
    {
        Raster::new(self.width, self.height, self.pixels.iter().map(f).collect())
    }

    /// Fails with [`Error::DimensionMismatch`] unless `other` has this raster's size.
    pub fn ensure_same_size<U>(&self, other: &Raster<U>, what: &'static str) -> Result<()> {
        ensure_dimensions(self.dimensions(), other.dimensions(), what)
    }
}

impl<T: Clone> Raster<T> {
    pub fn new_filled(width: usize, height: usize, value: T) -> Self {
        Self {
            pixels: vec![value; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn fill(&mut self, value: T) {
        self.pixels.fill(value);
    }

    /// Copies `region` out into a new raster.
    pub fn crop(&self, region: &Region) -> Result<Self> {
        if !region.fits_in(self.width, self.height) {
            return Err(Error::RegionOutOfBounds {
                region: *region,
                width: self.width,
                height: self.height,
            });
        }
        let mut pixels = Vec::with_capacity(region.area());
        for y in region.y_min..=region.y_max {
            let start = self.offset(region.x_min, y);
            pixels.extend_from_slice(&self.pixels[start..start + region.width()]);
        }
        Ok(Self::new(region.width(), region.height(), pixels))
    }

    /// Writes `patch` into this raster with its top-left corner at (x, y).
    pub fn paste(&mut self, x: usize, y: usize, patch: &Raster<T>) -> Result<()> {
        let region = Region::from_origin_size(x, y, patch.width, patch.height);
        if !region.fits_in(self.width, self.height) {
            return Err(Error::RegionOutOfBounds {
                region,
                width: self.width,
                height: self.height,
            });
        }
        for row in 0..patch.height {
            let dst = self.offset(x, y + row);
            let src = patch.offset(0, row);
            self.pixels[dst..dst + patch.width]
                .clone_from_slice(&patch.pixels[src..src + patch.width]);
        }
        Ok(())
    }
}

impl<T: Default + Clone> Raster<T> {
    pub fn new_default(width: usize, height: usize) -> Self {
        Self::new_filled(width, height, T::default())
    }
}

pub(crate) fn ensure_dimensions(
    expected: (usize, usize),
    actual: (usize, usize),
    what: &'static str,
) -> Result<()> {
    if expected != actual {
        return Err(Error::DimensionMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

impl<T> Index<(usize, usize)> for Raster<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.pixels[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Raster<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.pixels[y * self.width + x]
    }
}

impl<T> Index<usize> for Raster<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.pixels[idx]
    }
}

impl<T> IndexMut<usize> for Raster<T> {
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.pixels[idx]
    }
}

impl<'a, T> IntoIterator for &'a Raster<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.pixels.iter()
    }
}

impl<T> From<Raster<T>> for Vec<T> {
    #[inline]
    fn from(raster: Raster<T>) -> Self {
        raster.pixels
    }
}
