//! Hole/valid classification of pixels.
//!
//! A [`Mask`] stores one bit per pixel: set means HOLE (unknown, to be solved
//! for), clear means VALID (known boundary value). Bits are packed into `u64`
//! words in row-major order.

use crate::error::{Error, Result};
use crate::raster::Raster;
use crate::region::Region;

const BITS_PER_WORD: usize = 64;

/// 4-connected neighbor offsets in the order left, right, up, down.
pub const NEIGHBORS_4: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    words: Vec<u64>,
    width: usize,
    height: usize,
}

impl Mask {
    /// A mask with every pixel VALID.
    pub fn new_valid(width: usize, height: usize) -> Self {
        let len = width * height;
        Self {
            words: vec![0; len.div_ceil(BITS_PER_WORD)],
            width,
            height,
        }
    }

    /// Builds a mask from a predicate returning `true` for HOLE pixels.
    pub fn from_fn<F>(width: usize, height: usize, mut is_hole: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut mask = Self::new_valid(width, height);
        for y in 0..height {
            for x in 0..width {
                if is_hole(x, y) {
                    mask.set_hole(x, y);
                }
            }
        }
        mask
    }

    /// Marks pixels whose value exceeds `threshold` as HOLE.
    pub fn from_raster<T: PartialOrd + Copy>(raster: &Raster<T>, threshold: T) -> Self {
        Self::from_fn(raster.width(), raster.height(), |x, y| {
            *raster.get(x, y) > threshold
        })
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
    pub fn is_hole(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.width && y < self.height);
        let idx = y * self.width + x;
        (self.words[idx / BITS_PER_WORD] >> (idx % BITS_PER_WORD)) & 1 != 0
    }

    #[inline]
    pub fn is_valid(&self, x: usize, y: usize) -> bool {
        !self.is_hole(x, y)
    }

    #[inline]
    pub fn set_hole(&mut self, x: usize, y: usize) {
        debug_assert!(x < self.width && y < self.height);
        let idx = y * self.width + x;
        self.words[idx / BITS_PER_WORD] |= 1u64 << (idx % BITS_PER_WORD);
    }

    #[inline]
    pub fn set_valid(&mut self, x: usize, y: usize) {
        debug_assert!(x < self.width && y < self.height);
        let idx = y * self.width + x;
        self.words[idx / BITS_PER_WORD] &= !(1u64 << (idx % BITS_PER_WORD));
    }

    /// Marks every pixel of `region` as HOLE.
    pub fn set_hole_region(&mut self, region: &Region) -> Result<()> {
        if !region.fits_in(self.width, self.height) {
            return Err(Error::RegionOutOfBounds {
                region: *region,
                width: self.width,
                height: self.height,
            });
        }
        for y in region.y_min..=region.y_max {
            for x in region.x_min..=region.x_max {
                self.set_hole(x, y);
            }
        }
        Ok(())
    }

    /// Number of HOLE pixels.
    pub fn hole_count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterates HOLE coordinates in raster scan order (increasing y, then x).
    pub fn holes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        let len = self.width * self.height;
        self.words
            .iter()
            .enumerate()
            .flat_map(move |(word_idx, &word)| {
                let mut bits = word;
                std::iter::from_fn(move || {
                    if bits == 0 {
                        return None;
                    }
                    let bit = bits.trailing_zeros() as usize;
                    bits &= bits - 1;
                    Some(word_idx * BITS_PER_WORD + bit)
                })
            })
            .take_while(move |&idx| idx < len)
            .map(move |idx| (idx % width, idx / width))
    }

    /// In-bounds 4-connected neighbors of (x, y).
    pub fn neighbors_4(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
        let (width, height) = (self.width as i64, self.height as i64);
        NEIGHBORS_4.iter().filter_map(move |&(dx, dy)| {
            let (nx, ny) = (x as i64 + dx, y as i64 + dy);
            let inside = nx >= 0 && ny >= 0 && nx < width && ny < height;
            inside.then_some((nx as usize, ny as usize))
        })
    }

    /// In-bounds VALID 4-connected neighbors of (x, y).
    pub fn valid_4_neighbors(
        &self,
        x: usize,
        y: usize,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.neighbors_4(x, y).filter(|&(nx, ny)| self.is_valid(nx, ny))
    }

    pub fn has_valid_4_neighbor(&self, x: usize, y: usize) -> bool {
        self.valid_4_neighbors(x, y).next().is_some()
    }

    /// Bounding box of all HOLE pixels, or `None` if there are none.
    pub fn hole_bounding_box(&self) -> Option<Region> {
        Region::bounding(self.holes())
    }

    /// First HOLE pixel (in scan order) lying on the outer 1-pixel border.
    pub fn first_border_hole(&self) -> Option<(usize, usize)> {
        self.holes().find(|&(x, y)| {
            x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
        })
    }

    /// Fails with [`Error::InvalidMask`] if a HOLE pixel touches the border.
    pub fn verify_border(&self) -> Result<()> {
        match self.first_border_hole() {
            Some((x, y)) => Err(Error::InvalidMask { x, y }),
            None => Ok(()),
        }
    }

    /// Copies `region` out into a new mask.
    pub fn crop(&self, region: &Region) -> Result<Self> {
        if !region.fits_in(self.width, self.height) {
            return Err(Error::RegionOutOfBounds {
                region: *region,
                width: self.width,
                height: self.height,
            });
        }
        Ok(Self::from_fn(region.width(), region.height(), |x, y| {
            self.is_hole(region.x_min + x, region.y_min + y)
        }))
    }

    /// The mask as a 0/1 raster (1 = HOLE).
    pub fn to_raster(&self) -> Raster<u8> {
        Raster::from_fn(self.width, self.height, |x, y| u8::from(self.is_hole(x, y)))
    }
}
