//! Dense numbering of hole pixels.

use crate::mask::Mask;
use crate::raster::Raster;

/// Bijection between HOLE pixel coordinates and ids `0..N`.
///
/// Ids follow raster scan order (increasing y, then x).
#[derive(Debug, Clone)]
pub struct VariableMap {
    ids: Raster<Option<usize>>,
    pixels: Vec<(usize, usize)>,
}

impl VariableMap {
    /// Enumerates the HOLE pixels of `mask`. Returns `None` if there are none.
    pub fn build(mask: &Mask) -> Option<Self> {
        let pixels: Vec<(usize, usize)> = mask.holes().collect();
        if pixels.is_empty() {
            return None;
        }
        let mut ids = Raster::new_filled(mask.width(), mask.height(), None);
        for (id, &(x, y)) in pixels.iter().enumerate() {
            ids[(x, y)] = Some(id);
        }
        Some(Self { ids, pixels })
    }

    /// Number of unknowns.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Variable id of (x, y), `None` for VALID pixels.
    #[inline]
    pub fn id(&self, x: usize, y: usize) -> Option<usize> {
        self.ids[(x, y)]
    }

    /// Pixel owning variable `id`.
    #[inline]
    pub fn pixel(&self, id: usize) -> (usize, usize) {
        self.pixels[id]
    }

    /// All (id, pixel) pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, (usize, usize))> + '_ {
        self.pixels.iter().copied().enumerate()
    }

    #[inline]
    pub fn pixels(&self) -> &[(usize, usize)] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mask_has_no_variables() {
        assert!(VariableMap::build(&Mask::new_valid(5, 5)).is_none());
    }

    #[test]
    fn test_ids_follow_scan_order() {
        let mut mask = Mask::new_valid(6, 6);
        mask.set_hole(4, 1);
        mask.set_hole(1, 2);
        mask.set_hole(2, 1);

        let vars = VariableMap::build(&mask).unwrap();
        assert_eq!(vars.len(), 3);
        assert_eq!(vars.pixel(0), (2, 1));
        assert_eq!(vars.pixel(1), (4, 1));
        assert_eq!(vars.pixel(2), (1, 2));
        assert_eq!(vars.id(4, 1), Some(1));
        assert_eq!(vars.id(3, 1), None);
    }

    #[test]
    fn test_bijection() {
        let mask = Mask::from_fn(8, 8, |x, y| (2..6).contains(&x) && (3..5).contains(&y));
        let vars = VariableMap::build(&mask).unwrap();
        assert_eq!(vars.len(), mask.hole_count());
        for (id, (x, y)) in vars.iter() {
            assert_eq!(vars.id(x, y), Some(id));
        }
    }
}
