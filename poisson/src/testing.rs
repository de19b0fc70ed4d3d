//! Synthetic rasters and masks for unit tests.

use crate::mask::Mask;
use crate::raster::Raster;
use crate::region::Region;

/// `a * x + b * y + c`.
pub(crate) fn linear_ramp(width: usize, height: usize, a: f64, b: f64, c: f64) -> Raster<f64> {
    Raster::from_fn(width, height, |x, y| a * x as f64 + b * y as f64 + c)
}

/// Smooth non-linear test surface.
pub(crate) fn bumpy(width: usize, height: usize) -> Raster<f64> {
    Raster::from_fn(width, height, |x, y| {
        let (fx, fy) = (x as f64, y as f64);
        50.0 + 20.0 * (fx * 0.4).sin() + 10.0 * (fy * 0.3).cos() + 0.5 * fx * fy
    })
}

/// Mask with a rectangular hole.
pub(crate) fn rect_hole(width: usize, height: usize, region: Region) -> Mask {
    let mut mask = Mask::new_valid(width, height);
    mask.set_hole_region(&region).expect("hole region fits");
    mask
}

/// Largest absolute difference over all pixels.
pub(crate) fn max_abs_diff(a: &Raster<f64>, b: &Raster<f64>) -> f64 {
    assert_eq!(a.dimensions(), b.dimensions());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Largest absolute difference over VALID pixels of `mask`.
pub(crate) fn max_valid_diff(a: &Raster<f64>, b: &Raster<f64>, mask: &Mask) -> f64 {
    let mut worst: f64 = 0.0;
    for y in 0..a.height() {
        for x in 0..a.width() {
            if mask.is_valid(x, y) {
                worst = worst.max((a[(x, y)] - b[(x, y)]).abs());
            }
        }
    }
    worst
}
