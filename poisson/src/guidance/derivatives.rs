//! Finite-difference derivatives of a single-channel raster.

use crate::raster::Raster;

use super::GradientField;

/// Forward-difference gradient.
///
/// `dx(x, y) = s(x + 1, y) - s(x, y)` and likewise for `dy`; the last column
/// of `dx` and the last row of `dy` are zero.
pub fn gradient(source: &Raster<f64>) -> GradientField {
    let (width, height) = source.dimensions();
    let dx = Raster::from_fn(width, height, |x, y| {
        if x + 1 < width {
            source[(x + 1, y)] - source[(x, y)]
        } else {
            0.0
        }
    });
    let dy = Raster::from_fn(width, height, |x, y| {
        if y + 1 < height {
            source[(x, y + 1)] - source[(x, y)]
        } else {
            0.0
        }
    });
    GradientField { dx, dy }
}

/// Divergence of a gradient field by backward differences.
///
/// `lap(x, y) = dx(x, y) - dx(x - 1, y) + dy(x, y) - dy(x, y - 1)`, with the
/// terms at index -1 taken as zero. Applied to [`gradient`] this is the
/// second-order central difference along each axis, which is the cross
/// Laplacian stencil away from the image border.
pub fn laplacian_from_gradient(field: &GradientField) -> Raster<f64> {
    let (dx, dy) = (&field.dx, &field.dy);
    Raster::from_fn(dx.width(), dx.height(), |x, y| {
        let dxx = if x > 0 {
            dx[(x, y)] - dx[(x - 1, y)]
        } else {
            dx[(x, y)]
        };
        let dyy = if y > 0 {
            dy[(x, y)] - dy[(x, y - 1)]
        } else {
            dy[(x, y)]
        };
        dxx + dyy
    })
}
