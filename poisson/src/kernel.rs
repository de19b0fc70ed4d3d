//! Discrete Laplacian stencils.

use serde::{Deserialize, Serialize};

use crate::raster::Raster;

/// One non-zero tap of a 3x3 stencil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub dx: i64,
    pub dy: i64,
    pub weight: f64,
}

/// Which 3x3 Laplacian the POISSON method discretizes with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    /// 4-connected cross: center -4, edge neighbors +1.
    #[default]
    Cross,
    /// Full 3x3: center -8, all eight neighbors +1.
    Full,
}

/// A fixed 3x3 Laplacian stencil stored as its non-zero taps.
///
/// The same stencil must be used to build the guidance Laplacian and to
/// assemble the system, otherwise a zero-residual solution does not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct LaplacianKernel {
    taps: Vec<Tap>,
}

impl LaplacianKernel {
    pub fn cross() -> Self {
        Self::from_weights([[0.0, 1.0, 0.0], [1.0, -4.0, 1.0], [0.0, 1.0, 0.0]])
    }

    pub fn full() -> Self {
        Self::from_weights([[1.0, 1.0, 1.0], [1.0, -8.0, 1.0], [1.0, 1.0, 1.0]])
    }

    pub fn from_kind(kind: KernelKind) -> Self {
        match kind {
            KernelKind::Cross => Self::cross(),
            KernelKind::Full => Self::full(),
        }
    }

    /// Builds a stencil from a row-major 3x3 weight table, dropping zeros.
    pub(crate) fn from_weights(weights: [[f64; 3]; 3]) -> Self {
        let taps = weights
            .iter()
            .enumerate()
            .flat_map(|(row, line)| {
                line.iter().enumerate().filter_map(move |(col, &weight)| {
                    (weight != 0.0).then_some(Tap {
                        dx: col as i64 - 1,
                        dy: row as i64 - 1,
                        weight,
                    })
                })
            })
            .collect();
        Self { taps }
    }

    #[inline]
    pub fn taps(&self) -> &[Tap] {
        &self.taps
    }

    /// Weight of the center tap.
    pub fn center(&self) -> f64 {
        self.taps
            .iter()
            .find(|t| t.dx == 0 && t.dy == 0)
            .map_or(0.0, |t| t.weight)
    }

    /// Convolves `raster` with the stencil.
    ///
    /// Taps falling outside the raster are skipped, matching the truncation
    /// the system assembler applies at the image border.
    pub fn apply(&self, raster: &Raster<f64>) -> Raster<f64> {
        Raster::from_fn(raster.width(), raster.height(), |x, y| {
            self.taps
                .iter()
                .filter_map(|tap| {
                    let (qx, qy) = (x as i64 + tap.dx, y as i64 + tap.dy);
                    raster
                        .contains(qx, qy)
                        .then(|| tap.weight * raster.get(qx as usize, qy as usize))
                })
                .sum()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_taps() {
        let kernel = LaplacianKernel::cross();
        assert_eq!(kernel.taps().len(), 5);
        assert_eq!(kernel.center(), -4.0);
        let sum: f64 = kernel.taps().iter().map(|t| t.weight).sum();
        assert_eq!(sum, 0.0);
    }

    #[test]
    fn test_full_taps() {
        let kernel = LaplacianKernel::full();
        assert_eq!(kernel.taps().len(), 9);
        assert_eq!(kernel.center(), -8.0);
    }

    #[test]
    fn test_tap_offsets() {
        let kernel = LaplacianKernel::cross();
        let offsets: Vec<_> = kernel.taps().iter().map(|t| (t.dx, t.dy)).collect();
        assert_eq!(offsets, vec![(0, -1), (-1, 0), (0, 0), (1, 0), (0, 1)]);
    }

    #[test]
    fn test_apply_linear_ramp_is_zero_inside() {
        let ramp = Raster::from_fn(6, 5, |x, y| 2.0 * x as f64 + 3.0 * y as f64);
        let lap = LaplacianKernel::cross().apply(&ramp);
        for y in 1..4 {
            for x in 1..5 {
                assert!(lap[(x, y)].abs() < 1e-12, "({x}, {y}) = {}", lap[(x, y)]);
            }
        }
    }

    #[test]
    fn test_apply_quadratic() {
        // f = x^2 has Laplacian 2 everywhere in the interior.
        let quad = Raster::from_fn(5, 5, |x, _| (x * x) as f64);
        let lap = LaplacianKernel::cross().apply(&quad);
        assert!((lap[(2, 2)] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_truncates_at_border() {
        let ones = Raster::new_filled(3, 3, 1.0);
        let lap = LaplacianKernel::cross().apply(&ones);
        // Corner: center -4 plus two in-bounds neighbors.
        assert_eq!(lap[(0, 0)], -2.0);
        assert_eq!(lap[(1, 1)], 0.0);
    }
}
