//! Guidance fields.
//!
//! A guidance field describes the variation the filled region should follow.
//! It is resolved once per fill into the form the selected method consumes:
//! the POISSON assembler wants a scalar Laplacian, the edge-based assemblers
//! want a gradient.

mod derivatives;

#[cfg(test)]
mod tests;

use std::borrow::Cow;

use crate::config::{FillConfig, FillMethod};
use crate::error::{Error, Result};
use crate::kernel::{KernelKind, LaplacianKernel};
use crate::raster::{ensure_dimensions, Raster};

pub use derivatives::{gradient, laplacian_from_gradient};

/// Two-component gradient, one raster per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    pub dx: Raster<f64>,
    pub dy: Raster<f64>,
}

impl GradientField {
    pub fn new(dx: Raster<f64>, dy: Raster<f64>) -> Result<Self> {
        ensure_dimensions(dx.dimensions(), dy.dimensions(), "gradient y component")?;
        Ok(Self { dx, dy })
    }

    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            dx: Raster::new_default(width, height),
            dy: Raster::new_default(width, height),
        }
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        self.dx.dimensions()
    }

    /// Gradient vector at (x, y).
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> (f64, f64) {
        (self.dx[(x, y)], self.dy[(x, y)])
    }

    pub fn magnitude_sq(&self, x: usize, y: usize) -> f64 {
        let (gx, gy) = self.at(x, y);
        gx * gx + gy * gy
    }
}

/// Guidance supplied to a fill.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Guidance {
    /// No guidance: the hole is filled with the harmonic interpolation of its
    /// boundary.
    #[default]
    Zero,
    /// Precomputed scalar Laplacian.
    Laplacian(Raster<f64>),
    /// Gradient field. POISSON derives a Laplacian from it.
    Gradient(GradientField),
}

impl Guidance {
    /// Scalar Laplacian of `source` under the `kernel` stencil. Fill with the
    /// same [`FillConfig::kernel`] for an exact reconstruction.
    pub fn from_source(source: &Raster<f64>, kernel: KernelKind) -> Self {
        Guidance::Laplacian(LaplacianKernel::from_kind(kernel).apply(source))
    }

    /// Forward-difference gradient of `source`.
    pub fn gradient_from_source(source: &Raster<f64>) -> Self {
        Guidance::Gradient(gradient(source))
    }

    /// The guidance `config.method` consumes, derived from `source`.
    pub fn for_method(source: &Raster<f64>, config: &FillConfig) -> Self {
        if config.method.uses_gradient() {
            Self::gradient_from_source(source)
        } else {
            Self::from_source(source, config.kernel)
        }
    }

    /// Spatial size, `None` for [`Guidance::Zero`].
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        match self {
            Guidance::Zero => None,
            Guidance::Laplacian(lap) => Some(lap.dimensions()),
            Guidance::Gradient(field) => Some(field.dimensions()),
        }
    }

    pub(crate) fn ensure_dimensions(&self, expected: (usize, usize)) -> Result<()> {
        match self.dimensions() {
            Some(actual) => ensure_dimensions(expected, actual, "guidance field"),
            None => Ok(()),
        }
    }

    /// Converts the guidance into the form `method` assembles from.
    pub(crate) fn resolve(&self, method: FillMethod) -> Result<Resolved<'_>> {
        match (self, method.uses_gradient()) {
            (Guidance::Zero, _) => Ok(Resolved::Zero),
            (Guidance::Laplacian(lap), false) => Ok(Resolved::Laplacian(Cow::Borrowed(lap))),
            (Guidance::Gradient(field), false) => Ok(Resolved::Laplacian(Cow::Owned(
                laplacian_from_gradient(field),
            ))),
            (Guidance::Gradient(field), true) => Ok(Resolved::Gradient(field)),
            (Guidance::Laplacian(_), true) => Err(Error::UnsupportedGuidance { method }),
        }
    }
}

/// Guidance in the form an assembler reads it.
#[derive(Debug)]
pub(crate) enum Resolved<'a> {
    Zero,
    Laplacian(Cow<'a, Raster<f64>>),
    Gradient(&'a GradientField),
}

impl Resolved<'_> {
    /// Laplacian value at (x, y); zero when there is no guidance.
    #[inline]
    pub(crate) fn laplacian(&self, x: usize, y: usize) -> f64 {
        match self {
            Resolved::Laplacian(lap) => lap[(x, y)],
            _ => 0.0,
        }
    }

    /// Gradient vector at (x, y); zero when there is no guidance.
    #[inline]
    pub(crate) fn gradient(&self, x: usize, y: usize) -> (f64, f64) {
        match self {
            Resolved::Gradient(field) => field.at(x, y),
            _ => (0.0, 0.0),
        }
    }
}
