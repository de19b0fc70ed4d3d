//! Fill configuration.
//!
//! [`FillConfig`] gathers every knob of a fill: the discretization method, the
//! stencil used by the POISSON method, the sparse solver and the parallelism
//! limits. It is plain data so that front ends can load it from YAML or JSON.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::kernel::KernelKind;

/// Discretization used to build the linear system.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    /// Kernel-based stencil matching a Laplacian guidance.
    #[default]
    Poisson,
    /// Symmetric edge-based energy over 4-neighbors with averaged gradients.
    Variational,
    /// Experimental. Hole pixels next to the boundary are pinned to the mean of
    /// their valid neighbors, the rest use the variational rows.
    Neumann,
}

impl FillMethod {
    /// True if the method consumes a gradient guidance rather than a Laplacian.
    pub fn uses_gradient(self) -> bool {
        !matches!(self, FillMethod::Poisson)
    }
}

/// Sparse factorization used for the solve.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// General sparse LU with partial pivoting.
    #[default]
    Lu,
    /// Sparse Cholesky, only taken when the matrix is verified symmetric
    /// with a uniformly signed diagonal. Falls back to LU otherwise.
    Cholesky,
}

/// Configuration for a fill operation.
///
/// # Examples
///
/// ```ignore
/// use poisson::{FillConfig, FillMethod, KernelKind};
///
/// let config = FillConfig::variational().with_parallel_rows(false);
///
/// let config = FillConfig {
///     kernel: KernelKind::Full,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// How the linear system is assembled.
    pub method: FillMethod,
    /// Stencil for the POISSON method and for Laplacians built from a source.
    pub kernel: KernelKind,
    /// Sparse solver.
    pub solver: SolverKind,
    /// Assemble matrix rows on the rayon pool.
    pub parallel_rows: bool,
    /// Upper bound on channels solved at once. `None` = no limit.
    pub max_parallel_channels: Option<usize>,
    /// Cloning only: per pixel, keep whichever of the source and target
    /// gradients is stronger.
    pub mix_gradients: bool,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            method: FillMethod::Poisson,
            kernel: KernelKind::Cross,
            solver: SolverKind::Lu,
            parallel_rows: true,
            max_parallel_channels: None,
            mix_gradients: false,
        }
    }
}

impl FillConfig {
    // ========== Presets ==========

    /// Preset: kernel-based POISSON fill with the cross stencil.
    pub fn poisson() -> Self {
        Self::default()
    }

    /// Preset: edge-based VARIATIONAL fill. The matrix is symmetric, so
    /// Cholesky is selected.
    pub fn variational() -> Self {
        Self {
            method: FillMethod::Variational,
            solver: SolverKind::Cholesky,
            ..Default::default()
        }
    }

    /// Preset: experimental NEUMANN fill.
    pub fn neumann() -> Self {
        Self {
            method: FillMethod::Neumann,
            ..Default::default()
        }
    }

    // ========== Builders ==========

    pub fn with_method(mut self, method: FillMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_kernel(mut self, kernel: KernelKind) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_parallel_rows(mut self, parallel_rows: bool) -> Self {
        self.parallel_rows = parallel_rows;
        self
    }

    pub fn with_max_parallel_channels(mut self, limit: usize) -> Self {
        self.max_parallel_channels = Some(limit);
        self
    }

    pub fn with_mix_gradients(mut self, mix_gradients: bool) -> Self {
        self.mix_gradients = mix_gradients;
        self
    }

    // ========== Validation ==========

    /// Rejects settings that can never produce a fill.
    pub fn validate(&self) -> Result<()> {
        if self.max_parallel_channels == Some(0) {
            return Err(Error::InvalidConfig(
                "max_parallel_channels must be at least 1".into(),
            ));
        }
        if self.mix_gradients && !self.method.uses_gradient() {
            return Err(Error::InvalidConfig(format!(
                "mix_gradients needs a gradient-based method, got {}",
                self.method
            )));
        }
        Ok(())
    }
}
