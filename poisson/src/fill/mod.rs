//! Single-channel fill: validate, enumerate, assemble, solve, composite.


use crate::config::FillConfig;
use crate::error::Result;
use crate::guidance::Guidance;
use crate::kernel::LaplacianKernel;
use crate::mask::Mask;
use crate::progress::{FillContext, FillStage};
use crate::raster::{ensure_dimensions, Raster};
use crate::solver;
use crate::system::{Inputs, LinearSystem};
use crate::variables::VariableMap;

/// Outcome of a fill.
///
/// A mask without HOLE pixels is not an error; the output is then an
/// unchanged copy of the target and the fill reports [`Fill::NoHole`].
#[derive(Debug, Clone, PartialEq)]
pub enum Fill<T> {
    Solved { output: T, unknowns: usize },
    NoHole(T),
}

impl<T> Fill<T> {
    pub fn output(&self) -> &T {
        match self {
            Fill::Solved { output, .. } | Fill::NoHole(output) => output,
        }
    }

    pub fn into_output(self) -> T {
        match self {
            Fill::Solved { output, .. } | Fill::NoHole(output) => output,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Fill::NoHole(_))
    }

    /// Number of solved pixels, zero for a no-op.
    pub fn unknowns(&self) -> usize {
        match self {
            Fill::Solved { unknowns, .. } => *unknowns,
            Fill::NoHole(_) => 0,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fill<U> {
        match self {
            Fill::Solved { output, unknowns } => Fill::Solved {
                output: f(output),
                unknowns,
            },
            Fill::NoHole(output) => Fill::NoHole(f(output)),
        }
    }
}

/// Fills the HOLE pixels of `target` so their Laplacian follows `guidance`.
///
/// VALID pixels are copied unchanged. Fails before any assembly if the mask
/// or guidance size differs from the target, if a HOLE pixel touches the
/// image border, or if the guidance cannot drive `config.method`.
pub fn fill_masked_region(
    target: &Raster<f64>,
    mask: &Mask,
    guidance: &Guidance,
    config: &FillConfig,
) -> Result<Fill<Raster<f64>>> {
    fill_masked_region_with(target, mask, guidance, config, &FillContext::default())
}

/// [`fill_masked_region`] with cancellation and progress hooks.
pub fn fill_masked_region_with(
    target: &Raster<f64>,
    mask: &Mask,
    guidance: &Guidance,
    config: &FillConfig,
    ctx: &FillContext,
) -> Result<Fill<Raster<f64>>> {
    fill_channel(target, mask, guidance, config, ctx, 0, 1)
}

/// Fills using guidance derived from `source`, in the representation
/// `config.method` consumes.
pub fn fill_from_source(
    target: &Raster<f64>,
    mask: &Mask,
    source: &Raster<f64>,
    config: &FillConfig,
) -> Result<Fill<Raster<f64>>> {
    target.ensure_same_size(source, "guidance source")?;
    let guidance = Guidance::for_method(source, config);
    fill_masked_region(target, mask, &guidance, config)
}

pub(crate) fn fill_channel(
    target: &Raster<f64>,
    mask: &Mask,
    guidance: &Guidance,
    config: &FillConfig,
    ctx: &FillContext,
    channel: usize,
    channels: usize,
) -> Result<Fill<Raster<f64>>> {
    config.validate()?;
    ensure_dimensions(target.dimensions(), mask.dimensions(), "mask")?;
    guidance.ensure_dimensions(target.dimensions())?;
    let resolved = guidance.resolve(config.method)?;
    mask.verify_border()?;

    let Some(vars) = VariableMap::build(mask) else {
        tracing::warn!(channel, "Mask has no hole pixels, nothing to fill");
        ctx.report(channel, channels, FillStage::Done);
        return Ok(Fill::NoHole(target.clone()));
    };

    ctx.report(channel, channels, FillStage::Assembling);
    let kernel = LaplacianKernel::from_kind(config.kernel);
    let inputs = Inputs {
        target,
        mask,
        vars: &vars,
        guidance: &resolved,
        kernel: &kernel,
    };
    let system = LinearSystem::assemble(config.method, &inputs, config.parallel_rows, &ctx.cancel)?;
    tracing::debug!(
        channel,
        method = %config.method,
        unknowns = system.size(),
        nnz = system.nnz(),
        "Assembled linear system"
    );

    ctx.cancel.check()?;
    ctx.report(channel, channels, FillStage::Solving);
    let x = solver::solve(system, config.solver)?;

    let output = composite(target, &vars, &x);
    ctx.report(channel, channels, FillStage::Done);
    Ok(Fill::Solved {
        output,
        unknowns: vars.len(),
    })
}

/// Copy of `target` with every variable's pixel replaced by its solution.
fn composite(target: &Raster<f64>, vars: &VariableMap, x: &[f64]) -> Raster<f64> {
    let mut output = target.clone();
    for (id, (px, py)) in vars.iter() {
        output[(px, py)] = x[id];
    }
    output
}
