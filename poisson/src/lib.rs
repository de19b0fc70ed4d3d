//! Poisson - gradient-domain image editing.
//!
//! Reconstructs a raster from partial constraints by solving a discrete
//! Poisson equation over a masked region:
//! - Hole filling guided by a Laplacian or gradient field
//! - Seamless cloning of a source patch into a target image
//! - Seamless tiling of a texture patch
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use poisson::{fill_masked_region, FillConfig, Guidance, Mask, Raster, Region};
//!
//! let target = Raster::new_filled(64, 64, 10.0);
//! let mut mask = Mask::new_valid(64, 64);
//! mask.set_hole_region(&Region::new(16, 47, 16, 47))?;
//!
//! let fill = fill_masked_region(&target, &mask, &Guidance::Zero, &FillConfig::default())?;
//! println!("Solved {} pixels", fill.unknowns());
//! ```

mod cancel;
mod channels;
mod cloning;
mod config;
mod error;
mod fill;
pub mod guidance;
mod kernel;
mod mask;
mod progress;
mod raster;
mod region;
pub(crate) mod solver;
pub(crate) mod system;
mod tiling;
mod variables;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Raster and mask model
// ============================================================================

pub use mask::{Mask, NEIGHBORS_4};
pub use raster::{ChannelImage, Raster};
pub use region::Region;

// ============================================================================
// Errors and configuration
// ============================================================================

pub use config::{FillConfig, FillMethod, SolverKind};
pub use error::{Error, Result};

// ============================================================================
// Guidance fields
// ============================================================================

pub use guidance::{GradientField, Guidance};
pub use kernel::{KernelKind, LaplacianKernel};

// ============================================================================
// Filling
// ============================================================================

pub use cancel::CancelToken;
pub use channels::{fill_all_channels, fill_all_channels_with, ChannelGuidance};
pub use fill::{fill_from_source, fill_masked_region, fill_masked_region_with, Fill};
pub use progress::{FillContext, FillProgress, FillStage, ProgressCallback};

// ============================================================================
// Cloning and tiling
// ============================================================================

pub use cloning::{clone_into, clone_into_with};
pub use tiling::{make_tileable, make_tileable_with, tile};
