//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use poisson::{FillMethod, KernelKind, SolverKind};

#[derive(Parser)]
#[command(name = "poisson")]
#[command(about = "Poisson image editing: hole filling, seamless cloning and tiling")]
#[command(version)]
pub struct Cli {
    /// Fill configuration file (.yaml, .yml or .json). Flags override it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Directory for daily rolling log files. Console only when omitted.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill the masked region of an image.
    Fill(FillArgs),

    /// Clone the masked region of a source image into a target image.
    #[command(name = "clone")]
    CloneInto(CloneArgs),

    /// Make a texture patch tile seamlessly and repeat it.
    Tile(TileArgs),
}

#[derive(Debug, Clone, Args)]
pub struct FillArgs {
    /// Image to fill.
    #[arg(long)]
    pub image: PathBuf,

    /// Mask image; pixels with luma above 127 are filled.
    #[arg(long)]
    pub mask: PathBuf,

    /// Output image.
    #[arg(long)]
    pub out: PathBuf,

    /// Image whose derivatives guide the fill. Same size and channels as --image.
    #[arg(long, conflicts_with = "laplacian")]
    pub guidance_source: Option<PathBuf>,

    /// Image holding a precomputed Laplacian per channel (float TIFF for signed values).
    #[arg(long)]
    pub laplacian: Option<PathBuf>,

    #[command(flatten)]
    pub solver: SolverArgs,
}

#[derive(Debug, Clone, Args)]
pub struct CloneArgs {
    /// Image providing the cloned content.
    #[arg(long)]
    pub source: PathBuf,

    /// Image receiving the clone.
    #[arg(long)]
    pub target: PathBuf,

    /// Mask in source coordinates; pixels with luma above 127 are cloned.
    #[arg(long)]
    pub mask: PathBuf,

    /// Target position of source pixel (0, 0), as X,Y.
    #[arg(long, value_parser = parse_offset, allow_hyphen_values = true)]
    pub at: (i64, i64),

    /// Output image.
    #[arg(long)]
    pub out: PathBuf,

    /// Keep the stronger of the source and target gradients per pixel.
    #[arg(long)]
    pub mix_gradients: bool,

    #[command(flatten)]
    pub solver: SolverArgs,
}

#[derive(Debug, Clone, Args)]
pub struct TileArgs {
    /// Texture patch.
    #[arg(long)]
    pub patch: PathBuf,

    /// Horizontal repeat count.
    #[arg(long, default_value_t = 3)]
    pub repeat_x: usize,

    /// Vertical repeat count.
    #[arg(long, default_value_t = 3)]
    pub repeat_y: usize,

    /// Tiled output image.
    #[arg(long)]
    pub out: PathBuf,

    /// Also write the seamless single patch here.
    #[arg(long)]
    pub seamless_out: Option<PathBuf>,

    #[command(flatten)]
    pub solver: SolverArgs,
}

/// Overrides for the fill configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct SolverArgs {
    /// System discretization.
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Laplacian stencil for the poisson method.
    #[arg(long, value_enum)]
    pub kernel: Option<KernelArg>,

    /// Sparse solver.
    #[arg(long, value_enum)]
    pub solver: Option<SolverArg>,

    /// Assemble matrix rows on a single thread.
    #[arg(long)]
    pub sequential_rows: bool,

    /// Maximum number of channels solved at once.
    #[arg(long)]
    pub max_parallel_channels: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Poisson,
    Variational,
    Neumann,
}

impl From<MethodArg> for FillMethod {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Poisson => FillMethod::Poisson,
            MethodArg::Variational => FillMethod::Variational,
            MethodArg::Neumann => FillMethod::Neumann,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KernelArg {
    Cross,
    Full,
}

impl From<KernelArg> for KernelKind {
    fn from(value: KernelArg) -> Self {
        match value {
            KernelArg::Cross => KernelKind::Cross,
            KernelArg::Full => KernelKind::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SolverArg {
    Lu,
    Cholesky,
}

impl From<SolverArg> for SolverKind {
    fn from(value: SolverArg) -> Self {
        match value {
            SolverArg::Lu => SolverKind::Lu,
            SolverArg::Cholesky => SolverKind::Cholesky,
        }
    }
}

fn parse_offset(s: &str) -> Result<(i64, i64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<i64>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };
    Ok((parse(x)?, parse(y)?))
}
