mod cli;
mod config;
mod io;
mod logging;

use std::path::Path;

use anyhow::Context;
use clap::Parser;

use poisson::{
    clone_into_with, fill_all_channels_with, make_tileable_with, tile, ChannelGuidance,
    FillConfig, FillContext, Guidance,
};

use cli::{CloneArgs, Cli, Commands, FillArgs, SolverArgs, TileArgs};
use config::resolve_config;
use logging::setup_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level, cli.log_dir.as_deref())?;

    let ctx = FillContext::new().with_progress(|p| {
        tracing::debug!(channel = p.channel, channels = p.channels, stage = %p.stage, "Progress");
    });
    let config_file = cli.config.as_deref();

    match cli.command {
        Commands::Fill(args) => run_fill(&args, config_file, &ctx),
        Commands::CloneInto(args) => run_clone(&args, config_file, &ctx),
        Commands::Tile(args) => run_tile(&args, config_file, &ctx),
    }
}

fn run_fill(args: &FillArgs, config_file: Option<&Path>, ctx: &FillContext) -> anyhow::Result<()> {
    let config = load_fill_config(config_file, &args.solver, false)?;
    let image = io::load_image(&args.image)?;
    let mask = io::load_mask(&args.mask)?;

    let source = args.guidance_source.as_deref().map(io::load_image).transpose()?;
    let laplacians = match &args.laplacian {
        Some(path) => {
            let field = io::load_image(path)?;
            Some(
                field
                    .into_channels()
                    .into_iter()
                    .map(Guidance::Laplacian)
                    .collect::<Vec<_>>(),
            )
        }
        None => None,
    };
    let guidance = match (&source, &laplacians) {
        (Some(source), _) => ChannelGuidance::Source(source),
        (None, Some(fields)) => ChannelGuidance::PerChannel(fields),
        (None, None) => ChannelGuidance::None,
    };

    let fill = fill_all_channels_with(&image, &mask, guidance, &config, ctx)
        .with_context(|| format!("Failed to fill {}", args.image.display()))?;
    report("Fill", fill.unknowns(), &config);
    io::save_image(fill.output(), &args.out)
}

fn run_clone(
    args: &CloneArgs,
    config_file: Option<&Path>,
    ctx: &FillContext,
) -> anyhow::Result<()> {
    let config = load_fill_config(config_file, &args.solver, args.mix_gradients)?;
    let source = io::load_image(&args.source)?;
    let target = io::load_image(&args.target)?;
    let mask = io::load_mask(&args.mask)?;

    let fill = clone_into_with(&target, &source, &mask, args.at, &config, ctx).with_context(|| {
        format!(
            "Failed to clone {} into {}",
            args.source.display(),
            args.target.display()
        )
    })?;
    report("Clone", fill.unknowns(), &config);
    io::save_image(fill.output(), &args.out)
}

fn run_tile(args: &TileArgs, config_file: Option<&Path>, ctx: &FillContext) -> anyhow::Result<()> {
    let config = load_fill_config(config_file, &args.solver, false)?;
    let patch = io::load_image(&args.patch)?;

    let seamless = make_tileable_with(&patch, &config, ctx)
        .with_context(|| format!("Failed to make {} tileable", args.patch.display()))?;
    report("Tile", seamless.unknowns(), &config);

    if let Some(path) = &args.seamless_out {
        io::save_image(seamless.output(), path)?;
    }
    let tiled = tile(seamless.output(), args.repeat_x, args.repeat_y)?;
    io::save_image(&tiled, &args.out)
}

fn load_fill_config(
    file: Option<&Path>,
    args: &SolverArgs,
    mix_gradients: bool,
) -> anyhow::Result<FillConfig> {
    resolve_config(file, args, mix_gradients).with_context(|| match file {
        Some(path) => format!("Failed to load config {}", path.display()),
        None => "Failed to build fill config".to_string(),
    })
}

fn report(operation: &str, unknowns: usize, config: &FillConfig) {
    tracing::info!(
        unknowns,
        method = %config.method,
        solver = %config.solver,
        "{operation} finished"
    );
}
