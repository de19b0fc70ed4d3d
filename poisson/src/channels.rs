//! Multi-channel orchestration.
//!
//! Each channel is an independent single-channel fill sharing the mask.
//! Channels run on the rayon pool, at most `max_parallel_channels` at a time,
//! and are reassembled in their original order.

use std::borrow::Cow;

use rayon::prelude::*;

use crate::config::FillConfig;
use crate::error::{Error, Result};
use crate::fill::{fill_channel, Fill};
use crate::guidance::Guidance;
use crate::mask::Mask;
use crate::progress::FillContext;
use crate::raster::{ensure_dimensions, ChannelImage};

/// Guidance for a multi-channel fill.
#[derive(Debug, Clone, Copy, Default)]
pub enum ChannelGuidance<'a> {
    /// Harmonic fill of every channel.
    #[default]
    None,
    /// The same field for every channel.
    Shared(&'a Guidance),
    /// One field per channel, in channel order.
    PerChannel(&'a [Guidance]),
    /// Derived per channel from a source image with the target's layout.
    Source(&'a ChannelImage),
}

impl ChannelGuidance<'_> {
    fn validate(&self, target: &ChannelImage) -> Result<()> {
        match self {
            ChannelGuidance::None | ChannelGuidance::Shared(_) => Ok(()),
            ChannelGuidance::PerChannel(fields) => {
                check_count(target.channel_count(), fields.len())
            }
            ChannelGuidance::Source(source) => {
                check_count(target.channel_count(), source.channel_count())?;
                ensure_dimensions(target.dimensions(), source.dimensions(), "guidance source")
            }
        }
    }

    fn for_channel(&self, index: usize, config: &FillConfig) -> Cow<'_, Guidance> {
        match *self {
            ChannelGuidance::None => Cow::Owned(Guidance::Zero),
            ChannelGuidance::Shared(guidance) => Cow::Borrowed(guidance),
            ChannelGuidance::PerChannel(fields) => Cow::Borrowed(&fields[index]),
            ChannelGuidance::Source(source) => {
                Cow::Owned(Guidance::for_method(source.channel(index), config))
            }
        }
    }
}

fn check_count(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::ChannelCountMismatch { expected, actual });
    }
    Ok(())
}

/// Fills every channel of `target` under the shared `mask`.
///
/// Fails as a whole if any channel fails; the error names the channel.
pub fn fill_all_channels(
    target: &ChannelImage,
    mask: &Mask,
    guidance: ChannelGuidance<'_>,
    config: &FillConfig,
) -> Result<Fill<ChannelImage>> {
    fill_all_channels_with(target, mask, guidance, config, &FillContext::default())
}

/// [`fill_all_channels`] with cancellation and progress hooks.
pub fn fill_all_channels_with(
    target: &ChannelImage,
    mask: &Mask,
    guidance: ChannelGuidance<'_>,
    config: &FillConfig,
    ctx: &FillContext,
) -> Result<Fill<ChannelImage>> {
    config.validate()?;
    ensure_dimensions(target.dimensions(), mask.dimensions(), "mask")?;
    mask.verify_border()?;
    guidance.validate(target)?;

    let channels = target.channel_count();
    let indices: Vec<usize> = (0..channels).collect();
    let limit = config.max_parallel_channels.unwrap_or(channels).max(1);
    tracing::info!(channels, method = %config.method, holes = mask.hole_count(), "Filling channels");

    let fills = try_par_map_limited(&indices, limit, |&c| {
        let channel_guidance = guidance.for_channel(c, config);
        fill_channel(
            target.channel(c),
            mask,
            &channel_guidance,
            config,
            ctx,
            c,
            channels,
        )
        .map_err(|e| e.in_channel(c))
    })?;

    let noop = fills.iter().all(Fill::is_noop);
    let unknowns: usize = fills.iter().map(Fill::unknowns).sum();
    let output = ChannelImage::from_channels(fills.into_iter().map(Fill::into_output).collect())?;
    Ok(if noop {
        Fill::NoHole(output)
    } else {
        Fill::Solved { output, unknowns }
    })
}

/// Maps `f` over `items` on the rayon pool with at most `max_concurrent`
/// items in flight, stopping at the first chunk that fails.
fn try_par_map_limited<T, R, F>(items: &[T], max_concurrent: usize, f: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R> + Sync,
{
    let mut results = Vec::with_capacity(items.len());
    for chunk in items.chunks(max_concurrent) {
        let chunk_results: Result<Vec<R>> = chunk.par_iter().map(&f).collect();
        results.extend(chunk_results?);
    }
    Ok(results)
}
