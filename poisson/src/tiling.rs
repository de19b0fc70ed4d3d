//! Seamless tiling.
//!
//! Opposite borders of the patch are averaged so they agree, then the whole
//! interior is re-solved against the patch's own derivatives. Repeating the
//! result leaves no visible seam.

use crate::channels::{fill_all_channels_with, ChannelGuidance};
use crate::config::FillConfig;
use crate::error::{Error, Result};
use crate::fill::Fill;
use crate::mask::Mask;
use crate::progress::FillContext;
use crate::raster::{ChannelImage, Raster};
use crate::region::Region;

/// Makes `patch` tile seamlessly. The patch must be at least 3x3.
pub fn make_tileable(patch: &ChannelImage, config: &FillConfig) -> Result<Fill<ChannelImage>> {
    make_tileable_with(patch, config, &FillContext::default())
}

/// [`make_tileable`] with cancellation and progress hooks.
pub fn make_tileable_with(
    patch: &ChannelImage,
    config: &FillConfig,
    ctx: &FillContext,
) -> Result<Fill<ChannelImage>> {
    let (width, height) = patch.dimensions();
    if width < 3 || height < 3 {
        return Err(Error::InvalidConfig(format!(
            "seamless tiling needs a patch of at least 3x3 pixels, got {width}x{height}"
        )));
    }

    let mut mask = Mask::new_valid(width, height);
    mask.set_hole_region(&Region::new(1, width - 2, 1, height - 2))?;

    let planes: Vec<Raster<f64>> = patch.channels().iter().map(periodic_borders).collect();
    let bordered = ChannelImage::from_channels(planes)?;

    tracing::debug!(width, height, channels = patch.channel_count(), "Making patch tileable");
    fill_all_channels_with(&bordered, &mask, ChannelGuidance::Source(patch), config, ctx)
}

/// Copy of `plane` with left/right columns and then top/bottom rows replaced
/// by their average. All four corners end up equal.
fn periodic_borders(plane: &Raster<f64>) -> Raster<f64> {
    let (width, height) = plane.dimensions();
    let mut out = plane.clone();
    for y in 0..height {
        let avg = (out[(0, y)] + out[(width - 1, y)]) * 0.5;
        out[(0, y)] = avg;
        out[(width - 1, y)] = avg;
    }
    for x in 0..width {
        let avg = (out[(x, 0)] + out[(x, height - 1)]) * 0.5;
        out[(x, 0)] = avg;
        out[(x, height - 1)] = avg;
    }
    out
}

/// Repeats `image` `repeat_x` times horizontally and `repeat_y` times
/// vertically.
pub fn tile(image: &ChannelImage, repeat_x: usize, repeat_y: usize) -> Result<ChannelImage> {
    if repeat_x == 0 || repeat_y == 0 {
        return Err(Error::InvalidConfig(format!(
            "tile repeat counts must be at least 1, got {repeat_x}x{repeat_y}"
        )));
    }
    let (width, height) = image.dimensions();
    let planes = image
        .channels()
        .iter()
        .map(|plane| {
            Raster::from_fn(width * repeat_x, height * repeat_y, |x, y| {
                plane[(x % width, y % height)]
            })
        })
        .collect();
    ChannelImage::from_channels(planes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::bumpy;

    #[test]
    fn test_borders_match_after_tiling_fill() {
        let patch = ChannelImage::from_gray(bumpy(9, 7));
        let fill = make_tileable(&patch, &FillConfig::default()).unwrap();
        assert_eq!(fill.unknowns(), 7 * 5);

        let out = fill.output().channel(0);
        for y in 0..7 {
            assert_eq!(out[(0, y)], out[(8, y)]);
        }
        for x in 0..9 {
            assert_eq!(out[(x, 0)], out[(x, 6)]);
        }
    }

    #[test]
    fn test_corners_agree() {
        let plane = Raster::from_fn(4, 4, |x, y| (x * 7 + y * 3) as f64);
        let out = periodic_borders(&plane);
        let corner = out[(0, 0)];
        assert_eq!(out[(3, 0)], corner);
        assert_eq!(out[(0, 3)], corner);
        assert_eq!(out[(3, 3)], corner);
    }

    #[test]
    fn test_constant_patch_is_unchanged() {
        let patch = ChannelImage::from_gray(Raster::new_filled(6, 5, 42.0));
        let fill = make_tileable(&patch, &FillConfig::default()).unwrap();
        for &v in fill.output().channel(0).iter() {
            assert!((v - 42.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_gradient_method() {
        let patch = ChannelImage::from_gray(bumpy(8, 8));
        let fill = make_tileable(&patch, &FillConfig::variational()).unwrap();
        let out = fill.output().channel(0);
        assert_eq!(out[(0, 3)], out[(7, 3)]);
    }

    #[test]
    fn test_patch_too_small() {
        let patch = ChannelImage::from_gray(Raster::new_filled(2, 5, 1.0));
        let err = make_tileable(&patch, &FillConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_tile_layout() {
        let plane = Raster::from_fn(2, 2, |x, y| (x + 2 * y) as f64);
        let image = ChannelImage::from_gray(plane);
        let tiled = tile(&image, 3, 2).unwrap();
        assert_eq!(tiled.dimensions(), (6, 4));
        let out = tiled.channel(0);
        assert_eq!(out[(4, 0)], 0.0);
        assert_eq!(out[(5, 3)], 3.0);
        assert_eq!(out[(3, 2)], 1.0);
    }

    #[test]
    fn test_tile_zero_repeat() {
        let image = ChannelImage::from_gray(Raster::new_filled(2, 2, 0.0));
        assert!(tile(&image, 0, 1).is_err());
    }
}
