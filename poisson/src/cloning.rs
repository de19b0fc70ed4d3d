//! Seamless cloning of a source patch into a target image.
//!
//! The hole mask lives in the source frame. The working frame is the hole's
//! bounding box grown by one pixel, so every hole pixel keeps a ring of known
//! target pixels around it. The frame is cut out of both images, solved with
//! the source's derivatives as guidance and pasted back into the target.

use crate::channels::{fill_all_channels_with, ChannelGuidance};
use crate::config::FillConfig;
use crate::error::{Error, Result};
use crate::fill::Fill;
use crate::guidance::{gradient, GradientField, Guidance};
use crate::kernel::LaplacianKernel;
use crate::mask::Mask;
use crate::progress::FillContext;
use crate::raster::{ensure_dimensions, ChannelImage, Raster};
use crate::region::Region;

/// Clones the HOLE pixels of `source` into `target`.
///
/// `placement` is where source pixel (0, 0) lands in the target and may be
/// negative as long as the working frame stays inside the target.
pub fn clone_into(
    target: &ChannelImage,
    source: &ChannelImage,
    mask: &Mask,
    placement: (i64, i64),
    config: &FillConfig,
) -> Result<Fill<ChannelImage>> {
    clone_into_with(
        target,
        source,
        mask,
        placement,
        config,
        &FillContext::default(),
    )
}

/// [`clone_into`] with cancellation and progress hooks.
pub fn clone_into_with(
    target: &ChannelImage,
    source: &ChannelImage,
    mask: &Mask,
    placement: (i64, i64),
    config: &FillConfig,
    ctx: &FillContext,
) -> Result<Fill<ChannelImage>> {
    config.validate()?;
    ensure_dimensions(source.dimensions(), mask.dimensions(), "mask")?;
    if source.channel_count() != target.channel_count() {
        return Err(Error::ChannelCountMismatch {
            expected: target.channel_count(),
            actual: source.channel_count(),
        });
    }

    let Some(holes) = mask.hole_bounding_box() else {
        tracing::warn!("Clone mask has no hole pixels, target left unchanged");
        return Ok(Fill::NoHole(target.clone()));
    };
    let (source_frame, target_frame) = working_frames(holes, source, target, placement)?;
    tracing::debug!(?source_frame, ?target_frame, "Cloning frame");

    let local_mask = mask.crop(&source_frame)?;
    let target_crop = target.crop(&target_frame)?;
    let fields = (0..source.channel_count())
        .map(|c| channel_guidance(target, source, c, source_frame, target_frame, config))
        .collect::<Result<Vec<_>>>()?;

    let solved = fill_all_channels_with(
        &target_crop,
        &local_mask,
        ChannelGuidance::PerChannel(&fields),
        config,
        ctx,
    )?;

    let unknowns = solved.unknowns();
    let mut output = target.clone();
    output.paste(target_frame.x_min, target_frame.y_min, solved.output())?;
    Ok(Fill::Solved { output, unknowns })
}

/// Working frame in source coordinates and its translation into the target.
fn working_frames(
    holes: Region,
    source: &ChannelImage,
    target: &ChannelImage,
    (ox, oy): (i64, i64),
) -> Result<(Region, Region)> {
    let (sw, sh) = source.dimensions();
    let out_of_source = |region| Error::RegionOutOfBounds {
        region,
        width: sw,
        height: sh,
    };
    let source_frame = holes.grow(1).ok_or_else(|| out_of_source(holes))?;
    if !source_frame.fits_in(sw, sh) {
        return Err(out_of_source(source_frame));
    }

    let (tw, th) = target.dimensions();
    let out_of_target = |region| Error::RegionOutOfBounds {
        region,
        width: tw,
        height: th,
    };
    let target_frame = source_frame
        .translate(ox, oy)
        .ok_or_else(|| out_of_target(source_frame))?;
    if !target_frame.fits_in(tw, th) {
        return Err(out_of_target(target_frame));
    }
    Ok((source_frame, target_frame))
}

/// Guidance for one channel, expressed in the working frame.
fn channel_guidance(
    target: &ChannelImage,
    source: &ChannelImage,
    channel: usize,
    source_frame: Region,
    target_frame: Region,
    config: &FillConfig,
) -> Result<Guidance> {
    if !config.method.uses_gradient() {
        let kernel = LaplacianKernel::from_kind(config.kernel);
        let patch = source.channel(channel).crop(&source_frame)?;
        return Ok(Guidance::Laplacian(kernel.apply(&patch)));
    }

    let source_grad = crop_gradient(&gradient(source.channel(channel)), &source_frame)?;
    if !config.mix_gradients {
        return Ok(Guidance::Gradient(source_grad));
    }
    let target_grad = crop_gradient(&gradient(target.channel(channel)), &target_frame)?;
    Ok(Guidance::Gradient(mix_gradients(&source_grad, &target_grad)))
}

fn crop_gradient(field: &GradientField, region: &Region) -> Result<GradientField> {
    GradientField::new(field.dx.crop(region)?, field.dy.crop(region)?)
}

/// Per pixel, the gradient with the larger magnitude.
fn mix_gradients(source: &GradientField, target: &GradientField) -> GradientField {
    let (width, height) = source.dimensions();
    let pick = |x: usize, y: usize| {
        if target.magnitude_sq(x, y) > source.magnitude_sq(x, y) {
            target.at(x, y)
        } else {
            source.at(x, y)
        }
    };
    GradientField {
        dx: Raster::from_fn(width, height, |x, y| pick(x, y).0),
        dy: Raster::from_fn(width, height, |x, y| pick(x, y).1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bumpy, linear_ramp, rect_hole};

    fn gray(raster: Raster<f64>) -> ChannelImage {
        ChannelImage::from_gray(raster)
    }

    #[test]
    fn test_clone_reproduces_source_offset_by_constant() {
        // Target = source + 40 shifted by (5, 3): cloning must give source + 40
        // inside the hole.
        let source = bumpy(12, 10);
        let target = Raster::from_fn(20, 16, |x, y| {
            if x >= 5 && y >= 3 && x < 17 && y < 13 {
                source[(x - 5, y - 3)] + 40.0
            } else {
                0.0
            }
        });
        let mask = rect_hole(12, 10, Region::new(3, 8, 2, 7));

        let fill = clone_into(
            &gray(target.clone()),
            &gray(source.clone()),
            &mask,
            (5, 3),
            &FillConfig::poisson(),
        )
        .unwrap();

        let out = fill.output().channel(0);
        assert_eq!(fill.unknowns(), 36);
        for (x, y) in mask.holes() {
            let expected = source[(x, y)] + 40.0;
            assert!((out[(x + 5, y + 3)] - expected).abs() < 1e-8);
        }
        // Outside the hole the target is untouched.
        assert_eq!(out[(0, 0)], 0.0);
        assert_eq!(out[(5, 3)], target[(5, 3)]);
    }

    #[test]
    fn test_clone_variational_linear_source() {
        let source = linear_ramp(10, 10, 1.0, 2.0, 0.0);
        let target = linear_ramp(14, 14, 1.0, 2.0, 100.0);
        let mask = rect_hole(10, 10, Region::new(2, 6, 2, 6));

        let fill = clone_into(
            &gray(target.clone()),
            &gray(source.clone()),
            &mask,
            (2, 2),
            &FillConfig::variational(),
        )
        .unwrap();
        let out = fill.output().channel(0);
        for (x, y) in mask.holes() {
            assert!((out[(x + 2, y + 2)] - target[(x + 2, y + 2)]).abs() < 1e-8);
        }
    }

    #[test]
    fn test_negative_placement() {
        let source = bumpy(10, 10);
        let target = bumpy(10, 10);
        let mask = rect_hole(10, 10, Region::new(4, 7, 4, 7));
        let fill = clone_into(
            &gray(target),
            &gray(source),
            &mask,
            (-3, -2),
            &FillConfig::poisson(),
        )
        .unwrap();
        assert_eq!(fill.unknowns(), 16);
    }

    #[test]
    fn test_frame_outside_target() {
        let source = bumpy(10, 10);
        let target = bumpy(10, 10);
        let mask = rect_hole(10, 10, Region::new(2, 4, 2, 4));
        let err = clone_into(
            &gray(target),
            &gray(source),
            &mask,
            (6, 0),
            &FillConfig::poisson(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::RegionOutOfBounds { width: 10, .. }));

        let err = clone_into(
            &gray(bumpy(10, 10)),
            &gray(bumpy(10, 10)),
            &mask,
            (-2, 0),
            &FillConfig::poisson(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::RegionOutOfBounds { .. }));
    }

    #[test]
    fn test_hole_on_source_border() {
        let mask = rect_hole(8, 8, Region::new(0, 2, 2, 4));
        let err = clone_into(
            &gray(bumpy(20, 20)),
            &gray(bumpy(8, 8)),
            &mask,
            (5, 5),
            &FillConfig::poisson(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::RegionOutOfBounds { .. }));
    }

    #[test]
    fn test_empty_mask_is_noop() {
        let target = gray(bumpy(8, 8));
        let fill = clone_into(
            &target,
            &gray(bumpy(6, 6)),
            &Mask::new_valid(6, 6),
            (0, 0),
            &FillConfig::poisson(),
        )
        .unwrap();
        assert!(fill.is_noop());
        assert_eq!(fill.into_output(), target);
    }

    #[test]
    fn test_channel_count_mismatch() {
        let source = ChannelImage::from_channels(vec![bumpy(6, 6), bumpy(6, 6)]).unwrap();
        let err = clone_into(
            &gray(bumpy(8, 8)),
            &source,
            &rect_hole(6, 6, Region::new(2, 3, 2, 3)),
            (0, 0),
            &FillConfig::poisson(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ChannelCountMismatch { .. }));
    }

    #[test]
    fn test_mix_gradients_picks_stronger() {
        let flat = GradientField::zeros(3, 3);
        let steep = gradient(&linear_ramp(3, 3, 5.0, 0.0, 0.0));
        let mixed = mix_gradients(&flat, &steep);
        assert_eq!(mixed.at(0, 0), (5.0, 0.0));
        let mixed = mix_gradients(&steep, &flat);
        assert_eq!(mixed.at(1, 1), (5.0, 0.0));
    }

    #[test]
    fn test_mixed_clone_keeps_strong_target_texture() {
        // A flat source mixed into a ramp target: the target gradient wins
        // everywhere, so the hole is filled with the target ramp itself.
        let source = Raster::new_filled(10, 10, 3.0);
        let target = linear_ramp(10, 10, 2.0, 1.0, 0.0);
        let mask = rect_hole(10, 10, Region::new(2, 6, 2, 6));
        let config = FillConfig::variational().with_mix_gradients(true);

        let fill = clone_into(&gray(target.clone()), &gray(source), &mask, (0, 0), &config)
            .unwrap();
        let out = fill.output().channel(0);
        for (x, y) in mask.holes() {
            assert!((out[(x, y)] - target[(x, y)]).abs() < 1e-8);
        }
    }
}
