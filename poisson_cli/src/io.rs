//! Image files to and from [`ChannelImage`] / [`Mask`].
//!
//! Samples are kept on the 8-bit scale (0..=255) whatever the file depth.
//! Float images are read as-is, which is how signed Laplacians are passed in.

use std::path::Path;

use anyhow::{bail, Context};
use image::{ColorType, DynamicImage, GrayImage, RgbImage};

use poisson::{ChannelImage, Mask, Raster};

/// Mask pixels with luma above this are HOLE.
pub const MASK_THRESHOLD: u8 = 127;

pub fn load_image(path: &Path) -> anyhow::Result<ChannelImage> {
    let img = image::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let image = to_channels(&img)?;
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        channels = image.channel_count(),
        "Loaded image"
    );
    Ok(image)
}

fn to_channels(img: &DynamicImage) -> anyhow::Result<ChannelImage> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let (channels, samples): (usize, Vec<f64>) = match img.color() {
        ColorType::L8 | ColorType::La8 => (1, widen(img.to_luma8().into_raw(), 1.0)),
        ColorType::L16 | ColorType::La16 => (1, widen(img.to_luma16().into_raw(), 257.0)),
        ColorType::Rgb16 | ColorType::Rgba16 => (3, widen(img.to_rgb16().into_raw(), 257.0)),
        ColorType::Rgb32F | ColorType::Rgba32F => (3, widen(img.to_rgb32f().into_raw(), 1.0)),
        _ => (3, widen(img.to_rgb8().into_raw(), 1.0)),
    };
    Ok(ChannelImage::from_interleaved(
        width, height, channels, &samples,
    )?)
}

fn widen<T: Into<f64>>(raw: Vec<T>, divisor: f64) -> Vec<f64> {
    raw.into_iter().map(|v| v.into() / divisor).collect()
}

pub fn load_mask(path: &Path) -> anyhow::Result<Mask> {
    let img = image::open(path)
        .with_context(|| format!("Failed to open mask {}", path.display()))?
        .to_luma8();
    let (width, height) = (img.width() as usize, img.height() as usize);
    let luma = Raster::new(width, height, img.into_raw());
    let mask = Mask::from_raster(&luma, MASK_THRESHOLD);
    tracing::debug!(path = %path.display(), holes = mask.hole_count(), "Loaded mask");
    Ok(mask)
}

/// Interleaved 8-bit samples, rounded and clamped to 0..=255.
pub fn to_u8_samples(image: &ChannelImage) -> Vec<u8> {
    image
        .to_interleaved()
        .into_iter()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect()
}

pub fn save_image(image: &ChannelImage, path: &Path) -> anyhow::Result<()> {
    let (width, height) = (image.width() as u32, image.height() as u32);
    let samples = to_u8_samples(image);
    let dynamic = match image.channel_count() {
        1 => GrayImage::from_raw(width, height, samples).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(width, height, samples).map(DynamicImage::ImageRgb8),
        n => bail!("Cannot save an image with {n} channels"),
    }
    .context("Sample buffer does not match image size")?;

    dynamic
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote image");
    Ok(())
}
