use crate::error::{Error, Result};
use crate::region::Region;

use super::{ensure_dimensions, Raster};

/// Planar multi-channel image with `f64` samples.
///
/// Every plane has the same dimensions. Interleaved buffers (as produced by
/// image decoders) are split on construction and merged again on export.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelImage {
    planes: Vec<Raster<f64>>,
    width: usize,
    height: usize,
}

impl ChannelImage {
    /// Builds an image from separate planes.
    ///
    /// Fails if `planes` is empty or the planes disagree in size.
    pub fn from_channels(planes: Vec<Raster<f64>>) -> Result<Self> {
        let first = planes.first().ok_or(Error::ChannelCountMismatch {
            expected: 1,
            actual: 0,
        })?;
        let dims = first.dimensions();
        for plane in &planes[1..] {
            ensure_dimensions(dims, plane.dimensions(), "channel plane")?;
        }
        Ok(Self {
            width: dims.0,
            height: dims.1,
            planes,
        })
    }

    /// Single-channel image wrapping one plane.
    pub fn from_gray(plane: Raster<f64>) -> Self {
        Self {
            width: plane.width(),
            height: plane.height(),
            planes: vec![plane],
        }
    }

    /// Splits an interleaved `[c0, c1, .., c0, c1, ..]` buffer into planes.
    pub fn from_interleaved(
        width: usize,
        height: usize,
        channels: usize,
        data: &[f64],
    ) -> Result<Self> {
        if channels == 0 {
            return Err(Error::ChannelCountMismatch {
                expected: 1,
                actual: 0,
            });
        }
        if data.len() != width * height * channels {
            return Err(Error::DimensionMismatch {
                what: "interleaved data",
                expected: (width * height * channels, 1),
                actual: (data.len(), 1),
            });
        }

        let planes = (0..channels)
            .map(|c| {
                let samples = data.iter().skip(c).step_by(channels).copied().collect();
                Raster::new(width, height, samples)
            })
            .collect();

        Ok(Self {
            planes,
            width,
            height,
        })
    }

    /// Merges the planes back into one interleaved buffer.
    pub fn to_interleaved(&self) -> Vec<f64> {
        let channels = self.planes.len();
        let mut out = vec![0.0; self.width * self.height * channels];
        for (c, plane) in self.planes.iter().enumerate() {
            for (i, &v) in plane.iter().enumerate() {
                out[i * channels + c] = v;
            }
        }
        out
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.planes.len()
    }

    #[inline]
    pub fn channel(&self, index: usize) -> &Raster<f64> {
        &self.planes[index]
    }

    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut Raster<f64> {
        &mut self.planes[index]
    }

    #[inline]
    pub fn channels(&self) -> &[Raster<f64>] {
        &self.planes
    }

    pub fn into_channels(self) -> Vec<Raster<f64>> {
        self.planes
    }

    pub fn crop(&self, region: &Region) -> Result<Self> {
        let planes = self
            .planes
            .iter()
            .map(|plane| plane.crop(region))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            planes,
            width: region.width(),
            height: region.height(),
        })
    }

    /// Writes `patch` with its top-left corner at (x, y), channel by channel.
    pub fn paste(&mut self, x: usize, y: usize, patch: &ChannelImage) -> Result<()> {
        if patch.channel_count() != self.channel_count() {
            return Err(Error::ChannelCountMismatch {
                expected: self.channel_count(),
                actual: patch.channel_count(),
            });
        }
        for (dst, src) in self.planes.iter_mut().zip(&patch.planes) {
            dst.paste(x, y, src)?;
        }
        Ok(())
    }

    /// Applies `f` to every sample of every channel.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            planes: self.planes.iter().map(|p| p.map(|&v| f(v))).collect(),
            width: self.width,
            height: self.height,
        }
    }
}
