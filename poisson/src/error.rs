//! Error types for Poisson filling operations.

use thiserror::Error;

/// Errors that can occur while building or solving a Poisson system.
///
/// A mask without any hole pixels is not an error; it is reported through
/// [`crate::Fill::NoHole`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("Dimension mismatch for {what}: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        what: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Invalid mask: hole pixel ({x}, {y}) lies on the image border")]
    InvalidMask { x: usize, y: usize },

    #[error("Sparse solve failed: {0}")]
    SingularSystem(String),

    #[error("Channel count mismatch: image has {expected} channels but {actual} were supplied")]
    ChannelCountMismatch { expected: usize, actual: usize },

    #[error("Channel {index} failed: {source}")]
    Channel {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("{method} filling requires a gradient guidance field, got a Laplacian")]
    UnsupportedGuidance { method: crate::FillMethod },

    #[error("Region {region:?} does not fit inside a {width}x{height} image")]
    RegionOutOfBounds {
        region: crate::Region,
        width: usize,
        height: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps `self` with the index of the channel it came from.
    pub(crate) fn in_channel(self, index: usize) -> Self {
        match self {
            // Cancellation is global, not a per-channel failure.
            Error::Cancelled => Error::Cancelled,
            other => Error::Channel {
                index,
                source: Box::new(other),
            },
        }
    }

    /// Returns the innermost error, unwrapping channel context.
    pub fn root(&self) -> &Error {
        match self {
            Error::Channel { source, .. } => source.root(),
            other => other,
        }
    }
}
