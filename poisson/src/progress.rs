//! Progress reporting for fill operations.

use std::sync::Arc;

use crate::cancel::CancelToken;

/// Stage of a single-channel fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum FillStage {
    /// Building matrix rows.
    Assembling,
    /// Factorizing and solving.
    Solving,
    /// Solution written to the output.
    Done,
}

/// Progress information for a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillProgress {
    /// Channel being processed (0-based).
    pub channel: usize,
    /// Total number of channels.
    pub channels: usize,
    pub stage: FillStage,
}

/// Callback type for progress reporting.
pub type ProgressCallback = Arc<dyn Fn(FillProgress) + Send + Sync>;

/// Per-call hooks that do not affect the numerical result.
#[derive(Clone, Default)]
pub struct FillContext {
    pub cancel: CancelToken,
    pub progress: Option<ProgressCallback>,
}

impl FillContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, progress: impl Fn(FillProgress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }

    /// Report progress using the callback if set.
    pub(crate) fn report(&self, channel: usize, channels: usize, stage: FillStage) {
        if let Some(f) = self.progress.as_ref() {
            f(FillProgress {
                channel,
                channels,
                stage,
            });
        }
    }
}

impl std::fmt::Debug for FillContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FillContext")
            .field("cancel", &self.cancel)
            .field("progress", &self.progress.as_ref().map(|_| "..."))
            .finish()
    }
}
