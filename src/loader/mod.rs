// Asset loading: fetch bytes, decode them off-thread, report completions
// back over a channel. Failures are terminal per asset; they still produce a
// completion so startup readiness can resolve.

mod fetch;
mod readiness;
pub mod sample_loader;

pub use fetch::{FetchBytes, FsFetch};
#[cfg(test)]
pub use fetch::testing;
pub use readiness::ReadinessTracker;
pub use sample_loader::{LoadJob, LoadResult, LoadTarget};

use std::sync::Arc;

use thiserror::Error;

use crate::audio::SampleBuffer;
use crate::audio_api::SampleId;

#[derive(Clone, Debug, Error)]
pub enum LoadError {
    #[error("fetch failed for {location}: {reason}")]
    Fetch { location: String, reason: String },

    #[error("decode failed for {location}: {reason}")]
    Decode { location: String, reason: String },
}

/// Lifecycle of one loadable asset (a kit instrument or an impulse response).
/// `Failed` is terminal; consumers must refuse the asset rather than play
/// silence off a missing buffer.
#[derive(Clone, Debug)]
pub enum LoadState {
    NotStarted,
    Loading,
    Loaded(SampleId, Arc<SampleBuffer>),
    Failed,
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded(..))
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Loaded(..) | LoadState::Failed)
    }

    pub fn sample_id(&self) -> Option<SampleId> {
        match self {
            LoadState::Loaded(id, _) => Some(*id),
            _ => None,
        }
    }
}
