//! boomkit: a drum machine sound engine.
//!
//! Loads a library of drum kits and reverb/filter impulse responses in the
//! background, then plays instrument hits through a fixed mixing graph
//! (dry/wet split, convolution effect, master gain and compression). The UI
//! layer drives it through [`EngineController`] and pumps
//! [`EngineController::poll`] for load progress and the one-shot
//! [`EngineEvent::AssetsReady`] signal.

pub mod audio;
pub mod audio_api;
mod catalog;
mod controller;
mod kit;
pub mod loader;
mod shared;

use std::sync::Arc;

pub use audio::{AudioHandle, Engine, SampleBuffer, StereoFrame, start_audio};
pub use audio_api::{AudioCommand, SampleId, TriggerParams};
pub use catalog::{IMPULSE_RESPONSES, ImpulseResponseInfo, KITS};
pub use controller::{EngineConfig, EngineController, EngineError, EngineEvent};
pub use kit::DrumKit;
pub use loader::{FetchBytes, FsFetch, LoadError, ReadinessTracker};
pub use shared::{INITIAL_KIT_INDEX, Instrument, NUM_INSTRUMENTS};

/// Open the default output device and start loading the sound library under
/// `sounds_dir` from the filesystem. The usual way for a UI to boot the
/// whole engine.
pub fn start(sounds_dir: &str) -> anyhow::Result<(EngineController, AudioHandle)> {
    let handle = audio::start_audio()?;
    let config = EngineConfig {
        sounds_dir: sounds_dir.to_string(),
        sample_rate: handle.sample_rate(),
    };
    let controller = EngineController::new(&config, Arc::new(FsFetch), handle.sender());
    Ok((controller, handle))
}
