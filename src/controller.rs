use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, warn};
use thiserror::Error;

use crate::audio_api::{AudioCommand, TriggerParams, next_sample_id};
use crate::catalog::{self, ImpulseResponseInfo};
use crate::kit::DrumKit;
use crate::loader::{
    FetchBytes, LoadError, LoadJob, LoadResult, LoadState, LoadTarget, ReadinessTracker,
    sample_loader,
};
use crate::shared::{DEFAULT_SEND_GAIN, HIHAT_POSITION, INITIAL_KIT_INDEX, Instrument};

#[derive(Clone, Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("effect {index} is still loading, try again shortly")]
    EffectNotReady { index: usize },

    #[error("effect index {index} out of range")]
    EffectOutOfRange { index: usize },

    #[error("kit index {index} out of range")]
    KitOutOfRange { index: usize },

    #[error("unknown instrument {name:?}")]
    UnknownInstrument { name: String },

    #[error("{instrument} is not loaded in the active kit")]
    InstrumentNotReady { instrument: &'static str },
}

/// Notifications surfaced to the UI from `poll`.
#[derive(Clone, Debug)]
pub enum EngineEvent {
    /// One-shot: every startup asset finished loading (or failed terminally).
    AssetsReady,
    /// A kit has all six instruments usable.
    KitLoaded { index: usize },
    ImpulseResponseLoaded { index: usize },
    LoadFailed { target: LoadTarget, error: LoadError },
}

pub struct EngineConfig {
    /// Root of the sound library (contains drum-samples/ and
    /// impulse-responses/).
    pub sounds_dir: String,
    pub sample_rate: u32,
}

struct ImpulseResponse {
    info: ImpulseResponseInfo,
    state: LoadState,
}

/// Owner of all engine-facing mutable state: the kit and impulse catalogs
/// with their load progress, the active kit, the effect selection, and the
/// startup readiness count. Loads complete on worker threads; their results
/// are folded in on the caller's thread by `poll`, so there is exactly one
/// writer for everything here.
pub struct EngineController {
    kits: Vec<DrumKit>,
    impulses: Vec<ImpulseResponse>,
    active_kit: usize,
    current_effect: usize,
    // mirrors of the engine-side mix so the UI can read without asking the
    // audio thread
    dry_mix: f32,
    wet_mix: f32,
    readiness: ReadinessTracker,
    loader_rx: Receiver<LoadResult>,
    audio_tx: Sender<AudioCommand>,
}

impl EngineController {
    /// Build the catalogs and start loading every asset. Loading is
    /// all-at-startup; kits and impulse responses race freely and `poll`
    /// sorts the completions out.
    pub fn new(
        config: &EngineConfig,
        fetch: Arc<dyn FetchBytes>,
        audio_tx: Sender<AudioCommand>,
    ) -> Self {
        let kits: Vec<DrumKit> = catalog::KITS
            .iter()
            .map(|(dir, pretty)| DrumKit::new(dir, pretty))
            .collect();
        let impulses: Vec<ImpulseResponse> = catalog::IMPULSE_RESPONSES
            .iter()
            .map(|info| ImpulseResponse { info: info.clone(), state: LoadState::NotStarted })
            .collect();

        let (tx, rx) = crossbeam_channel::unbounded::<LoadResult>();

        let mut controller = Self {
            kits,
            impulses,
            active_kit: INITIAL_KIT_INDEX,
            current_effect: 0,
            dry_mix: 1.0,
            wet_mix: 0.0,
            readiness: ReadinessTracker::new(),
            loader_rx: rx,
            audio_tx,
        };

        // register everything before any load can complete
        for _ in &controller.kits {
            controller.readiness.register_pending();
        }
        for impulse in &controller.impulses {
            if impulse.info.file.is_some() {
                controller.readiness.register_pending();
            }
        }

        for (kit_index, kit) in controller.kits.iter_mut().enumerate() {
            if !kit.begin_loading() {
                continue;
            }
            for instrument in Instrument::ALL {
                sample_loader::spawn_load(
                    fetch.clone(),
                    LoadJob {
                        target: LoadTarget::KitSample { kit: kit_index, instrument },
                        location: catalog::kit_sample_location(
                            &config.sounds_dir,
                            &kit.name,
                            instrument,
                        ),
                        mix_to_mono: instrument.mix_to_mono(),
                    },
                    config.sample_rate,
                    tx.clone(),
                );
            }
        }

        for (index, impulse) in controller.impulses.iter_mut().enumerate() {
            let Some(file) = impulse.info.file else {
                continue; // the "No Effect" sentinel has nothing to load
            };
            impulse.state = LoadState::Loading;
            sample_loader::spawn_load(
                fetch.clone(),
                LoadJob {
                    target: LoadTarget::ImpulseResponse { index },
                    location: catalog::impulse_response_location(&config.sounds_dir, file),
                    mix_to_mono: false,
                },
                config.sample_rate,
                tx.clone(),
            );
        }

        controller
    }

    /// Fold in any finished loads. Call this from the UI's tick; completions
    /// queue up harmlessly in between.
    pub fn poll(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();

        while let Ok(done) = self.loader_rx.try_recv() {
            match done.target {
                LoadTarget::KitSample { kit, instrument } => {
                    let outcome = match done.result {
                        Ok(buffer) => {
                            let id = next_sample_id();
                            let buffer = Arc::new(buffer);
                            self.send(AudioCommand::RegisterSample {
                                id,
                                buffer: buffer.clone(),
                            });
                            Ok((id, buffer))
                        }
                        Err(error) => {
                            warn!("drum sample failed to load: {error}");
                            events.push(EngineEvent::LoadFailed { target: done.target, error });
                            Err(())
                        }
                    };
                    self.kits[kit].resolve(instrument, outcome);
                    if self.kits[kit].take_report() {
                        if self.kits[kit].is_loaded() {
                            events.push(EngineEvent::KitLoaded { index: kit });
                        }
                        if self.readiness.report_complete() {
                            events.push(EngineEvent::AssetsReady);
                        }
                    }
                }
                LoadTarget::ImpulseResponse { index } => {
                    match done.result {
                        Ok(buffer) => {
                            let id = next_sample_id();
                            let buffer = Arc::new(buffer);
                            self.send(AudioCommand::RegisterSample {
                                id,
                                buffer: buffer.clone(),
                            });
                            self.impulses[index].state = LoadState::Loaded(id, buffer);
                            events.push(EngineEvent::ImpulseResponseLoaded { index });
                        }
                        Err(error) => {
                            warn!("impulse response failed to load: {error}");
                            self.impulses[index].state = LoadState::Failed;
                            events.push(EngineEvent::LoadFailed { target: done.target, error });
                        }
                    }
                    if self.readiness.report_complete() {
                        events.push(EngineEvent::AssetsReady);
                    }
                }
            }
        }

        events
    }

    /// Switch the active kit. Pure reference swap; every kit started loading
    /// at startup.
    pub fn select_kit(&mut self, index: usize) -> Result<(), EngineError> {
        if index >= self.kits.len() {
            return Err(EngineError::KitOutOfRange { index });
        }
        self.active_kit = index;
        Ok(())
    }

    /// Activate an effect. Refused without any state change while the
    /// impulse response hasn't loaded (or failed to).
    pub fn select_effect(&mut self, index: usize) -> Result<(), EngineError> {
        let Some(impulse) = self.impulses.get(index) else {
            return Err(EngineError::EffectOutOfRange { index });
        };
        let kernel = if index == 0 {
            None
        } else {
            match impulse.state.sample_id() {
                Some(id) => Some(id),
                None => return Err(EngineError::EffectNotReady { index }),
            }
        };

        self.current_effect = index;
        self.dry_mix = impulse.info.dry_mix;
        self.wet_mix = impulse.info.wet_mix;
        self.send(AudioCommand::SetEffect {
            dry_mix: self.dry_mix,
            wet_mix: self.wet_mix,
            impulse: kernel,
        });
        Ok(())
    }

    /// Play one instrument hit from the active kit right away. `gain`
    /// defaults to 1.0.
    pub fn play_instrument(&mut self, name: &str, gain: Option<f32>) -> Result<(), EngineError> {
        self.play_instrument_at(name, gain, 0.0)
    }

    /// Same, but scheduled at an absolute engine-clock time (seconds), for
    /// sample-accurate pre-scheduling. Past times play immediately.
    pub fn play_instrument_at(
        &mut self,
        name: &str,
        gain: Option<f32>,
        start_time: f64,
    ) -> Result<(), EngineError> {
        let instrument = Instrument::from_name(name)
            .ok_or_else(|| EngineError::UnknownInstrument { name: name.to_string() })?;
        // always read buffers through the active kit, never a stale copy
        let Some(sample_id) = self.kits[self.active_kit].slot(instrument).sample_id() else {
            debug!("{} not ready in kit {}", instrument.name(), self.active_kit);
            return Err(EngineError::InstrumentNotReady { instrument: instrument.name() });
        };

        let gain = gain.unwrap_or(1.0);
        self.send(AudioCommand::Trigger(TriggerParams {
            sample_id,
            pan: instrument.panned(),
            position: HIHAT_POSITION,
            send_gain: DEFAULT_SEND_GAIN * gain,
            main_gain: gain,
            playback_rate: 1.0,
            start_time,
        }));
        Ok(())
    }

    fn send(&self, cmd: AudioCommand) {
        if self.audio_tx.try_send(cmd).is_err() {
            warn!("audio command queue full, dropping command");
        }
    }

    // ── Read-only state for the UI ────────────────────────────────

    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    pub fn outstanding_loads(&self) -> usize {
        self.readiness.outstanding()
    }

    pub fn kits(&self) -> &[DrumKit] {
        &self.kits
    }

    pub fn active_kit_index(&self) -> usize {
        self.active_kit
    }

    pub fn active_kit(&self) -> &DrumKit {
        &self.kits[self.active_kit]
    }

    pub fn current_effect_index(&self) -> usize {
        self.current_effect
    }

    pub fn effect_name(&self, index: usize) -> Option<&'static str> {
        self.impulses.get(index).map(|i| i.info.name)
    }

    pub fn effect_count(&self) -> usize {
        self.impulses.len()
    }

    pub fn effect_is_loaded(&self, index: usize) -> bool {
        index == 0
            || self
                .impulses
                .get(index)
                .is_some_and(|i| i.state.is_loaded())
    }

    pub fn dry_mix(&self) -> f32 {
        self.dry_mix
    }

    pub fn wet_mix(&self) -> f32 {
        self.wet_mix
    }
}
