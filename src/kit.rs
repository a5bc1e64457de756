// Per-kit load bookkeeping. Six instruments load independently and in any
// order; the kit counts them in and reports to the readiness tracker exactly
// once, on the completion that settles all six.

use std::sync::Arc;

use crate::audio::SampleBuffer;
use crate::audio_api::SampleId;
use crate::loader::LoadState;
use crate::shared::{Instrument, NUM_INSTRUMENTS};

pub struct DrumKit {
    pub name: String,
    pub pretty_name: String,
    slots: [LoadState; NUM_INSTRUMENTS],
    started_loading: bool,
    reported: bool,
}

impl DrumKit {
    pub fn new(name: &str, pretty_name: &str) -> Self {
        Self {
            name: name.to_string(),
            pretty_name: pretty_name.to_string(),
            slots: std::array::from_fn(|_| LoadState::NotStarted),
            started_loading: false,
            reported: false,
        }
    }

    /// Mark the kit as loading. Idempotent: returns false if loading already
    /// started, and the caller must not spawn the loads again.
    pub fn begin_loading(&mut self) -> bool {
        if self.started_loading {
            return false;
        }
        self.started_loading = true;
        for slot in &mut self.slots {
            *slot = LoadState::Loading;
        }
        true
    }

    /// Record one instrument's load outcome.
    pub fn resolve(&mut self, instrument: Instrument, outcome: Result<(SampleId, Arc<SampleBuffer>), ()>) {
        let slot = &mut self.slots[instrument.index()];
        if slot.is_settled() {
            // duplicate completion, first one wins
            return;
        }
        *slot = match outcome {
            Ok((id, buffer)) => LoadState::Loaded(id, buffer),
            Err(()) => LoadState::Failed,
        };
    }

    pub fn slot(&self, instrument: Instrument) -> &LoadState {
        &self.slots[instrument.index()]
    }

    /// Instruments that decoded successfully, monotone 0..=6.
    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_loaded()).count()
    }

    /// Instruments that finished either way, monotone 0..=6.
    pub fn settled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_settled()).count()
    }

    /// True only when all six instruments are usable.
    pub fn is_loaded(&self) -> bool {
        self.loaded_count() == NUM_INSTRUMENTS
    }

    /// One-shot: true on the first call after every slot has settled. This
    /// is the kit's single report to the readiness tracker, failures
    /// included, so startup can't hang on one corrupt sample.
    pub fn take_report(&mut self) -> bool {
        if self.reported || self.settled_count() < NUM_INSTRUMENTS {
            return false;
        }
        self.reported = true;
        true
    }
}
