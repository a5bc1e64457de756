// The command vocabulary crossing from the control side to the render side.
// The engine never touches the filesystem or blocks; decoded buffers get
// registered ahead of time, then referenced by id from triggers and effect
// swaps.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::audio::SampleBuffer;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a buffer registered with the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SampleId(pub u64);

/// Ids are process-unique; loads complete on worker threads so this is atomic.
pub fn next_sample_id() -> SampleId {
    SampleId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// One note event. Gains are resolved against the engine's current effect
/// dry mix at trigger time, so a `SetEffect` queued ahead of a `Trigger`
/// applies to it.
#[derive(Clone, Debug)]
pub struct TriggerParams {
    pub sample_id: SampleId,
    /// Route through the positional panner at `position`.
    pub pan: bool,
    pub position: (f32, f32, f32),
    /// Gain on the wet (convolver send) path.
    pub send_gain: f32,
    /// Gain on the dry path, before the effect dry mix is applied.
    pub main_gain: f32,
    /// 1.0 plays at native pitch.
    pub playback_rate: f32,
    /// Absolute engine-clock time in seconds. 0.0 or any past time means now.
    pub start_time: f64,
}

#[derive(Clone, Debug)]
pub enum AudioCommand {
    /// Hand a decoded buffer to the engine so triggers can reference it.
    RegisterSample { id: SampleId, buffer: Arc<SampleBuffer> },

    /// Start one playback voice.
    Trigger(TriggerParams),

    /// Swap the active convolution effect. `impulse: None` clears the
    /// convolver (the "No Effect" sentinel).
    SetEffect {
        dry_mix: f32,
        wet_mix: f32,
        impulse: Option<SampleId>,
    },
}
