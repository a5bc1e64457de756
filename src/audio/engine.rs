use std::collections::HashMap;
use std::sync::Arc;

use log::warn;

use crate::audio_api::{AudioCommand, SampleId, TriggerParams};
use crate::shared::{EFFECT_LEVEL, MASTER_GAIN};

use super::compressor::Compressor;
use super::convolver::Convolver;
use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;
use super::voice::{PanGains, Voice};

/// The render-side half of the engine: registered sample buffers, live
/// voices, and the fixed mixing topology
///
///   dry taps ──────────────────────────┐
///   wet taps ── convolver ── fx level ─┴─ master gain ── compressor ── out
///
/// The topology is built once and never rebuilt; only transient voices
/// attach to it. Everything here runs inside the audio callback, so no
/// blocking and no I/O.
pub struct Engine {
    sample_rate: f32,
    clock: u64,
    samples: HashMap<SampleId, Arc<SampleBuffer>>,
    voices: Vec<Voice>,
    dry_bus: Vec<StereoFrame>,
    wet_bus: Vec<StereoFrame>,
    convolver: Convolver,
    // None when the host mix shouldn't be compressed; master feeds the
    // output directly in that case.
    compressor: Option<Compressor>,
    dry_mix: f32,
    wet_mix: f32,
    current_impulse: Option<SampleId>,
}

impl Engine {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            clock: 0,
            samples: HashMap::new(),
            voices: Vec::new(),
            dry_bus: Vec::new(),
            wet_bus: Vec::new(),
            convolver: Convolver::new(),
            compressor: Some(Compressor::new(sample_rate as f32)),
            // "No Effect" until told otherwise
            dry_mix: 1.0,
            wet_mix: 0.0,
            current_impulse: None,
        }
    }

    pub fn set_compressor_enabled(&mut self, enabled: bool) {
        self.compressor = enabled.then(|| Compressor::new(self.sample_rate));
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::RegisterSample { id, buffer } => {
                self.samples.insert(id, buffer);
            }
            AudioCommand::Trigger(params) => self.trigger(params),
            AudioCommand::SetEffect { dry_mix, wet_mix, impulse } => {
                self.dry_mix = dry_mix;
                self.wet_mix = wet_mix;
                self.current_impulse = impulse;
                self.convolver
                    .set_kernel(impulse.and_then(|id| self.samples.get(&id).cloned()));
            }
        }
    }

    fn trigger(&mut self, params: TriggerParams) {
        let Some(buffer) = self.samples.get(&params.sample_id) else {
            warn!("trigger for unregistered sample {:?}", params.sample_id);
            return;
        };

        // the dry path reads the effect's dry mix at trigger time
        let dry_gain = params.main_gain * self.dry_mix;
        let wet_gain = params.send_gain;

        let pan = params.pan.then(|| {
            let (x, y, z) = params.position;
            PanGains::from_position(x, y, z)
        });

        // past start times (and 0.0, the common "now") snap to the clock
        let start_frame =
            ((params.start_time * self.sample_rate as f64).round().max(0.0) as u64).max(self.clock);

        self.voices.push(Voice::new(
            buffer.clone(),
            dry_gain,
            wet_gain,
            pan,
            params.playback_rate,
            start_frame,
        ));
    }

    /// Render one block of output frames.
    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        let n = out.len();
        self.dry_bus.clear();
        self.dry_bus.resize(n, StereoFrame::zero());
        self.wet_bus.clear();
        self.wet_bus.resize(n, StereoFrame::zero());

        for voice in &mut self.voices {
            voice.render_into(self.clock, &mut self.dry_bus, &mut self.wet_bus);
        }
        // explicit teardown of finished voices; nothing else holds them
        self.voices.retain(|v| v.active);

        self.convolver.process(&mut self.wet_bus);

        let wet_level = EFFECT_LEVEL * self.wet_mix;
        for i in 0..n {
            let mut mix = self.dry_bus[i];
            mix.add(self.wet_bus[i].scaled(wet_level));
            out[i] = mix.scaled(MASTER_GAIN);
        }

        if let Some(comp) = self.compressor.as_mut() {
            comp.process(out);
        }

        self.clock += n as u64;
    }

    /// Engine time in frames since startup.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn dry_mix(&self) -> f32 {
        self.dry_mix
    }

    pub fn wet_mix(&self) -> f32 {
        self.wet_mix
    }

    pub fn current_impulse(&self) -> Option<SampleId> {
        self.current_impulse
    }

    pub fn has_convolver_kernel(&self) -> bool {
        self.convolver.has_kernel()
    }

    #[cfg(test)]
    pub fn panned_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_panned()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_api::next_sample_id;

    fn constant_buffer(value: f32, frames: usize) -> Arc<SampleBuffer> {
        Arc::new(SampleBuffer {
            data: vec![StereoFrame { left: value, right: value }; frames],
        })
    }

    fn engine_with_sample(value: f32, frames: usize) -> (Engine, SampleId) {
        let mut engine = Engine::new(44100);
        engine.set_compressor_enabled(false);
        let id = next_sample_id();
        engine.handle_cmd(AudioCommand::RegisterSample {
            id,
            buffer: constant_buffer(value, frames),
        });
        (engine, id)
    }

    fn trigger(id: SampleId, pan: bool, start_time: f64) -> AudioCommand {
        AudioCommand::Trigger(TriggerParams {
            sample_id: id,
            pan,
            position: (0.0, 0.0, -2.0),
            send_gain: 0.5,
            main_gain: 1.0,
            playback_rate: 1.0,
            start_time,
        })
    }

    #[test]
    fn dry_path_applies_master_gain() {
        let (mut engine, id) = engine_with_sample(1.0, 8);
        engine.handle_cmd(trigger(id, false, 0.0));
        let mut out = [StereoFrame::zero(); 4];
        engine.render_block(&mut out);
        // dry gain 1.0 * dry mix 1.0, master 0.7, no effect so wet is silent
        assert!((out[0].left - 0.7).abs() < 1e-6);
    }

    #[test]
    fn two_identical_triggers_are_independent_voices() {
        let (mut engine, id) = engine_with_sample(1.0, 100);
        engine.handle_cmd(trigger(id, false, 0.0));
        engine.handle_cmd(trigger(id, false, 0.0));
        assert_eq!(engine.voice_count(), 2);
        let mut out = [StereoFrame::zero(); 4];
        engine.render_block(&mut out);
        // both voices sum
        assert!((out[0].left - 1.4).abs() < 1e-6);
    }

    #[test]
    fn finished_voices_are_released() {
        let (mut engine, id) = engine_with_sample(1.0, 4);
        engine.handle_cmd(trigger(id, false, 0.0));
        assert_eq!(engine.voice_count(), 1);
        let mut out = [StereoFrame::zero(); 16];
        engine.render_block(&mut out);
        assert_eq!(engine.voice_count(), 0);
    }

    #[test]
    fn hihat_routes_through_panner_kick_does_not() {
        let (mut engine, id) = engine_with_sample(1.0, 100);
        engine.handle_cmd(trigger(id, true, 0.0)); // hi-hat style
        engine.handle_cmd(trigger(id, false, 0.0)); // kick style
        assert_eq!(engine.voice_count(), 2);
        assert_eq!(engine.panned_voice_count(), 1);
    }

    #[test]
    fn scheduled_start_lands_on_the_right_frame() {
        let (mut engine, id) = engine_with_sample(1.0, 8);
        // 10 frames into the future at 44.1k
        engine.handle_cmd(trigger(id, false, 10.0 / 44100.0));
        let mut out = [StereoFrame::zero(); 16];
        engine.render_block(&mut out);
        assert_eq!(out[9].left, 0.0);
        assert!(out[10].left > 0.0);
    }

    #[test]
    fn set_effect_swaps_kernel_and_mixes() {
        let (mut engine, id) = engine_with_sample(1.0, 8);
        let ir = next_sample_id();
        engine.handle_cmd(AudioCommand::RegisterSample {
            id: ir,
            buffer: constant_buffer(1.0, 1),
        });
        engine.handle_cmd(AudioCommand::SetEffect {
            dry_mix: 0.0,
            wet_mix: 1.2,
            impulse: Some(ir),
        });
        assert_eq!(engine.dry_mix(), 0.0);
        assert_eq!(engine.wet_mix(), 1.2);
        assert_eq!(engine.current_impulse(), Some(ir));
        assert!(engine.has_convolver_kernel());

        // with dry mix 0 only the wet path is audible
        engine.handle_cmd(trigger(id, false, 0.0));
        let mut out = [StereoFrame::zero(); 4];
        engine.render_block(&mut out);
        // send 0.5 through unit kernel, wet level 1.0 * 1.2, master 0.7
        assert!((out[0].left - 0.5 * 1.2 * 0.7).abs() < 1e-4);
    }

    #[test]
    fn clearing_effect_restores_no_effect_state() {
        let (mut engine, _id) = engine_with_sample(1.0, 8);
        let ir = next_sample_id();
        engine.handle_cmd(AudioCommand::RegisterSample {
            id: ir,
            buffer: constant_buffer(1.0, 1),
        });
        engine.handle_cmd(AudioCommand::SetEffect {
            dry_mix: 0.8,
            wet_mix: 1.4,
            impulse: Some(ir),
        });
        engine.handle_cmd(AudioCommand::SetEffect {
            dry_mix: 1.0,
            wet_mix: 0.0,
            impulse: None,
        });
        assert_eq!(engine.dry_mix(), 1.0);
        assert_eq!(engine.wet_mix(), 0.0);
        assert_eq!(engine.current_impulse(), None);
        assert!(!engine.has_convolver_kernel());
    }

    #[test]
    fn unregistered_sample_is_ignored() {
        let mut engine = Engine::new(44100);
        engine.handle_cmd(trigger(SampleId(u64::MAX), false, 0.0));
        assert_eq!(engine.voice_count(), 0);
    }

    #[test]
    fn effect_change_does_not_touch_playing_voices() {
        let (mut engine, id) = engine_with_sample(1.0, 100);
        engine.handle_cmd(trigger(id, false, 0.0));
        let mut out = [StereoFrame::zero(); 4];
        engine.render_block(&mut out);
        let before = out[0].left;

        // dropping dry mix to 0 only affects notes triggered afterwards
        engine.handle_cmd(AudioCommand::SetEffect {
            dry_mix: 0.0,
            wet_mix: 0.0,
            impulse: None,
        });
        engine.render_block(&mut out);
        assert!((out[0].left - before).abs() < 1e-6);
    }

    #[test]
    fn clock_advances_per_block() {
        let mut engine = Engine::new(44100);
        let mut out = [StereoFrame::zero(); 64];
        engine.render_block(&mut out);
        engine.render_block(&mut out);
        assert_eq!(engine.clock(), 128);
    }
}
