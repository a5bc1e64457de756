use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};

use crate::audio_api::AudioCommand;

mod compressor;
mod convolver;
mod engine;
mod frame;
mod sample_buffer;
mod voice;

pub use engine::Engine;
pub use frame::StereoFrame;
pub use sample_buffer::SampleBuffer;
pub use voice::{PanGains, Voice};

/// Handle to the running output stream. Commands go in through `send`;
/// `current_time` reads the engine clock for scheduling notes ahead of time.
pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    clock_frames: Arc<AtomicU64>,
    sample_rate: u32,
    _output_stream: cpal::Stream,
}

impl AudioHandle {
    pub fn send(&self, cmd: AudioCommand) {
        let _ = self.tx.try_send(cmd);
    }

    pub fn sender(&self) -> Sender<AudioCommand> {
        self.tx.clone()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Engine time in seconds, advanced by the render callback.
    pub fn current_time(&self) -> f64 {
        self.clock_frames.load(Ordering::Relaxed) as f64 / self.sample_rate as f64
    }
}

/// Open the default output device and start rendering. The engine lives on
/// the audio thread; everything else talks to it through the command channel.
pub fn start_audio() -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(1024);

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .context("no default output device")?;
    let config = device
        .default_output_config()
        .context("no default output config")?;

    let sample_rate = config.sample_rate();
    let channels = config.channels() as usize;
    if channels != 2 {
        anyhow::bail!("only stereo output is supported, device has {channels} channels");
    }
    let clock_frames = Arc::new(AtomicU64::new(0));

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let output_stream = build_output_stream_f32(
                &device,
                &config.into(),
                rx,
                channels,
                sample_rate,
                clock_frames.clone(),
            )?;
            output_stream.play().context("failed to play output stream")?;

            Ok(AudioHandle {
                tx,
                clock_frames,
                sample_rate,
                _output_stream: output_stream,
            })
        }
        _ => anyhow::bail!("unsupported sample format (only f32 supported for now)"),
    }
}

// ── Output stream ─────────────────────────────────────────────────

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    channels: usize,
    sample_rate: u32,
    clock_frames: Arc<AtomicU64>,
) -> anyhow::Result<cpal::Stream> {
    let mut engine = Engine::new(sample_rate);

    let err_fn = |err| eprintln!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }

            let n_frames = data.len() / channels;
            // StereoFrame is repr(C) { f32, f32 }, so an interleaved stereo
            // f32 buffer can be viewed as frames directly
            let frames: &mut [StereoFrame] = unsafe {
                std::slice::from_raw_parts_mut(data.as_mut_ptr() as *mut StereoFrame, n_frames)
            };
            engine.render_block(frames);

            clock_frames.store(engine.clock(), Ordering::Relaxed);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
