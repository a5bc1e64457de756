use std::io::Cursor;

use super::frame::StereoFrame;

/// A fully decoded, engine-rate audio sample.
#[derive(Clone, Debug)]
pub struct SampleBuffer {
    pub data: Vec<StereoFrame>,
}

impl SampleBuffer {
    /// Decode WAV bytes into frames at `target_rate`. `mix_to_mono` collapses
    /// a stereo source into the same signal on both channels (we only do this
    /// for the hi-hat, so its panner sees a point source).
    pub fn decode_wav(bytes: &[u8], target_rate: u32, mix_to_mono: bool) -> anyhow::Result<Self> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        let file_rate = spec.sample_rate;
        let file_channels = spec.channels as usize;

        if file_channels == 0 || file_channels > 2 {
            anyhow::bail!("unsupported channel count: {}", file_channels);
        }

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                // normalize ints to [-1, 1]
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / max))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        let mut frames: Vec<StereoFrame> = if file_channels == 1 {
            samples
                .into_iter()
                .map(|x| StereoFrame { left: x, right: x })
                .collect()
        } else if mix_to_mono {
            samples
                .chunks_exact(2)
                .map(|c| {
                    let m = (c[0] + c[1]) * 0.5;
                    StereoFrame { left: m, right: m }
                })
                .collect()
        } else {
            samples
                .chunks_exact(2)
                .map(|c| StereoFrame { left: c[0], right: c[1] })
                .collect()
        };

        if frames.is_empty() {
            anyhow::bail!("no audio frames in file");
        }

        if file_rate != target_rate {
            frames = resample_linear(&frames, file_rate, target_rate);
        }

        Ok(Self { data: frames })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// Simple linear resampler. Good enough for one-shot drum samples; swap in a
// windowed-sinc resampler if fidelity ever becomes a complaint.
fn resample_linear(frames: &[StereoFrame], source_rate: u32, target_rate: u32) -> Vec<StereoFrame> {
    if source_rate == target_rate {
        return frames.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (frames.len() as f64 * ratio).ceil() as usize;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let src_pos = i as f64 / ratio;
        let idx = src_pos.floor() as usize;
        let frac = (src_pos - idx as f64) as f32;
        if idx >= frames.len().saturating_sub(1) {
            out.push(*frames.last().unwrap_or(&StereoFrame::zero()));
        } else {
            let a = frames[idx];
            let b = frames[idx + 1];
            out.push(StereoFrame {
                left: a.left * (1.0 - frac) + b.left * frac,
                right: a.right * (1.0 - frac) + b.right * frac,
            });
        }
    }
    out
}
