use std::sync::Arc;

use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Static left/right gains computed once from a 3-D source position:
/// equal-power pan on the azimuth, inverse-distance attenuation.
///
/// Axis convention (the single source of truth for the engine): the
/// listener faces along −z, so azimuth 0 is straight ahead at (0, 0, −z)
/// and positive x pans right. Sources behind the listener mirror onto the
/// front hemisphere rather than slamming hard left or right.
#[derive(Clone, Copy, Debug)]
pub struct PanGains {
    pub left: f32,
    pub right: f32,
}

impl PanGains {
    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        let distance = (x * x + y * y + z * z).sqrt();
        let attenuation = 1.0 / distance.max(1.0);
        let mut azimuth = x.atan2(-z);
        // fold the rear hemisphere onto the front
        if azimuth > std::f32::consts::FRAC_PI_2 {
            azimuth = std::f32::consts::PI - azimuth;
        } else if azimuth < -std::f32::consts::FRAC_PI_2 {
            azimuth = -std::f32::consts::PI - azimuth;
        }
        let p = azimuth / std::f32::consts::PI + 0.5;
        let angle = p * std::f32::consts::FRAC_PI_2;
        Self {
            left: angle.cos() * attenuation,
            right: angle.sin() * attenuation,
        }
    }
}

/// One single-use playback of a note. Reads its buffer at `rate` with linear
/// interpolation and taps into both mix buses; deactivates itself at the end
/// of the buffer so the engine can release it.
#[derive(Clone, Debug)]
pub struct Voice {
    buffer: Arc<SampleBuffer>,
    pos: f32,
    rate: f32,
    dry_gain: f32,
    wet_gain: f32,
    pan: Option<PanGains>,
    start_frame: u64,
    pub active: bool,
}

impl Voice {
    pub fn new(
        buffer: Arc<SampleBuffer>,
        dry_gain: f32,
        wet_gain: f32,
        pan: Option<PanGains>,
        playback_rate: f32,
        start_frame: u64,
    ) -> Self {
        Self {
            buffer,
            pos: 0.0,
            rate: playback_rate.max(0.0),
            dry_gain,
            wet_gain,
            pan,
            start_frame,
            active: true,
        }
    }

    pub fn is_panned(&self) -> bool {
        self.pan.is_some()
    }

    /// Add this voice's contribution for one block starting at engine frame
    /// `block_start`. Dry and wet taps come off the same (post-pan) signal.
    pub fn render_into(
        &mut self,
        block_start: u64,
        dry: &mut [StereoFrame],
        wet: &mut [StereoFrame],
    ) {
        if !self.active {
            return;
        }
        let data = &self.buffer.data;
        if data.is_empty() || self.rate <= 0.0 {
            self.active = false;
            return;
        }
        let last = (data.len() - 1) as f32;

        for (i, (d, w)) in dry.iter_mut().zip(wet.iter_mut()).enumerate() {
            // hold until the scheduled start
            if block_start + (i as u64) < self.start_frame {
                continue;
            }
            if self.pos > last {
                self.active = false;
                break;
            }

            let idx = self.pos as usize;
            let frac = self.pos - idx as f32;
            let s0 = data[idx];
            let s1 = data.get(idx + 1).copied().unwrap_or(s0);
            let mut sample = StereoFrame {
                left: lerp(s0.left, s1.left, frac),
                right: lerp(s0.right, s1.right, frac),
            };

            if let Some(pan) = self.pan {
                sample.left *= pan.left;
                sample.right *= pan.right;
            }

            d.add(sample.scaled(self.dry_gain));
            w.add(sample.scaled(self.wet_gain));

            self.pos += self.rate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(frames: &[f32]) -> Arc<SampleBuffer> {
        Arc::new(SampleBuffer {
            data: frames
                .iter()
                .map(|&x| StereoFrame { left: x, right: x })
                .collect(),
        })
    }

    #[test]
    fn taps_dry_and_wet_independently() {
        let mut voice = Voice::new(buffer(&[1.0]), 0.5, 0.25, None, 1.0, 0);
        let mut dry = [StereoFrame::zero(); 4];
        let mut wet = [StereoFrame::zero(); 4];
        voice.render_into(0, &mut dry, &mut wet);
        assert_eq!(dry[0].left, 0.5);
        assert_eq!(wet[0].left, 0.25);
        assert!(!voice.active);
    }

    #[test]
    fn waits_for_scheduled_start() {
        let mut voice = Voice::new(buffer(&[1.0, 1.0]), 1.0, 0.0, None, 1.0, 6);
        let mut dry = [StereoFrame::zero(); 8];
        let mut wet = [StereoFrame::zero(); 8];
        voice.render_into(0, &mut dry, &mut wet);
        assert_eq!(dry[5].left, 0.0);
        assert_eq!(dry[6].left, 1.0);
        assert_eq!(dry[7].left, 1.0);
    }

    #[test]
    fn double_rate_skips_frames() {
        let mut voice = Voice::new(buffer(&[0.0, 1.0, 2.0, 3.0]), 1.0, 0.0, None, 2.0, 0);
        let mut dry = [StereoFrame::zero(); 4];
        let mut wet = [StereoFrame::zero(); 4];
        voice.render_into(0, &mut dry, &mut wet);
        assert_eq!(dry[0].left, 0.0);
        assert_eq!(dry[1].left, 2.0);
        assert!(!voice.active);
    }

    #[test]
    fn centered_source_ahead_attenuates_equally() {
        // the default hi-hat placement: straight ahead along -z, distance 2
        let pan = PanGains::from_position(0.0, 0.0, -2.0);
        assert!((pan.left - pan.right).abs() < 1e-6);
        // distance 2 halves, equal-power center multiplies by cos(45°)
        let expected = 0.5 * std::f32::consts::FRAC_1_SQRT_2;
        assert!((pan.left - expected).abs() < 1e-6);
    }

    #[test]
    fn source_to_the_right_favors_right_channel() {
        let pan = PanGains::from_position(1.0, 0.0, -1.0);
        assert!(pan.right > pan.left);
    }

    #[test]
    fn rear_positions_mirror_onto_the_front() {
        // centered behind the listener still pans center, not hard right
        let behind = PanGains::from_position(0.0, 0.0, 2.0);
        let ahead = PanGains::from_position(0.0, 0.0, -2.0);
        assert!((behind.left - ahead.left).abs() < 1e-6);
        assert!((behind.right - ahead.right).abs() < 1e-6);

        // behind-left still leans left
        let rear_left = PanGains::from_position(-1.0, 0.0, 1.0);
        assert!(rear_left.left > rear_left.right);
    }
}
