use super::frame::StereoFrame;

// Feed-forward peak compressor to sweeten the final mix. Parameters follow
// the usual drum-bus defaults: gentle on quiet material, clamps hard on
// stacked hits.
const THRESHOLD_DB: f32 = -24.0;
const RATIO: f32 = 12.0;
const ATTACK_SECS: f32 = 0.003;
const RELEASE_SECS: f32 = 0.25;

pub struct Compressor {
    attack_coeff: f32,
    release_coeff: f32,
    envelope: f32,
}

impl Compressor {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            attack_coeff: smoothing_coeff(ATTACK_SECS, sample_rate),
            release_coeff: smoothing_coeff(RELEASE_SECS, sample_rate),
            envelope: 0.0,
        }
    }

    pub fn process(&mut self, bus: &mut [StereoFrame]) {
        for frame in bus.iter_mut() {
            let peak = frame.peak();
            let coeff = if peak > self.envelope {
                self.attack_coeff
            } else {
                self.release_coeff
            };
            self.envelope = peak + coeff * (self.envelope - peak);

            let gain = gain_for(self.envelope);
            *frame = frame.scaled(gain);
        }
    }
}

fn smoothing_coeff(time_secs: f32, sample_rate: f32) -> f32 {
    (-1.0 / (time_secs * sample_rate)).exp()
}

fn gain_for(envelope: f32) -> f32 {
    if envelope <= 1e-6 {
        return 1.0;
    }
    let env_db = 20.0 * envelope.log10();
    if env_db <= THRESHOLD_DB {
        return 1.0;
    }
    let over_db = env_db - THRESHOLD_DB;
    let reduction_db = over_db * (1.0 - 1.0 / RATIO);
    10f32.powf(-reduction_db / 20.0)
}
