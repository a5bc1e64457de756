// Engine-wide constants and the fixed instrument set.

/// Every kit carries exactly these six instruments.
pub const NUM_INSTRUMENTS: usize = 6;

/// Kit selected after startup kicks off loading (index into the kit catalog).
pub const INITIAL_KIT_INDEX: usize = 1;

/// Master bus gain, kept under unity so stacked notes don't clip.
pub const MASTER_GAIN: f32 = 0.7;

/// Effect return level. Fixed for now; reserved for a UI effect-level slider.
pub const EFFECT_LEVEL: f32 = 1.0;

/// Fraction of a note's gain sent to the convolver wet path.
pub const DEFAULT_SEND_GAIN: f32 = 0.5;

/// Where the hi-hat sits in 3-D space: centered, two units straight ahead
/// of the listener (see `PanGains` for the axis convention).
pub const HIHAT_POSITION: (f32, f32, f32) = (0.0, 0.0, -2.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instrument {
    Kick,
    Snare,
    HiHat,
    Tom1,
    Tom2,
    Tom3,
}

impl Instrument {
    pub const ALL: [Instrument; NUM_INSTRUMENTS] = [
        Instrument::Kick,
        Instrument::Snare,
        Instrument::HiHat,
        Instrument::Tom1,
        Instrument::Tom2,
        Instrument::Tom3,
    ];

    /// Slot index within a kit, 0..6 in catalog order.
    pub fn index(self) -> usize {
        match self {
            Instrument::Kick => 0,
            Instrument::Snare => 1,
            Instrument::HiHat => 2,
            Instrument::Tom1 => 3,
            Instrument::Tom2 => 4,
            Instrument::Tom3 => 5,
        }
    }

    /// Sample file name inside a kit's directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Instrument::Kick => "kick.wav",
            Instrument::Snare => "snare.wav",
            Instrument::HiHat => "hihat.wav",
            Instrument::Tom1 => "tom1.wav",
            Instrument::Tom2 => "tom2.wav",
            Instrument::Tom3 => "tom3.wav",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Instrument::Kick => "Kick",
            Instrument::Snare => "Snare",
            Instrument::HiHat => "HiHat",
            Instrument::Tom1 => "Tom1",
            Instrument::Tom2 => "Tom2",
            Instrument::Tom3 => "Tom3",
        }
    }

    pub fn from_name(name: &str) -> Option<Instrument> {
        Instrument::ALL.iter().copied().find(|i| i.name() == name)
    }

    /// Only the hi-hat gets collapsed to mono at decode time.
    pub fn mix_to_mono(self) -> bool {
        matches!(self, Instrument::HiHat)
    }

    /// Only the hi-hat routes through the positional panner.
    pub fn panned(self) -> bool {
        matches!(self, Instrument::HiHat)
    }
}
