// Static asset catalogs: the drum kit list and the impulse response table.
// These mirror the stock sound library layout on disk:
//   <sounds_dir>/drum-samples/<kit>/{kick,snare,hihat,tom1,tom2,tom3}.wav
//   <sounds_dir>/impulse-responses/<file>.wav

use crate::shared::Instrument;

/// (directory name, display name) for every shipped kit.
pub const KITS: [(&str, &str); 15] = [
    ("R8", "Roland R-8"),
    ("CR78", "Roland CR-78"),
    ("KPR77", "Korg KPR-77"),
    ("LINN", "LinnDrum"),
    ("Kit3", "Kit 3"),
    ("Kit8", "Kit 8"),
    ("Techno", "Techno"),
    ("Stark", "Stark"),
    ("breakbeat8", "Breakbeat 8"),
    ("breakbeat9", "Breakbeat 9"),
    ("breakbeat13", "Breakbeat 13"),
    ("acoustic-kit", "Acoustic Kit"),
    ("4OP-FM", "4OP-FM"),
    ("TheCheebacabra1", "The Cheebacabra 1"),
    ("TheCheebacabra2", "The Cheebacabra 2"),
];

/// One entry in the impulse response table. Index 0 is the "No Effect"
/// sentinel: no source file, dry passes straight through.
#[derive(Clone, Debug)]
pub struct ImpulseResponseInfo {
    pub name: &'static str,
    /// File name under impulse-responses/, None for the sentinel.
    pub file: Option<&'static str>,
    // Each impulse response wants its own overall dry and wet balance.
    // The telephone filter, for example, needs dry at 0 to be heard at all.
    pub dry_mix: f32,
    pub wet_mix: f32,
}

pub const IMPULSE_RESPONSES: [ImpulseResponseInfo; 26] = [
    ir("No Effect", None, 1.0, 0.0),
    ir("Spreader 1", Some("spreader50-65ms.wav"), 0.8, 1.4),
    ir("Spreader 2", Some("noise-spreader1.wav"), 1.0, 1.0),
    ir("Spring Reverb", Some("feedback-spring.wav"), 1.0, 1.0),
    ir("Space Oddity", Some("filter-rhythm3.wav"), 1.0, 0.7),
    ir("Reverse", Some("spatialized5.wav"), 1.0, 1.0),
    ir("Huge Reverse", Some("matrix6-backwards.wav"), 0.0, 0.7),
    ir("Telephone Filter", Some("filter-telephone.wav"), 0.0, 1.2),
    ir("Lopass Filter", Some("filter-lopass160.wav"), 0.0, 0.5),
    ir("Hipass Filter", Some("filter-hipass5000.wav"), 0.0, 4.0),
    ir("Comb 1", Some("comb-saw1.wav"), 0.0, 0.7),
    ir("Comb 2", Some("comb-saw2.wav"), 0.0, 1.0),
    ir("Cosmic Ping", Some("cosmic-ping-long.wav"), 0.0, 0.9),
    ir("Kitchen", Some("kitchen-true-stereo.wav"), 1.0, 1.0),
    ir("Living Room", Some("dining-living-true-stereo.wav"), 1.0, 1.0),
    ir("Living-Bedroom", Some("living-bedroom-leveled.wav"), 1.0, 1.0),
    ir("Dining-Far-Kitchen", Some("dining-far-kitchen.wav"), 1.0, 1.0),
    ir("Medium Hall 1", Some("matrix-reverb2.wav"), 1.0, 1.0),
    ir("Medium Hall 2", Some("matrix-reverb3.wav"), 1.0, 1.0),
    ir("Large Hall", Some("spatialized4.wav"), 1.0, 0.5),
    ir("Peculiar", Some("peculiar-backwards.wav"), 1.0, 1.0),
    ir("Backslap", Some("backslap1.wav"), 1.0, 1.0),
    ir("Warehouse", Some("cardiod-rear-levelled.wav"), 1.0, 1.0),
    ir("Diffusor", Some("diffusor3.wav"), 1.0, 1.0),
    ir("Binaural Hall", Some("s2_r4_bd.wav"), 1.0, 0.5),
    ir("Huge", Some("matrix-reverb6.wav"), 1.0, 0.7),
];

const fn ir(
    name: &'static str,
    file: Option<&'static str>,
    dry_mix: f32,
    wet_mix: f32,
) -> ImpulseResponseInfo {
    ImpulseResponseInfo { name, file, dry_mix, wet_mix }
}

pub fn kit_sample_location(sounds_dir: &str, kit_dir: &str, instrument: Instrument) -> String {
    format!("{sounds_dir}/drum-samples/{kit_dir}/{}", instrument.file_name())
}

pub fn impulse_response_location(sounds_dir: &str, file: &str) -> String {
    format!("{sounds_dir}/impulse-responses/{file}")
}
