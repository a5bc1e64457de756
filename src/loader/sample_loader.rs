use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::audio::SampleBuffer;
use crate::shared::Instrument;

use super::{FetchBytes, LoadError};

/// Which container a completed load belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadTarget {
    KitSample { kit: usize, instrument: Instrument },
    ImpulseResponse { index: usize },
}

#[derive(Clone, Debug)]
pub struct LoadJob {
    pub target: LoadTarget,
    pub location: String,
    pub mix_to_mono: bool,
}

#[derive(Debug)]
pub struct LoadResult {
    pub target: LoadTarget,
    pub result: Result<SampleBuffer, LoadError>,
}

/// Fire-and-forget: fetch and decode on a worker thread, deliver the outcome
/// over `tx`. A failure is delivered too, never swallowed, so the readiness
/// count always resolves.
pub fn spawn_load(
    fetch: Arc<dyn FetchBytes>,
    job: LoadJob,
    target_rate: u32,
    tx: Sender<LoadResult>,
) {
    std::thread::spawn(move || {
        let result = fetch.fetch(&job.location).and_then(|bytes| {
            SampleBuffer::decode_wav(&bytes, target_rate, job.mix_to_mono).map_err(|e| {
                LoadError::Decode {
                    location: job.location.clone(),
                    reason: e.to_string(),
                }
            })
        });
        // receiver may be gone during shutdown, nothing to do about it
        let _ = tx.send(LoadResult { target: job.target, result });
    });
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::time::Duration;

    use super::super::fetch::testing::MemoryFetch;
    use super::*;

    fn tiny_wav() -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            writer.write_sample(0.5f32).unwrap();
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn delivers_decoded_buffer() {
        let fetch = Arc::new(MemoryFetch::new(HashMap::from([(
            "kit/kick.wav".to_string(),
            tiny_wav(),
        )])));
        let (tx, rx) = crossbeam_channel::unbounded();
        spawn_load(
            fetch,
            LoadJob {
                target: LoadTarget::KitSample { kit: 0, instrument: Instrument::Kick },
                location: "kit/kick.wav".to_string(),
                mix_to_mono: false,
            },
            44100,
            tx,
        );
        let done = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            done.target,
            LoadTarget::KitSample { kit: 0, instrument: Instrument::Kick }
        );
        assert_eq!(done.result.unwrap().len(), 1);
    }

    #[test]
    fn delivers_fetch_failure_as_completion() {
        let fetch = Arc::new(MemoryFetch::new(HashMap::new()));
        let (tx, rx) = crossbeam_channel::unbounded();
        spawn_load(
            fetch,
            LoadJob {
                target: LoadTarget::ImpulseResponse { index: 3 },
                location: "missing.wav".to_string(),
                mix_to_mono: false,
            },
            44100,
            tx,
        );
        let done = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(done.result, Err(LoadError::Fetch { .. })));
    }

    #[test]
    fn delivers_decode_failure_as_completion() {
        let fetch = Arc::new(MemoryFetch::new(HashMap::from([(
            "bad.wav".to_string(),
            b"these are not wav bytes".to_vec(),
        )])));
        let (tx, rx) = crossbeam_channel::unbounded();
        spawn_load(
            fetch,
            LoadJob {
                target: LoadTarget::ImpulseResponse { index: 1 },
                location: "bad.wav".to_string(),
                mix_to_mono: false,
            },
            44100,
            tx,
        );
        let done = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(done.result, Err(LoadError::Decode { .. })));
    }
}
