use super::LoadError;

/// The host's "give me the raw bytes at this location" capability. The
/// engine doesn't care whether that's a filesystem, an archive, or a network
/// layer; tests use an in-memory map.
pub trait FetchBytes: Send + Sync {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError>;
}

/// Default fetcher: locations are plain filesystem paths.
pub struct FsFetch;

impl FetchBytes for FsFetch {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        std::fs::read(location).map_err(|e| LoadError::Fetch {
            location: location.to_string(),
            reason: e.to_string(),
        })
    }
}
