// Catalog module - ROM catalog and program payload loading
//
// The catalog is a JSON document at `roms/index.json` listing the program
// images available to load:
//
//     [{ "name": "Game A", "file": "a.bin" }, ...]
//
// Each entry's payload lives at `roms/<file>` and is handed to the core
// verbatim. All requests go through an `AssetFetcher` with origin-relative
// paths (`roms/index.json`, `roms/<file>`). `DirectoryFetcher` serves them
// from a root directory; an HTTP origin plugs in as another `AssetFetcher`
// issuing `GET <origin>/<path>`, with no change to the loader.

mod fetch;
pub mod menu;

pub use fetch::DirectoryFetcher;
pub use menu::CatalogMenu;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::sync::Arc;

/// Request path of the catalog document
pub const CATALOG_PATH: &str = "roms/index.json";

/// One selectable program image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Display name
    pub name: String,
    /// File name under `roms/`
    pub file: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }

    /// Request path of this entry's payload
    pub fn program_path(&self) -> String {
        program_path(&self.file)
    }
}

/// Request path of a payload file
pub fn program_path(file: &str) -> String {
    format!("roms/{}", file)
}

/// Errors raised while fetching a single asset
#[derive(Debug)]
pub enum FetchError {
    /// The asset could not be read
    Io { path: String, source: io::Error },

    /// The request path escapes the asset root or is malformed
    InvalidPath(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Io { path, source } => write!(f, "Failed to fetch {}: {}", path, source),
            FetchError::InvalidPath(path) => write!(f, "Invalid request path: {}", path),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Io { source, .. } => Some(source),
            FetchError::InvalidPath(_) => None,
        }
    }
}

/// Errors raised while loading the catalog document
#[derive(Debug)]
pub enum CatalogError {
    /// The document could not be fetched
    Fetch(FetchError),

    /// The document is not a JSON array of `{name, file}` records
    Parse(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Fetch(e) => write!(f, "Catalog fetch failed: {}", e),
            CatalogError::Parse(e) => write!(f, "Catalog parse failed: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Fetch(e) => Some(e),
            CatalogError::Parse(e) => Some(e),
        }
    }
}

impl From<FetchError> for CatalogError {
    fn from(err: FetchError) -> Self {
        CatalogError::Fetch(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err)
    }
}

/// Byte source for catalog and payload requests
///
/// Implementations must be shareable with worker threads.
pub trait AssetFetcher: Send + Sync {
    /// Fetch the asset at a relative request path such as `roms/a.bin`
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError>;
}

/// Loads the catalog document and program payloads
///
/// Cheap to clone; clones share the fetcher and can be moved to worker threads.
#[derive(Clone)]
pub struct RomCatalogLoader {
    fetcher: Arc<dyn AssetFetcher>,
}

impl RomCatalogLoader {
    pub fn new(fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch and parse `roms/index.json`
    ///
    /// A single attempt is made; failures are returned to the caller.
    pub fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let bytes = self.fetcher.fetch(CATALOG_PATH)?;
        let entries: Vec<CatalogEntry> = serde_json::from_slice(&bytes)?;
        log::info!("Catalog loaded: {} entries", entries.len());
        Ok(entries)
    }

    /// Fetch the payload of `entry`
    pub fn fetch_program(&self, entry: &CatalogEntry) -> Result<Vec<u8>, FetchError> {
        let path = entry.program_path();
        let bytes = self.fetcher.fetch(&path)?;
        log::debug!("Fetched {} ({} bytes)", path, bytes.len());
        Ok(bytes)
    }
}

impl fmt::Debug for RomCatalogLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RomCatalogLoader").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory fetcher that records requested paths
    #[derive(Default)]
    struct MapFetcher {
        assets: HashMap<String, Vec<u8>>,
        requests: Mutex<Vec<String>>,
    }

    impl MapFetcher {
        fn with(mut self, path: &str, bytes: &[u8]) -> Self {
            self.assets.insert(path.to_string(), bytes.to_vec());
            self
        }
    }

    impl AssetFetcher for MapFetcher {
        fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
            self.requests.lock().unwrap().push(path.to_string());
            self.assets.get(path).cloned().ok_or_else(|| FetchError::Io {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "not found"),
            })
        }
    }

    #[test]
    fn test_single_entry_catalog() {
        let fetcher = MapFetcher::default()
            .with(CATALOG_PATH, br#"[{"name":"Game A","file":"a.bin"}]"#);
        let loader = RomCatalogLoader::new(Arc::new(fetcher));

        let entries = loader.fetch_catalog().unwrap();
        assert_eq!(entries, vec![CatalogEntry::new("Game A", "a.bin")]);
    }

    #[test]
    fn test_fetch_program_requests_roms_path() {
        let fetcher = Arc::new(MapFetcher::default().with("roms/a.bin", &[1, 2, 3]));
        let loader = RomCatalogLoader::new(fetcher.clone());

        let bytes = loader
            .fetch_program(&CatalogEntry::new("Game A", "a.bin"))
            .unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
        assert_eq!(*fetcher.requests.lock().unwrap(), vec!["roms/a.bin"]);
    }

    #[test]
    fn test_missing_catalog_is_fetch_error() {
        let loader = RomCatalogLoader::new(Arc::new(MapFetcher::default()));
        assert!(matches!(loader.fetch_catalog(), Err(CatalogError::Fetch(_))));
    }

    #[test]
    fn test_malformed_catalog_is_parse_error() {
        let docs: [&[u8]; 3] = [b"not json", br#"{"name":"x"}"#, br#"[{"name":"x"}]"#];
        for doc in docs {
            let loader =
                RomCatalogLoader::new(Arc::new(MapFetcher::default().with(CATALOG_PATH, doc)));
            assert!(matches!(loader.fetch_catalog(), Err(CatalogError::Parse(_))));
        }
    }

    #[test]
    fn test_empty_catalog() {
        let loader =
            RomCatalogLoader::new(Arc::new(MapFetcher::default().with(CATALOG_PATH, b"[]")));
        assert!(loader.fetch_catalog().unwrap().is_empty());
    }

    #[test]
    fn test_catalog_is_fetched_once_per_call() {
        let fetcher = Arc::new(MapFetcher::default());
        let loader = RomCatalogLoader::new(fetcher.clone());
        let _ = loader.fetch_catalog();
        assert_eq!(fetcher.requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = CatalogError::Fetch(FetchError::InvalidPath("../x".to_string()));
        assert_eq!(
            err.to_string(),
            "Catalog fetch failed: Invalid request path: ../x"
        );
    }
}
