// Common test utilities for front end integration tests
//
// Builds throwaway catalog directories and a headless front end (memory
// surface + manual frame requester) that tests drive tick by tick.

#![allow(dead_code)]

use nes_frontend::catalog::{AssetFetcher, DirectoryFetcher, FetchError, RomCatalogLoader};
use nes_frontend::display::{MemorySurface, SurfaceOrigin};
use nes_frontend::emulator::{Emulator, FrontendConfig};
use nes_frontend::machine::ReferenceCore;
use nes_frontend::timing::{ManualRequester, TickOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A catalog directory under the system temp dir, removed on drop
pub struct CatalogDir {
    root: PathBuf,
}

impl CatalogDir {
    /// Create `<tmp>/<name>/roms/` with the given index document
    pub fn new(name: &str, index: &str) -> Self {
        let root = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("roms")).unwrap();
        fs::write(root.join("roms").join("index.json"), index).unwrap();
        Self { root }
    }

    /// Write a payload file under `roms/`
    pub fn add_program(&self, file: &str, bytes: &[u8]) {
        fs::write(self.root.join("roms").join(file), bytes).unwrap();
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for CatalogDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// Fetcher that records every request path before delegating
pub struct RecordingFetcher {
    inner: DirectoryFetcher,
    requests: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    pub fn new(root: &Path) -> Self {
        Self {
            inner: DirectoryFetcher::new(root),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl AssetFetcher for RecordingFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(path.to_string());
        self.inner.fetch(path)
    }
}

/// Headless front end driven by hand
pub struct Harness {
    pub emulator: Emulator<MemorySurface>,
    pub requester: ManualRequester,
    pub loader: RomCatalogLoader,
    pub fetcher: Arc<RecordingFetcher>,
}

impl Harness {
    pub fn new(root: &Path) -> Self {
        Self::with_config(root, &FrontendConfig::default())
    }

    pub fn with_config(root: &Path, config: &FrontendConfig) -> Self {
        let fetcher = Arc::new(RecordingFetcher::new(root));
        let loader = RomCatalogLoader::new(fetcher.clone());

        let mut emulator: Emulator<MemorySurface> =
            Emulator::new(Box::new(ReferenceCore::new()), config);
        let geometry = emulator.geometry();
        emulator.attach_surface(MemorySurface::new(geometry, SurfaceOrigin::TopLeft));

        Self {
            emulator,
            requester: ManualRequester::new(),
            loader,
            fetcher,
        }
    }

    /// Deliver the pending tick at `timestamp_ms`
    pub fn tick(&mut self, timestamp_ms: f64) -> TickOutcome {
        let handle = self
            .requester
            .take_pending()
            .expect("no tick requested");
        self.emulator
            .on_frame(handle, timestamp_ms, &mut self.requester)
            .unwrap()
    }

    /// Deliver ticks every `step_ms` starting at `start_ms`
    pub fn run_ticks(&mut self, start_ms: f64, step_ms: f64, count: usize) -> Vec<TickOutcome> {
        (0..count)
            .map(|i| self.tick(start_ms + step_ms * i as f64))
            .collect()
    }
}

/// Index document with one entry per `(name, file)` pair
pub fn index_json(entries: &[(&str, &str)]) -> String {
    let items: Vec<String> = entries
        .iter()
        .map(|(name, file)| format!(r#"{{"name":"{}","file":"{}"}}"#, name, file))
        .collect();
    format!("[{}]", items.join(","))
}
