// Directory-backed asset fetcher
//
// Serves request paths such as `roms/index.json` from files under a root
// directory. Request paths must be relative and must stay inside the root.

use super::{AssetFetcher, FetchError};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Fetches assets from a directory on disk
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a request path onto the file system
    ///
    /// # Errors
    /// [`FetchError::InvalidPath`] for empty, absolute or `..` paths
    pub fn resolve(&self, request: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(request);
        let mut resolved = self.root.clone();
        let mut parts = 0;

        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    parts += 1;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(FetchError::InvalidPath(request.to_string()));
                }
            }
        }

        if parts == 0 {
            return Err(FetchError::InvalidPath(request.to_string()));
        }
        Ok(resolved)
    }
}

impl AssetFetcher for DirectoryFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let file = self.resolve(path)?;
        fs::read(&file).map_err(|source| FetchError::Io {
            path: path.to_string(),
            source,
        })
    }
}
