use std::path::PathBuf;

use super::{KeyValueStore, StoreError};

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            key: key.to_string(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        // Write beside the target and rename so a crash never leaves half a file.
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        std::fs::write(&tmp, value).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)?;
        log::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    /// Copies `<key>.json` to `<key>.json.bak`.
    fn set_aside(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }
        let backup = self.dir.join(format!("{}.json.bak", key));
        std::fs::copy(&path, &backup).map_err(|source| StoreError::Io {
            key: key.to_string(),
            source,
        })?;
        Ok(())
    }
}
