use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ChartResult;
use crate::storage::{KeyValueStore, backup_key};

/// Overrides the data directory for every host.
pub const DATA_PATH_ENV: &str = "CHART_TRENDLINES_DATA_PATH";

const APP_DIR_NAME: &str = "chart-trendlines";

/// Resolves where persisted state lives.
///
/// Order: explicit path, `CHART_TRENDLINES_DATA_PATH`, the platform data
/// directory, then the working directory.
#[must_use]
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(DATA_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// One JSON file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn read(&mut self, key: &str) -> ChartResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> ChartResult<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ChartResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn quarantine(&mut self, key: &str) -> ChartResult<()> {
        let path = self.path_for(key);
        let backup_path = self.path_for(&backup_key(key));
        if let Err(err) = fs::rename(&path, &backup_path) {
            warn!(
                "failed to back up corrupted state file '{}' to '{}': {err}",
                path.display(),
                backup_path.display()
            );
            return Err(err.into());
        }
        info!(
            "backed up corrupted state file to '{}'; it can be restored manually",
            backup_path.display()
        );
        Ok(())
    }
}
