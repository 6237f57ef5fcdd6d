//! Durable key-value slots and the trendline collection persisted in them.

mod file;
mod memory;
mod trendline_store;

pub use file::{DATA_PATH_ENV, FileStore, resolve_data_dir};
pub use memory::MemoryStore;
pub use trendline_store::{
    DEFAULT_TRENDLINES_KEY, TRENDLINES_JSON_SCHEMA_V1, TrendlineStore, TrendlinesJsonContractV1,
};

use crate::error::ChartResult;

/// A string-valued slot addressed by key.
///
/// Reads of a missing key return `Ok(None)`, never an error.
pub trait KeyValueStore {
    fn read(&mut self, key: &str) -> ChartResult<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> ChartResult<()>;
    fn remove(&mut self, key: &str) -> ChartResult<()>;

    /// Moves an unreadable payload to `<key>_old` so the next write can't
    /// overwrite it.
    fn quarantine(&mut self, key: &str) -> ChartResult<()> {
        if let Some(value) = self.read(key)? {
            self.write(&backup_key(key), &value)?;
        }
        self.remove(key)
    }
}

#[must_use]
pub fn backup_key(key: &str) -> String {
    format!("{key}_old")
}
