use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{Collection, DocumentStore, StoreError};

/// Stores each collection as a pretty-printed JSON file in a data directory.
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Creates the store, creating `data_dir` if needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let content = match fs::read_to_string(self.path_for(collection)) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { collection, source }),
        };

        serde_json::from_str(&content).map_err(|source| StoreError::Json { collection, source })
    }

    fn save(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|source| StoreError::Json { collection, source })?;

        // Write next to the target and rename over it so readers never see
        // a half-written file.
        let path = self.path_for(collection);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|source| StoreError::Io { collection, source })?;

        debug!("Saved {} records to {}", records.len(), path.display());
        Ok(())
    }
}
