//! # JSON File Pending Store
//!
//! One file per sender: `<dir>/<address>.json`. Writes go to a temporary
//! file first and are renamed into place.

use crate::domain::PendingTransfer;
use crate::error::{TrackerError, TrackerResult};
use crate::ports::outbound::PendingStore;
use serde::{Deserialize, Serialize};
use shared_types::{to_checksum, Address};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// On-disk format version.
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedPendingSet {
    version: u32,
    sender: String,
    transfers: Vec<PendingTransfer>,
}

#[derive(Debug, Clone)]
pub struct JsonFilePendingStore {
    dir: PathBuf,
}

impl JsonFilePendingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, sender: &Address) -> PathBuf {
        self.dir.join(format!("{}.json", to_checksum(sender)))
    }
}

fn persistence(err: impl std::fmt::Display) -> TrackerError {
    TrackerError::Persistence {
        reason: err.to_string(),
    }
}

impl PendingStore for JsonFilePendingStore {
    fn load(&self, sender: &Address) -> TrackerResult<Vec<PendingTransfer>> {
        let bytes = match fs::read(self.path_for(sender)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(persistence(e)),
        };

        let persisted: PersistedPendingSet = serde_json::from_slice(&bytes).map_err(persistence)?;
        if persisted.version != FORMAT_VERSION {
            return Err(persistence(format!(
                "unsupported format version {}",
                persisted.version
            )));
        }
        Ok(persisted.transfers)
    }

    fn save(&self, sender: &Address, transfers: &[PendingTransfer]) -> TrackerResult<()> {
        fs::create_dir_all(&self.dir).map_err(persistence)?;

        let persisted = PersistedPendingSet {
            version: FORMAT_VERSION,
            sender: to_checksum(sender),
            transfers: transfers.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&persisted).map_err(persistence)?;

        let path = self.path_for(sender);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(persistence)?;
        fs::rename(&tmp, &path).map_err(persistence)
    }
}
