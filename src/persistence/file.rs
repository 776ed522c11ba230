//! JSON file gateway with a checksummed envelope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PersistenceError, PersistenceGateway};
use crate::part::Part;

/// Envelope format version written by this gateway.
pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk envelope around the part list
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEnvelope {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    /// `SHA-256` of the canonical JSON encoding of `parts`
    pub checksum: String,
    pub parts: Vec<Part>,
}

/// Either the envelope or the bare array written by earlier releases.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSnapshot {
    Envelope(SnapshotEnvelope),
    Bare(Vec<Part>),
}

/// Stores the inventory as a JSON file.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash mid-write leaves the previous snapshot in place.
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    path: PathBuf,
}

impl JsonFileGateway {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Calculate the `SHA-256` checksum of a part list
///
/// # Errors
///
/// Returns `PersistenceError::Serialization` if the parts cannot be encoded.
pub fn calculate_checksum(parts: &[Part]) -> Result<String, PersistenceError> {
    let canonical = serde_json::to_vec(parts)?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Validate a stored checksum against the parts it was written with
///
/// # Errors
///
/// Returns `PersistenceError::Corrupt` if the checksums differ.
pub fn validate_checksum(stored: &str, parts: &[Part]) -> Result<(), PersistenceError> {
    let current = calculate_checksum(parts)?;
    if stored == current {
        Ok(())
    } else {
        Err(PersistenceError::Corrupt(format!(
            "checksum mismatch: stored={stored}, current={current}"
        )))
    }
}

impl PersistenceGateway for JsonFileGateway {
    fn load(&self) -> Result<Option<Vec<Part>>, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredSnapshot = serde_json::from_str(&raw).map_err(|e| {
            PersistenceError::Corrupt(format!("{} is not a part snapshot: {e}", self.path.display()))
        })?;

        match stored {
            StoredSnapshot::Envelope(envelope) => {
                if envelope.version > SNAPSHOT_VERSION {
                    return Err(PersistenceError::Corrupt(format!(
                        "snapshot version {} is newer than supported version {}",
                        envelope.version, SNAPSHOT_VERSION
                    )));
                }
                validate_checksum(&envelope.checksum, &envelope.parts)?;
                Ok(Some(envelope.parts))
            }
            StoredSnapshot::Bare(parts) => {
                log::debug!("Loaded legacy bare snapshot from {}", self.path.display());
                Ok(Some(parts))
            }
        }
    }

    fn save(&self, parts: &[Part]) -> Result<(), PersistenceError> {
        let envelope = SnapshotEnvelope {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            checksum: calculate_checksum(parts)?,
            parts: parts.to_vec(),
        };
        let encoded = serde_json::to_vec_pretty(&envelope)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, encoded)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
