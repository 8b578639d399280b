use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::PersistenceError;
use crate::record::{MatchSet, Record};

/// Serialization used for the persisted match set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown output format '{}' (expected yaml or json)",
                other
            )),
        }
    }
}

impl OutputFormat {
    /// Guesses the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Serializes the records in this format
    pub fn encode(&self, records: &[&Record]) -> Result<Vec<u8>, PersistenceError> {
        match self {
            Self::Yaml => Ok(serde_yaml::to_string(records)?.into_bytes()),
            Self::Json => {
                let mut bytes = serde_json::to_vec_pretty(records)?;
                bytes.push(b'\n');
                Ok(bytes)
            }
        }
    }

    /// Decodes records previously written in this format
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<Record>, PersistenceError> {
        match self {
            Self::Yaml => Ok(serde_yaml::from_slice(bytes)?),
            Self::Json => Ok(serde_json::from_slice(bytes)?),
        }
    }
}

/// Writes a finished match set to durable storage
pub trait Persister {
    /// Persists `matches`, returning where they were written
    fn persist(&self, matches: &MatchSet) -> Result<PathBuf, PersistenceError>;
}

/// Persists a match set to a single file, replacing any previous content
#[derive(Debug, Clone)]
pub struct FilePersister {
    path: PathBuf,
    format: OutputFormat,
}

impl FilePersister {
    pub fn new(path: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }
}

impl Persister for FilePersister {
    fn persist(&self, matches: &MatchSet) -> Result<PathBuf, PersistenceError> {
        let records = matches.sorted_by_id();
        let bytes = self.format.encode(&records)?;
        debug!(
            "Encoded {} records as {:?} ({} bytes)",
            records.len(),
            self.format,
            bytes.len()
        );

        write_replacing(&self.path, &bytes)?;
        info!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(self.path.clone())
    }
}

/// Writes `bytes` to a temporary sibling of `path` and renames it into place,
/// so readers see either the old content or the complete new content.
///
/// The replacement keeps the permissions of the file it replaces; a new file
/// is created world-readable (`0644` on unix) rather than with the owner-only
/// mode of the temporary file.
fn write_replacing(path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PersistenceError::io(path, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| PersistenceError::io(path, e))?;
    if let Some(permissions) = destination_permissions(path) {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| PersistenceError::io(path, e))?;
    }
    tmp.persist(path)
        .map_err(|e| PersistenceError::io(path, e.error))?;
    Ok(())
}

fn destination_permissions(path: &Path) -> Option<fs::Permissions> {
    if let Ok(metadata) = fs::metadata(path) {
        return Some(metadata.permissions());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(fs::Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

/// Reads back a file written by [`FilePersister`]
pub fn load_records(path: &Path, format: OutputFormat) -> Result<Vec<Record>, PersistenceError> {
    let bytes = fs::read(path).map_err(|e| PersistenceError::io(path, e))?;
    format.decode(&bytes)
}
