//! Snapshot persistence: one pretty-printed JSON file per snapshot.
//!
//! Files are named `candidate_<YYYYMMDD_HHMMSS>.json`. Writes never overwrite:
//! a same-second collision gets a `_NN` suffix, which sorts after the bare
//! name, so "latest" is still the name that sorts last.

pub mod handlers;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::models::snapshot::{AssessmentSnapshot, SNAPSHOT_FORMAT_VERSION};

const FILE_PREFIX: &str = "candidate_";
const FILE_SUFFIX: &str = ".json";
const MAX_COLLISION_SUFFIX: u32 = 99;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed snapshot {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(
        "Snapshot {} has format version {found}; newest supported is {}",
        path.display(),
        SNAPSHOT_FORMAT_VERSION
    )]
    UnsupportedVersion { path: PathBuf, found: u32 },

    #[error("More than {max} snapshots share the timestamp {0}", max = MAX_COLLISION_SUFFIX)]
    TooManyCollisions(String),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Snapshot directory handle. Shared across sessions without locking.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes the snapshot to a new file and returns its path.
    pub async fn write(&self, snapshot: &AssessmentSnapshot) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(io_err(&self.dir))?;

        let body = serde_json::to_vec_pretty(snapshot)?;
        let stamp = snapshot.timestamp.format("%Y%m%d_%H%M%S").to_string();

        for attempt in 0..=MAX_COLLISION_SUFFIX {
            let path = self.dir.join(file_name(&stamp, attempt));
            let opened = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            let file = match opened {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("Snapshot {} exists, trying next suffix", path.display());
                    continue;
                }
                Err(e) => return Err(io_err(&path)(e)),
            };

            write_or_discard(&path, file, &body).await?;
            info!("Saved snapshot to {}", path.display());
            return Ok(path);
        }

        Err(StorageError::TooManyCollisions(stamp))
    }

    /// Reads the snapshot whose file name sorts last. `None` when the
    /// directory or any matching file is absent.
    pub async fn latest(&self) -> Result<Option<AssessmentSnapshot>, StorageError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(&self.dir)(e)),
        };

        let mut latest: Option<String> = None;
        while let Some(entry) = entries.next_entry().await.map_err(io_err(&self.dir))? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if is_snapshot_name(&name) && latest.as_ref().map_or(true, |l| name > *l) {
                latest = Some(name);
            }
        }

        let Some(name) = latest else {
            return Ok(None);
        };

        let path = self.dir.join(name);
        let raw = fs::read(&path).await.map_err(io_err(&path))?;
        let snapshot: AssessmentSnapshot =
            serde_json::from_slice(&raw).map_err(|source| StorageError::Parse {
                path: path.clone(),
                source,
            })?;

        if snapshot.format_version > SNAPSHOT_FORMAT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                path,
                found: snapshot.format_version,
            });
        }

        debug!("Loaded latest snapshot from {}", path.display());
        Ok(Some(snapshot))
    }
}

/// Writes `body` to a freshly created file. On failure the partial file is
/// removed so it cannot shadow older snapshots in `latest`.
async fn write_or_discard<W>(path: &Path, mut file: W, body: &[u8]) -> Result<(), StorageError>
where
    W: AsyncWrite + Unpin,
{
    let written = match file.write_all(body).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };
    drop(file);

    if let Err(source) = written {
        if let Err(e) = fs::remove_file(path).await {
            warn!("Failed to remove partial snapshot {}: {e}", path.display());
        }
        return Err(io_err(path)(source));
    }
    Ok(())
}

fn file_name(stamp: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{FILE_PREFIX}{stamp}{FILE_SUFFIX}")
    } else {
        format!("{FILE_PREFIX}{stamp}_{attempt:02}{FILE_SUFFIX}")
    }
}

fn is_snapshot_name(name: &str) -> bool {
    name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX)
}
