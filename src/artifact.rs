//! Model Artifact - handle to a trained context model on disk

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::{Error, Result};

/// A trained model produced by one training invocation.
///
/// The artifact is produced once per context order, relocated into the
/// sweep's own models directory, and then only read by scoring runs.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModelArtifact {
    k: u32,
    path: PathBuf,
    size_bytes: u64,
    created_at: DateTime<Utc>,
}

impl ModelArtifact {
    /// Take ownership of the file the trainer deposited at `produced`,
    /// moving it to `destination`.
    ///
    /// Falls back to copy + remove when a plain rename is not possible
    /// (e.g. across filesystems).
    ///
    /// # Errors
    ///
    /// Returns `Error::Artifact` if `produced` does not exist or cannot be
    /// moved.
    pub fn relocate(k: u32, produced: &Path, destination: &Path) -> Result<Self> {
        let metadata = fs::metadata(produced).map_err(|e| Error::Artifact {
            path: produced.to_path_buf(),
            message: if e.kind() == ErrorKind::NotFound {
                "trainer exited successfully but left no model file".to_string()
            } else {
                e.to_string()
            },
        })?;

        if let Err(rename_err) = fs::rename(produced, destination) {
            debug!(%rename_err, "rename failed, copying model artifact instead");
            fs::copy(produced, destination)
                .and_then(|_| fs::remove_file(produced))
                .map_err(|e| Error::Artifact {
                    path: destination.to_path_buf(),
                    message: format!("could not relocate model: {e}"),
                })?;
        }

        Ok(Self {
            k,
            path: destination.to_path_buf(),
            size_bytes: metadata.len(),
            created_at: Utc::now(),
        })
    }

    /// Context order the model was trained with.
    #[must_use]
    pub const fn k(&self) -> u32 {
        self.k
    }

    /// Sweep-local path of the model file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the model file in bytes.
    #[must_use]
    pub const fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// When the artifact was taken over by the sweep.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocate_moves_file() {
        let dir = tempfile::tempdir().unwrap();
        let produced = dir.path().join("k3.bin");
        let dest = dir.path().join("sweep_k3.bin");
        fs::write(&produced, b"model").unwrap();

        let artifact = ModelArtifact::relocate(3, &produced, &dest).unwrap();

        assert_eq!(artifact.k(), 3);
        assert_eq!(artifact.path(), dest.as_path());
        assert_eq!(artifact.size_bytes(), 5);
        assert!(!produced.exists());
        assert!(dest.exists());
    }

    #[test]
    fn test_relocate_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelArtifact::relocate(
            1,
            &dir.path().join("absent.bin"),
            &dir.path().join("dest.bin"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Artifact { .. }));
    }
}
