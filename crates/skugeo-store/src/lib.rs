//! JSON file persistence for acquisition batches.
//!
//! A save writes the whole batch to a temporary sibling file, flushes it to
//! disk, then renames it over the target. Readers see either the previous
//! batch or the new one, never a partial file.

use std::path::{Path, PathBuf};

use skugeo_core::Batch;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode batch: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("{} is not a valid batch file: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Stores one [`Batch`] as pretty-printed UTF-8 JSON at a fixed path.
///
/// Each save replaces the previous batch.
#[derive(Debug, Clone)]
pub struct JsonBatchStore {
    path: PathBuf,
}

impl JsonBatchStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `batch` atomically, creating the parent directory if needed.
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Encode`] if the batch cannot be serialized.
    /// - [`StoreError::Io`] if the directory, temporary file, or rename
    ///   fails. The previous file at the target path is left untouched.
    pub async fn save(&self, batch: &Batch) -> Result<PathBuf, StoreError> {
        let mut encoded = serde_json::to_vec_pretty(batch).map_err(StoreError::Encode)?;
        encoded.push(b'\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let tmp_path = self.temp_path();
        if let Err(e) = write_synced(&tmp_path, &encoded).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e);
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::io(&self.path, e));
        }

        tracing::info!(
            path = %self.path.display(),
            products = batch.count(),
            bytes = encoded.len(),
            "batch saved"
        );
        Ok(self.path.clone())
    }

    /// Reads the batch previously written by [`JsonBatchStore::save`].
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the file cannot be read.
    /// - [`StoreError::Decode`] if the file is not a batch document.
    pub async fn load(&self) -> Result<Batch, StoreError> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Hidden sibling of the target, so the final rename stays on one
    /// filesystem.
    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map_or_else(|| "batch".into(), |n| n.to_string_lossy().into_owned());
        self.path
            .with_file_name(format!(".{file_name}.{}.tmp", std::process::id()))
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut file = fs::File::create(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    file.write_all(bytes)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    file.sync_all().await.map_err(|e| StoreError::io(path, e))
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
