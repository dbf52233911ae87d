use std::path::{Path, PathBuf};

use bootcamp_store::{Store, StoreError};
use bson::Document;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid seed file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read a JSON array of bootcamp documents.
pub fn load_documents(path: &Path) -> Result<Vec<Document>, SeedError> {
    let bytes = std::fs::read(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Insert every document or none. Returns how many were inserted.
pub fn import(store: &dyn Store, docs: Vec<Document>) -> Result<usize, SeedError> {
    let inserted = store.insert_many(docs)?;
    tracing::info!(count = inserted.len(), "bootcamp data imported");
    Ok(inserted.len())
}

pub fn delete_all(store: &dyn Store) -> Result<u64, SeedError> {
    let removed = store.delete_many()?;
    tracing::info!(count = removed, "bootcamp data deleted");
    Ok(removed)
}
