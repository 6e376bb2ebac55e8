//! Knowledge Store - JSON file persistence for the knowledge base
//!
//! Loading never invents an empty store: a missing or corrupt file is an
//! error, and a fresh store must be created explicitly with [`KnowledgeStore::init`].
//! Saving writes the whole base to a temp file in the target directory and
//! renames it over the old file.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use super::KnowledgeBase;

/// Errors raised while reading or writing the store file
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("failed to read knowledge base {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("knowledge base {} is not valid: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize knowledge base: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write knowledge base {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("knowledge base {} already exists", .0.display())]
    AlreadyExists(PathBuf),
}

/// Handle to the knowledge base file on disk
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    path: PathBuf,
}

impl KnowledgeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the knowledge base. Fails if the file is missing or malformed.
    pub fn load(&self) -> Result<KnowledgeBase, KnowledgeError> {
        load(&self.path)
    }

    /// Replace the file contents with `kb`
    pub fn save(&self, kb: &KnowledgeBase) -> Result<(), KnowledgeError> {
        save(&self.path, kb)
    }

    /// Create a new empty store file, refusing to overwrite an existing one
    pub fn init(&self) -> Result<KnowledgeBase, KnowledgeError> {
        if self.path.exists() {
            return Err(KnowledgeError::AlreadyExists(self.path.clone()));
        }
        let kb = KnowledgeBase::new();
        self.save(&kb)?;
        info!("Created empty knowledge base at {}", self.path.display());
        Ok(kb)
    }
}

/// Read and parse a knowledge base file
pub fn load(path: &Path) -> Result<KnowledgeBase, KnowledgeError> {
    let contents = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let kb: KnowledgeBase =
        serde_json::from_str(&contents).map_err(|source| KnowledgeError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Loaded {} records from {}", kb.len(), path.display());
    Ok(kb)
}

/// Serialize `kb` and atomically replace `path` with it
pub fn save(path: &Path, kb: &KnowledgeBase) -> Result<(), KnowledgeError> {
    let contents = serde_json::to_string_pretty(kb).map_err(KnowledgeError::Serialize)?;

    let persist_err = |source: std::io::Error| KnowledgeError::Persist {
        path: path.to_path_buf(),
        source,
    };

    // Temp file must live on the same filesystem for the rename to be atomic
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(persist_err)?;
    tmp.write_all(contents.as_bytes()).map_err(persist_err)?;
    tmp.as_file().sync_all().map_err(persist_err)?;
    tmp.persist(path).map_err(|e| persist_err(e.error))?;

    debug!("Saved {} records to {}", kb.len(), path.display());
    Ok(())
}
