//! Transaction store
//!
//! Reads captured transactions from a data directory of JSON files.

use super::types::ApiTransaction;
use crate::error::{Error, Result, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory of captured transaction files
///
/// Each `*.json` file is either a session file (a JSON array of
/// transactions) or a single transaction object.
#[derive(Debug, Clone)]
pub struct TransactionStore {
    dir: PathBuf,
}

impl TransactionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Data directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every transaction, files in name order
    ///
    /// Unreadable or malformed files are skipped with a warning.
    pub fn load_all(&self) -> Result<Vec<ApiTransaction>> {
        let mut transactions = Vec::new();
        let files = self.json_files()?;

        for file in &files {
            let content = match fs::read_to_string(file) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping unreadable file {}: {}", file.display(), e);
                    continue;
                }
            };

            match parse_transactions(&content) {
                Ok(parsed) => {
                    debug!("Loaded {} transactions from {}", parsed.len(), file.display());
                    transactions.extend(parsed);
                }
                Err(e) => warn!("Skipping malformed file {}: {}", file.display(), e),
            }
        }

        info!(
            "Loaded {} transactions from {} files in {}",
            transactions.len(),
            files.len(),
            self.dir.display()
        );
        Ok(transactions)
    }

    /// Delete every `*.json` file, returning how many were removed
    pub fn clear(&self) -> Result<usize> {
        let files = self.json_files()?;
        for file in &files {
            fs::remove_file(file)
                .with_context(|| format!("Failed to remove {}", file.display()))?;
        }
        info!("Removed {} transaction files from {}", files.len(), self.dir.display());
        Ok(files.len())
    }

    /// Sorted `*.json` files directly inside the data directory
    fn json_files(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::file_not_found(self.dir.display().to_string())
            } else {
                Error::Io(e)
            }
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Parse a session array or a single transaction
pub fn parse_transactions(content: &str) -> Result<Vec<ApiTransaction>> {
    if content.trim_start().starts_with('[') {
        Ok(serde_json::from_str(content)?)
    } else {
        Ok(vec![serde_json::from_str(content)?])
    }
}
