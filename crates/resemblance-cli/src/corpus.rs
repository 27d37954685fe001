//! Directory-based corpus loading.
//!
//! The original tool's datasets (Wikipedia articles, Enron mail) are
//! hardcoded file sets that don't exist in this environment; this reads
//! any directory of files instead, keyed by path relative to the corpus
//! root.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::CliError;

/// Read every regular file under `root` into an in-memory corpus, keyed
/// by its path relative to `root` (using `/` as the separator
/// regardless of platform, so keys are stable across runs).
pub fn load_corpus(root: &Path) -> Result<BTreeMap<String, Vec<u8>>, CliError> {
    let mut corpus = BTreeMap::new();

    for entry in WalkDir::new(root).into_iter() {
        let entry = entry.map_err(|e| {
            e.into_io_error()
                .unwrap_or_else(|| std::io::Error::other("corpus walk failed"))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");
        let bytes = fs::read(entry.path())?;
        corpus.insert(relative, bytes);
    }

    if corpus.is_empty() {
        return Err(CliError::EmptyCorpus(root.display().to_string()));
    }
    Ok(corpus)
}
