//! Reference-list files: one library path per line.

use crate::assembly::AssemblyError;
use std::path::{Path, PathBuf};

/// Parse a reference list; blank lines are skipped and entries trimmed.
pub fn parse_reference_list(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

pub fn read_reference_list(path: &Path) -> Result<Vec<PathBuf>, AssemblyError> {
    let text = std::fs::read_to_string(path).map_err(|e| AssemblyError::io(path, e))?;
    Ok(parse_reference_list(&text))
}

/// Primary output first, then its references without duplicates.
pub fn library_paths(primary: &Path, references: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = vec![primary.to_path_buf()];
    for reference in references {
        if !paths.contains(reference) {
            paths.push(reference.clone());
        }
    }
    paths
}
