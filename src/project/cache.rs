//! Metadata cache keyed by the ordered list of library paths.
//!
//! Readers get an `Arc<Metadata>` and may keep using it after the entry is
//! invalidated; a rebuild replaces the entry wholesale. Cached graphs hold no
//! provider handles, so eviction only drops the cache's reference.

use super::loader::load_metadata;
use crate::assembly::{AssemblyError, AssemblyProvider};
use crate::metadata::{ConverterOptions, Metadata};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct MetadataCache {
    provider: Arc<dyn AssemblyProvider>,
    options: ConverterOptions,
    entries: RwLock<FxHashMap<Vec<PathBuf>, Arc<Metadata>>>,
}

impl MetadataCache {
    pub fn new(provider: Arc<dyn AssemblyProvider>) -> Self {
        Self::with_options(provider, ConverterOptions::default())
    }

    pub fn with_options(provider: Arc<dyn AssemblyProvider>, options: ConverterOptions) -> Self {
        Self {
            provider,
            options,
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn get(&self, paths: &[PathBuf]) -> Option<Arc<Metadata>> {
        self.entries.read().get(paths).cloned()
    }

    /// Cached graph for `paths`, converting on a miss.
    ///
    /// The conversion runs without holding the lock. When two callers race
    /// on the same key the first stored graph wins. `Ok(None)` means the
    /// load was cancelled and nothing was cached.
    pub fn get_or_load(
        &self,
        paths: &[PathBuf],
        cancel: &CancellationToken,
    ) -> Result<Option<Arc<Metadata>>, AssemblyError> {
        if let Some(metadata) = self.get(paths) {
            return Ok(Some(metadata));
        }

        let Some(metadata) = load_metadata(self.provider.as_ref(), paths, &self.options, cancel)?
        else {
            return Ok(None);
        };

        let mut entries = self.entries.write();
        let stored = entries
            .entry(paths.to_vec())
            .or_insert_with(|| Arc::new(metadata));
        Ok(Some(stored.clone()))
    }

    /// Drop the entry for `paths`. Returns whether one existed.
    pub fn invalidate(&self, paths: &[PathBuf]) -> bool {
        self.entries.write().remove(paths).is_some()
    }

    /// Drop every entry built from `path`, e.g. after that output was rebuilt.
    pub fn invalidate_containing(&self, path: &Path) -> usize {
        let mut entries = self.entries.write();
        let keys: Vec<Vec<PathBuf>> = entries
            .keys()
            .filter(|key| key.iter().any(|p| p == path))
            .cloned()
            .collect();
        for key in &keys {
            entries.remove(key);
        }
        tracing::debug!(path = %path.display(), invalidated = keys.len(), "Invalidated metadata");
        keys.len()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
