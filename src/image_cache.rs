//! Preview cache for fast paging between parts and variants.
//!
//! Keeps decoded thumbnails under an LRU policy, keyed by file path.
//! Entries for files that a move took away are evicted explicitly.

use crate::image_loader::PreviewImage;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// LRU cache for storing decoded previews.
pub struct ImageCache {
    cache: LruCache<PathBuf, PreviewImage>,
}

impl ImageCache {
    /// Creates a new cache; a zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    pub fn get(&mut self, path: &Path) -> Option<PreviewImage> {
        let result = self.cache.get(path).cloned();
        if result.is_some() {
            log::debug!("Cache HIT: {}", path.display());
        } else {
            log::debug!("Cache MISS: {}", path.display());
        }
        result
    }

    pub fn put(&mut self, path: PathBuf, preview: PreviewImage) {
        log::debug!(
            "Cache PUT: {} ({}x{})",
            path.display(),
            preview.width,
            preview.height
        );
        self.cache.put(path, preview);
    }

    /// Drops the entry for a path that no longer holds the same file.
    pub fn evict(&mut self, path: &Path) {
        self.cache.pop(path);
    }

    /// Forgets everything, e.g. after a rescan or a settings change.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
