//! TTL-based stat cache.
//!
//! [`FileStatCache`] stores the [`FileKind`] of every probed path in a
//! `HashMap` behind a `RwLock`. Entries older than the configured TTL are
//! probed again. Directory listings are never cached.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::traits::{FileKind, FileStatOracle};

/// Configuration for [`FileStatCache`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatCacheConfig {
    /// How long a probed result stays valid, in milliseconds. `0` disables
    /// caching.
    pub ttl_ms: u64,
    /// Upper bound on cached paths before the cache is pruned.
    pub max_entries: usize,
}

impl Default for StatCacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 1_000,
            max_entries: 10_000,
        }
    }
}

impl StatCacheConfig {
    /// The configured TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

#[derive(Clone, Copy, Debug)]
struct CachedStat {
    kind: FileKind,
    checked_at: Instant,
}

/// A [`FileStatOracle`] that caches stat results for a fixed TTL.
#[derive(Debug)]
pub struct FileStatCache {
    ttl: Duration,
    max_entries: usize,
    entries: RwLock<HashMap<PathBuf, CachedStat>>,
}

impl FileStatCache {
    /// Create a cache from the given configuration.
    pub fn new(config: &StatCacheConfig) -> Self {
        Self {
            ttl: config.ttl(),
            max_entries: config.max_entries.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached paths, including expired ones not yet pruned.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget the cached result for one path.
    pub fn invalidate(&self, path: &Path) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path);
    }

    /// Forget every cached result.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn lookup(&self, path: &Path, now: Instant) -> Option<FileKind> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(path)
            .filter(|cached| now.duration_since(cached.checked_at) < self.ttl)
            .map(|cached| cached.kind)
    }

    fn store(&self, path: &Path, kind: FileKind, now: Instant) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.len() >= self.max_entries {
            let ttl = self.ttl;
            entries.retain(|_, cached| now.duration_since(cached.checked_at) < ttl);
            if entries.len() >= self.max_entries {
                debug!(entries = entries.len(), "stat cache full; clearing");
                entries.clear();
            }
        }
        entries.insert(
            path.to_path_buf(),
            CachedStat {
                kind,
                checked_at: now,
            },
        );
    }
}

impl Default for FileStatCache {
    fn default() -> Self {
        Self::new(&StatCacheConfig::default())
    }
}

impl FileStatOracle for FileStatCache {
    fn stat(&self, path: &Path) -> FileKind {
        if self.ttl.is_zero() {
            return FileKind::probe(path);
        }
        let now = Instant::now();
        if let Some(kind) = self.lookup(path, now) {
            return kind;
        }
        let kind = FileKind::probe(path);
        self.store(path, kind, now);
        kind
    }
}

/// A [`FileStatOracle`] that always asks the filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectFileStat;

impl FileStatOracle for DirectFileStat {
    fn stat(&self, path: &Path) -> FileKind {
        FileKind::probe(path)
    }
}
