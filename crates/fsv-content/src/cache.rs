//! Cache of parsed descriptor files.
//!
//! Parsing a descriptor is far more expensive than any other step of a
//! resolution, and the same descriptor is consulted for every node it
//! declares. [`ContentFileCache`] keeps the parsed root of each descriptor,
//! keyed by file path, and evicts the oldest insertion once `max_size` is
//! reached. Failed parses are cached too, as "no content".

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::element::ContentElement;
use crate::error::{ContentError, ContentResult};
use crate::parser::parse_jcr_xml;

/// Configuration for [`ContentFileCache`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentCacheConfig {
    /// Maximum number of cached descriptors; `0` means unbounded.
    pub max_size: usize,
}

impl Default for ContentCacheConfig {
    fn default() -> Self {
        Self { max_size: 1_000 }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<PathBuf, Option<Arc<ContentElement>>>,
    order: VecDeque<PathBuf>,
}

/// Thread-safe cache of parsed descriptors.
#[derive(Debug)]
pub struct ContentFileCache {
    max_size: usize,
    state: Mutex<CacheState>,
}

impl ContentFileCache {
    /// Create an empty cache.
    pub fn new(config: &ContentCacheConfig) -> Self {
        Self {
            max_size: config.max_size,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Read and parse a descriptor without touching the cache.
    pub fn load(file: &Path) -> ContentResult<ContentElement> {
        let xml = fs::read_to_string(file).map_err(|source| ContentError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        parse_jcr_xml(&xml)
    }

    /// The parsed root element of `file`, or `None` if it cannot be read or
    /// parsed.
    pub fn get(&self, file: &Path) -> Option<Arc<ContentElement>> {
        {
            let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = state.entries.get(file) {
                return entry.clone();
            }
        }

        let parsed = match Self::load(file) {
            Ok(root) => {
                debug!(file = %file.display(), children = root.child_count(), "parsed descriptor");
                Some(Arc::new(root))
            }
            Err(e) => {
                warn!(file = %file.display(), error = %e, "unable to parse descriptor");
                None
            }
        };

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.entries.contains_key(file) {
            if self.max_size > 0 && state.entries.len() >= self.max_size {
                if let Some(oldest) = state.order.pop_front() {
                    state.entries.remove(&oldest);
                }
            }
            state.order.push_back(file.to_path_buf());
        }
        state.entries.insert(file.to_path_buf(), parsed.clone());
        parsed
    }

    /// Drop the cached parse of one descriptor.
    pub fn remove(&self, file: &Path) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.entries.remove(file).is_some() {
            state.order.retain(|p| p != file);
        }
    }

    /// Drop every cached parse.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entries.clear();
        state.order.clear();
    }

    /// Number of cached descriptors (including failed parses).
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ContentFileCache {
    fn default() -> Self {
        Self::new(&ContentCacheConfig::default())
    }
}
