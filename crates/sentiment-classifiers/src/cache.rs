//! Disk-backed memoization of the vectorization stage.
//!
//! Entries are keyed on the vectorizer configuration plus the exact input
//! texts and hold the learned vocabulary with the transformed counts. Nothing
//! is ever evicted: entries written by older code stay valid until `clear` or
//! `invalidate` is called. The directory is not locked, so concurrent runs
//! sharing it may race.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::VectorizerConfig;
use crate::error::{PipelineError, Result};
use crate::math::CountMatrix;
use crate::preprocessing::{CountVectorizer, Vocabulary};

/// Bumped whenever the on-disk entry layout changes.
const CACHE_FORMAT_VERSION: u32 = 1;
const ENTRY_SUBDIR: &str = "vectorization";

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    version: u32,
    created_at: DateTime<Utc>,
    vectorizer: VectorizerConfig,
    vocabulary: Vocabulary,
    n_features: usize,
    rows: Vec<Vec<(usize, f64)>>,
}

/// Handle on a cache directory. Opening creates the directory; dropping the
/// handle leaves the entries in place.
#[derive(Debug)]
pub struct VectorizerCache {
    dir: PathBuf,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl VectorizerCache {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let entries = dir.join(ENTRY_SUBDIR);
        fs::create_dir_all(&entries).map_err(|e| PipelineError::io(&entries, e))?;
        log::debug!("Using vectorization cache at {}", dir.display());
        Ok(Self {
            dir,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Hex SHA-256 over the format version, the vectorizer configuration and
    /// the length-prefixed input texts.
    pub fn key(config: &VectorizerConfig, docs: &[String]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(CACHE_FORMAT_VERSION.to_le_bytes());
        hasher.update(serde_json::to_vec(config).unwrap_or_default());
        hasher.update((docs.len() as u64).to_le_bytes());
        for doc in docs {
            hasher.update((doc.len() as u64).to_le_bytes());
            hasher.update(doc.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(ENTRY_SUBDIR).join(format!("{}.json", key))
    }

    /// Cached vocabulary and counts for `key`, if present and readable.
    pub fn load(&self, key: &str) -> Option<(Vocabulary, CountMatrix)> {
        let path = self.entry_path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("Failed to read cache entry {}: {}", path.display(), e);
                return None;
            }
        };
        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Ignoring unreadable cache entry {}: {}", path.display(), e);
                return None;
            }
        };
        if entry.version != CACHE_FORMAT_VERSION {
            return None;
        }
        if entry.vocabulary.len() != entry.n_features {
            log::warn!(
                "Ignoring inconsistent cache entry {}: {} vocabulary terms but {} features",
                path.display(),
                entry.vocabulary.len(),
                entry.n_features
            );
            return None;
        }
        let matrix = match CountMatrix::try_from_rows(&entry.rows, entry.n_features) {
            Ok(matrix) => matrix,
            Err(e) => {
                log::warn!("Ignoring inconsistent cache entry {}: {}", path.display(), e);
                return None;
            }
        };
        Some((entry.vocabulary.reindex(), matrix))
    }

    /// Persist a fitted vectorizer and its output. Failures are logged, not raised.
    pub fn store(&self, key: &str, vectorizer: &CountVectorizer, matrix: &CountMatrix) {
        let Some(vocabulary) = vectorizer.vocabulary() else {
            log::warn!("Refusing to cache an unfitted vectorizer");
            return;
        };
        let entry = CacheEntry {
            version: CACHE_FORMAT_VERSION,
            created_at: Utc::now(),
            vectorizer: vectorizer.config().clone(),
            vocabulary: vocabulary.clone(),
            n_features: matrix.ncols(),
            rows: matrix.row_entries(),
        };
        let path = self.entry_path(key);
        let written = serde_json::to_vec(&entry)
            .map_err(|e| e.to_string())
            .and_then(|bytes| fs::write(&path, bytes).map_err(|e| e.to_string()));
        if let Err(e) = written {
            log::warn!("Failed to write cache entry {}: {}", path.display(), e);
        }
    }

    /// `vectorizer.fit_transform(docs)`, served from the cache when possible.
    pub fn fit_transform(
        &self,
        vectorizer: &mut CountVectorizer,
        docs: &[String],
    ) -> Result<CountMatrix> {
        let key = Self::key(vectorizer.config(), docs);
        if let Some((vocabulary, matrix)) = self.load(&key) {
            log::trace!("Vectorization cache hit {}", key);
            self.hits.fetch_add(1, Ordering::Relaxed);
            *vectorizer = CountVectorizer::from_vocabulary(vectorizer.config().clone(), vocabulary)?;
            return Ok(matrix);
        }

        log::trace!("Vectorization cache miss {}", key);
        self.misses.fetch_add(1, Ordering::Relaxed);
        let matrix = vectorizer.fit_transform(docs)?;
        self.store(&key, vectorizer, &matrix);
        Ok(matrix)
    }

    /// Remove one entry. Returns whether it existed.
    pub fn invalidate(&self, key: &str) -> Result<bool> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PipelineError::io(path, e)),
        }
    }

    /// Remove every entry. Returns how many were deleted.
    pub fn clear(&self) -> Result<usize> {
        let entries = self.dir.join(ENTRY_SUBDIR);
        let read = fs::read_dir(&entries).map_err(|e| PipelineError::io(&entries, e))?;
        let mut removed = 0;
        for item in read {
            let item = item.map_err(|e| PipelineError::io(&entries, e))?;
            let path = item.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                fs::remove_file(&path).map_err(|e| PipelineError::io(&path, e))?;
                removed += 1;
            }
        }
        log::info!("Removed {} cache entries from {}", removed, entries.display());
        Ok(removed)
    }

    /// Number of entries currently on disk.
    pub fn len(&self) -> usize {
        fs::read_dir(self.dir.join(ENTRY_SUBDIR))
            .map(|read| {
                read.filter_map(|item| item.ok())
                    .filter(|item| item.path().extension().and_then(|s| s.to_str()) == Some("json"))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
