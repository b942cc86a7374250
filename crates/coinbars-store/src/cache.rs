//! Durable dataset cache.

use coinbars_types::{Dataset, DatasetKey};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{CacheError, Result};

/// Durable cache of bar datasets.
///
/// Implementations must be safe to call from several query tasks at once;
/// callers serialize access per key through
/// [`DatasetRegistry`](crate::DatasetRegistry).
pub trait DatasetCache: Send + Sync {
    /// Reads the dataset stored under `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored dataset exists but cannot be read.
    fn fetch(&self, key: &DatasetKey) -> Result<Option<Dataset>>;

    /// Stores `dataset` under `key`.
    ///
    /// Without `overwrite` an existing entry is left untouched. Returns true
    /// if the dataset was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be written.
    fn store(&self, key: &DatasetKey, dataset: &Dataset, overwrite: bool) -> Result<bool>;

    /// Returns true if a dataset is stored under `key`.
    fn exists(&self, key: &DatasetKey) -> bool;
}

/// Dataset cache keeping one JSON file per dataset.
///
/// Datasets are stored as `<base>/datasets/<SYMBOL>-<interval>.json`.
#[derive(Debug, Clone)]
pub struct FileCache {
    /// Base directory for cached data.
    base_path: PathBuf,
    /// Directory for dataset files.
    datasets_path: PathBuf,
}

impl FileCache {
    /// Creates a file cache rooted at `base_path`.
    ///
    /// Creates the necessary subdirectories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn new(base_path: PathBuf) -> Result<Self> {
        let datasets_path = base_path.join("datasets");

        for path in [&base_path, &datasets_path] {
            if !path.exists() {
                fs::create_dir_all(path).map_err(|e| CacheError::CreateDir {
                    path: path.clone(),
                    source: e,
                })?;
            }
        }

        Ok(Self {
            base_path,
            datasets_path,
        })
    }

    /// Returns the default path for coinbars data.
    ///
    /// Uses the `directories` crate to find the appropriate location:
    /// - Linux: `~/.local/share/coinbars/`
    /// - macOS: `~/Library/Application Support/coinbars/`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\coinbars\`
    ///
    /// Falls back to `~/.coinbars/` if the platform-specific location
    /// cannot be determined.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "coinbars").map_or_else(dirs_fallback, |proj_dirs| {
            proj_dirs.data_dir().to_path_buf()
        })
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the path of the file holding `key`.
    #[must_use]
    pub fn dataset_path(&self, key: &DatasetKey) -> PathBuf {
        self.datasets_path.join(format!("{key}.json"))
    }
}

impl DatasetCache for FileCache {
    fn fetch(&self, key: &DatasetKey) -> Result<Option<Dataset>> {
        let path = self.dataset_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| CacheError::ReadFile {
            path: path.clone(),
            source: e,
        })?;

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| CacheError::ParseJson { path, source: e })
    }

    fn store(&self, key: &DatasetKey, dataset: &Dataset, overwrite: bool) -> Result<bool> {
        let path = self.dataset_path(key);
        if !overwrite && path.exists() {
            return Ok(false);
        }

        let json = serde_json::to_string(dataset)?;

        // Readers never see a half-written file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| CacheError::WriteFile {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &path).map_err(|e| CacheError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(%key, bars = dataset.len(), "dataset stored");
        Ok(true)
    }

    fn exists(&self, key: &DatasetKey) -> bool {
        self.dataset_path(key).exists()
    }
}

/// Fallback for determining home directory.
fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".coinbars")
}

/// Dataset cache held in memory.
#[derive(Debug, Default)]
pub struct MemoryCache {
    datasets: Mutex<HashMap<DatasetKey, Dataset>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.lock().map_or(0, |d| d.len())
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DatasetCache for MemoryCache {
    fn fetch(&self, key: &DatasetKey) -> Result<Option<Dataset>> {
        let datasets = self.datasets.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(datasets.get(key).cloned())
    }

    fn store(&self, key: &DatasetKey, dataset: &Dataset, overwrite: bool) -> Result<bool> {
        let mut datasets = self.datasets.lock().map_err(|_| CacheError::Poisoned)?;
        if !overwrite && datasets.contains_key(key) {
            return Ok(false);
        }
        datasets.insert(key.clone(), dataset.clone());
        Ok(true)
    }

    fn exists(&self, key: &DatasetKey) -> bool {
        self.datasets
            .lock()
            .is_ok_and(|datasets| datasets.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinbars_types::{Bar, Interval};
    use tempfile::TempDir;

    fn sample() -> Dataset {
        Dataset::from_bars(vec![
            Bar::new(0, 10.0, 12.0, 9.0, 11.0, 2.0),
            Bar::new(60_000, 11.0, 11.0, 8.0, 8.5, 1.5),
        ])
        .unwrap()
    }

    #[test]
    fn test_file_cache_creation() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileCache::new(temp_dir.path().to_path_buf()).unwrap();

        assert!(cache.base_path().exists());
        assert!(temp_dir.path().join("datasets").exists());
    }

    #[test]
    fn test_store_and_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileCache::new(temp_dir.path().to_path_buf()).unwrap();
        let key = DatasetKey::new("bitstampUSD", Interval::Minute1);

        assert!(!cache.exists(&key));
        assert!(cache.fetch(&key).unwrap().is_none());

        assert!(cache.store(&key, &sample(), true).unwrap());
        assert!(cache.exists(&key));
        assert_eq!(cache.fetch(&key).unwrap(), Some(sample()));
    }

    #[test]
    fn test_store_without_overwrite_keeps_existing() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileCache::new(temp_dir.path().to_path_buf()).unwrap();
        let key = DatasetKey::new("bitstampUSD", Interval::Daily);

        cache.store(&key, &sample(), true).unwrap();
        assert!(!cache.store(&key, &Dataset::new(), false).unwrap());
        assert_eq!(cache.fetch(&key).unwrap().unwrap().len(), 2);

        assert!(cache.store(&key, &Dataset::new(), true).unwrap());
        assert!(cache.fetch(&key).unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_dataset_path() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileCache::new(temp_dir.path().to_path_buf()).unwrap();

        let path = cache.dataset_path(&DatasetKey::new("mtgoxEUR", Interval::Monthly));
        assert!(path.to_string_lossy().contains("datasets"));
        assert!(path.to_string_lossy().ends_with("MTGOXEUR-1mo.json"));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileCache::new(temp_dir.path().to_path_buf()).unwrap();
        let key = DatasetKey::finest("bitstampUSD");

        fs::write(cache.dataset_path(&key), "not json").unwrap();
        assert!(matches!(
            cache.fetch(&key),
            Err(CacheError::ParseJson { .. })
        ));
    }

    #[test]
    fn test_memory_cache() {
        let cache = MemoryCache::new();
        let key = DatasetKey::finest("bitstampUSD");

        assert!(cache.is_empty());
        assert!(cache.store(&key, &sample(), false).unwrap());
        assert!(!cache.store(&key, &Dataset::new(), false).unwrap());
        assert!(cache.exists(&key));
        assert_eq!(cache.fetch(&key).unwrap(), Some(sample()));
        assert_eq!(cache.len(), 1);
    }
}
