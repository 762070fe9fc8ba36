//! Best-effort translation cache.
//!
//! Backed by a fallible key-value store. Read and write failures, corrupt
//! JSON, and bundles of the wrong length are all treated as a miss; nothing
//! in this module returns an error to the caller.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

use crate::model::{Language, TranslationBundle};

const KEY_PREFIX: &str = "prakriti_trans_";

/// A scoped string key-value store. Implementations may fail on any call.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

/// In-process store, used when no cache directory is available and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Translation bundles keyed by language, one entry per language.
#[derive(Clone)]
pub struct TranslationCache {
    store: Arc<dyn KeyValueStore>,
    expected_len: usize,
}

impl TranslationCache {
    /// `expected_len` is the question count a cached bundle must match.
    pub fn new(store: Arc<dyn KeyValueStore>, expected_len: usize) -> Self {
        Self {
            store,
            expected_len,
        }
    }

    /// A cache that lives only as long as the process.
    pub fn in_memory(expected_len: usize) -> Self {
        Self::new(Arc::new(MemoryStore::new()), expected_len)
    }

    pub fn key_for(language: &Language) -> String {
        format!("{KEY_PREFIX}{}", language.slug())
    }

    /// Look up a bundle. Any failure or mismatch is a miss.
    pub fn get(&self, language: &Language) -> Option<TranslationBundle> {
        match self.try_get(language) {
            Ok(Some(bundle)) => {
                tracing::debug!(%language, "translation cache hit");
                Some(bundle)
            }
            Ok(None) => {
                tracing::debug!(%language, "translation cache miss");
                None
            }
            Err(e) => {
                tracing::debug!(%language, error = %format!("{e:#}"), "discarding unusable cache entry");
                None
            }
        }
    }

    fn try_get(&self, language: &Language) -> Result<Option<TranslationBundle>> {
        let Some(raw) = self.store.get(&Self::key_for(language))? else {
            return Ok(None);
        };
        let bundle: TranslationBundle =
            serde_json::from_str(&raw).context("cached translation is not valid JSON")?;
        if bundle.len() != self.expected_len {
            anyhow::bail!(
                "cached translation has {} questions, expected {}",
                bundle.len(),
                self.expected_len
            );
        }
        Ok(Some(bundle))
    }

    /// Store a bundle, overwriting any previous entry. Failures are logged.
    pub fn put(&self, language: &Language, bundle: &TranslationBundle) {
        let result = serde_json::to_string(bundle)
            .context("failed to serialize translation")
            .and_then(|json| self.store.set(&Self::key_for(language), &json));
        if let Err(e) = result {
            tracing::warn!(%language, error = %format!("{e:#}"), "failed to cache translation locally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionSet, TranslatedOption, TranslatedQuestion};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _: &str) -> Result<Option<String>> {
            anyhow::bail!("storage disabled")
        }
        fn set(&self, _: &str, _: &str) -> Result<()> {
            anyhow::bail!("quota exceeded")
        }
    }

    fn hindi_bundle(len: usize) -> TranslationBundle {
        TranslationBundle(
            (0..len)
                .map(|i| TranslatedQuestion {
                    text: format!("प्रश्न {i}"),
                    options: vec![
                        TranslatedOption {
                            label: "A".into(),
                            text: "क".into(),
                        },
                        TranslatedOption {
                            label: "B".into(),
                            text: "ख".into(),
                        },
                        TranslatedOption {
                            label: "C".into(),
                            text: "ग".into(),
                        },
                    ],
                })
                .collect(),
        )
    }

    #[test]
    fn round_trip_in_memory() {
        let cache = TranslationCache::in_memory(25);
        let bundle = hindi_bundle(25);
        cache.put(&Language::hindi(), &bundle);
        assert_eq!(cache.get(&Language::hindi()), Some(bundle));
        assert_eq!(cache.get(&Language::new("Tamil")), None);
    }

    #[test]
    fn round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::new(dir.path().join("cache")));
        let cache = TranslationCache::new(store.clone(), 25);

        let bundle = hindi_bundle(25);
        cache.put(&Language::hindi(), &bundle);
        assert!(dir.path().join("cache/prakriti_trans_hindi.json").exists());

        let reopened = TranslationCache::new(store, 25);
        assert_eq!(reopened.get(&Language::hindi()), Some(bundle));
    }

    #[test]
    fn put_overwrites_previous_entry() {
        let cache = TranslationCache::in_memory(2);
        cache.put(&Language::hindi(), &hindi_bundle(2));
        let mut updated = hindi_bundle(2);
        updated.0[0].text = "नया".into();
        cache.put(&Language::hindi(), &updated);
        assert_eq!(cache.get(&Language::hindi()), Some(updated));
    }

    #[test]
    fn corrupt_entry_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        store.set("prakriti_trans_hindi", "{not json").unwrap();
        let cache = TranslationCache::new(store, 25);
        assert_eq!(cache.get(&Language::hindi()), None);
    }

    #[test]
    fn wrong_length_is_a_miss() {
        let cache = TranslationCache::in_memory(QuestionSet::standard().len());
        cache.put(&Language::hindi(), &hindi_bundle(24));
        assert_eq!(cache.get(&Language::hindi()), None);
    }

    #[test]
    fn store_failures_are_swallowed() {
        let cache = TranslationCache::new(Arc::new(BrokenStore), 25);
        cache.put(&Language::hindi(), &hindi_bundle(25));
        assert_eq!(cache.get(&Language::hindi()), None);
    }

    #[test]
    fn keys_are_per_language() {
        assert_eq!(
            TranslationCache::key_for(&Language::hindi()),
            "prakriti_trans_hindi"
        );
        assert_eq!(
            TranslationCache::key_for(&Language::new("Hindi")),
            TranslationCache::key_for(&Language::new("hindi"))
        );
    }
}
