//! Persistent id -> detail cache and the cache-first loader in front of the
//! network client.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use crate::api::DetailSource;
use crate::error::{FetchError, PersistenceError};
use crate::state::PokemonDetail;

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError>;
    async fn save(&self, key: &str, bytes: &[u8]) -> Result<(), PersistenceError>;
    async fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// One JSON file per key under `root`.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

#[async_trait]
impl BlobStore for FileStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        match fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, key: &str, bytes: &[u8]) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.root).await?;
        let path = self.path_for(key);
        let tmp = self.root.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory view of the persisted blob. At most one entry per id, and an
/// entry is only ever a whole detail.
pub struct DetailCache<B> {
    store: B,
    namespace: String,
    entries: BTreeMap<u16, PokemonDetail>,
}

impl<B: BlobStore> DetailCache<B> {
    /// Loads the blob for `namespace`. Missing, unreadable or corrupt blobs
    /// start an empty cache.
    pub async fn open(store: B, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let entries = match store.load(&namespace).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(namespace = %namespace, error = %err, "cache blob unreadable; starting empty");
                    BTreeMap::new()
                }
            },
            Ok(None) => BTreeMap::new(),
            Err(err) => {
                tracing::warn!(namespace = %namespace, error = %err, "cache blob load failed; starting empty");
                BTreeMap::new()
            }
        };
        tracing::debug!(namespace = %namespace, entries = entries.len(), "detail cache opened");
        Self {
            store,
            namespace,
            entries,
        }
    }

    pub fn get(&self, id: u16) -> Option<&PokemonDetail> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records `detail` in memory and writes the whole blob. The in-memory
    /// entry survives a failed write.
    pub async fn put(&mut self, id: u16, detail: PokemonDetail) -> Result<(), PersistenceError> {
        self.entries.insert(id, detail);
        self.flush().await
    }

    /// Drops the blob, then the in-memory entries. A failed removal leaves
    /// both untouched.
    pub async fn clear(&mut self) -> Result<(), PersistenceError> {
        self.store.remove(&self.namespace).await?;
        self.entries.clear();
        Ok(())
    }

    async fn flush(&self) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec(&self.entries)
            .map_err(|err| PersistenceError::Encode(err.to_string()))?;
        self.store.save(&self.namespace, &bytes).await
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Network,
}

#[derive(Debug)]
pub struct Loaded {
    pub detail: PokemonDetail,
    pub origin: Origin,
    /// Set when the detail could not be persisted; the detail is still good.
    pub persist_error: Option<PersistenceError>,
}

/// Cache-first detail loading. The cache lock is never held across the
/// network request.
pub struct DetailLoader<S, B> {
    source: S,
    cache: Mutex<DetailCache<B>>,
}

impl<S: DetailSource, B: BlobStore> DetailLoader<S, B> {
    pub fn new(source: S, cache: DetailCache<B>) -> Self {
        Self {
            source,
            cache: Mutex::new(cache),
        }
    }

    pub async fn load(&self, id: u16) -> Result<Loaded, FetchError> {
        if let Some(detail) = self.cache.lock().await.get(id).cloned() {
            tracing::debug!(id, "detail cache hit");
            return Ok(Loaded {
                detail,
                origin: Origin::Cache,
                persist_error: None,
            });
        }

        let detail = self.source.fetch_detail(id).await?;
        let persist_error = match self.cache.lock().await.put(id, detail.clone()).await {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(id, error = %err, "detail not persisted");
                Some(err)
            }
        };
        Ok(Loaded {
            detail,
            origin: Origin::Network,
            persist_error,
        })
    }

    pub async fn clear(&self) -> Result<(), PersistenceError> {
        self.cache.lock().await.clear().await
    }

    pub async fn cached_len(&self) -> usize {
        self.cache.lock().await.len()
    }
}
