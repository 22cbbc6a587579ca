use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use common::storage::json_map_store::JsonMapStore;
use configs::ClientConfig;
use tokio::sync::RwLock;

use crate::errors::ClientError;

/// String key-value storage for the local tier, shaped like browser `localStorage`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Option<String>;
    async fn set_item(&self, key: &str, value: String) -> Result<(), ClientError>;
}

/// Process-local store; contents are lost on drop.
#[derive(Default)]
pub struct MemoryKvStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get_item(&self, key: &str) -> Option<String> {
        self.inner.read().await.get(key).cloned()
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), ClientError> {
        self.inner.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// Durable store: one JSON object file mapping keys to string values.
#[derive(Clone)]
pub struct FileKvStore {
    store: Arc<JsonMapStore<String, String>>,
}

impl FileKvStore {
    /// Open or create the backing file.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ClientError> {
        let store = JsonMapStore::<String, String>::new(path).await?;
        Ok(Self { store })
    }

    /// Open the store at `local_store_path`.
    pub async fn from_config(cfg: &ClientConfig) -> Result<Self, ClientError> {
        Self::open(&cfg.local_store_path).await
    }
}

#[async_trait]
impl KeyValueStore for FileKvStore {
    async fn get_item(&self, key: &str) -> Option<String> {
        self.store.get(&key.to_string()).await
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), ClientError> {
        self.store.insert(key.to_string(), value).await?;
        Ok(())
    }
}
