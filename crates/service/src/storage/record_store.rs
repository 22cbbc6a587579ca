use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

use crate::errors::ServiceError;
use crate::observability::{STORE_READ_FALLBACK_TOTAL, STORE_RECORDS_RETAINED_TOTAL};

/// The collections persisted by the store, one file each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Users,
    Orders,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Users, RecordKind::Orders];

    pub fn file_name(self) -> &'static str {
        match self {
            RecordKind::Users => "users.json",
            RecordKind::Orders => "orders.json",
        }
    }
}

/// Binds a record type to the collection it is stored in.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const KIND: RecordKind;
}

impl Record for models::User {
    const KIND: RecordKind = RecordKind::Users;
}

impl Record for models::Order {
    const KIND: RecordKind = RecordKind::Orders;
}

/// A collection as loaded from disk. Entries that do not decode as `T` are not
/// returned in `records`; they stay at their original positions and
/// [`RecordStore::save`] writes them back unchanged.
#[derive(Clone, Debug)]
pub struct Collection<T> {
    pub records: Vec<T>,
    retained: Vec<(usize, Value)>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { records: Vec::new(), retained: Vec::new() }
    }
}

impl<T> Collection<T> {
    /// Number of entries kept as raw JSON.
    pub fn retained(&self) -> usize {
        self.retained.len()
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Slot<'a, T> {
    Record(&'a T),
    Raw(&'a Value),
}

/// Write `[]` to `path` unless something is already there. A failed existence
/// check is an error, never a reason to overwrite.
async fn init_collection(path: &Path) -> Result<(), ServiceError> {
    let exists = fs::try_exists(path)
        .await
        .map_err(|e| ServiceError::Storage(format!("stat {}: {e}", path.display())))?;
    if exists {
        return Ok(());
    }
    fs::write(path, b"[]")
        .await
        .map_err(|e| ServiceError::Storage(format!("init {}: {e}", path.display())))?;
    debug!(path = %path.display(), "initialized empty collection");
    Ok(())
}

/// File-backed record store: `<data_dir>/users.json` and `<data_dir>/orders.json`,
/// each holding a JSON array. Reads load the whole array, writes replace it.
#[derive(Clone, Debug)]
pub struct RecordStore {
    data_dir: PathBuf,
}

impl RecordStore {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self { data_dir: data_dir.into() }
    }

    /// Build the store and run [`RecordStore::ensure`].
    pub async fn open<P: Into<PathBuf>>(data_dir: P) -> Result<Self, ServiceError> {
        let store = Self::new(data_dir);
        store.ensure().await?;
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, kind: RecordKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    /// Create the data directory and any missing collection file as `[]`.
    /// Existing files are never touched.
    pub async fn ensure(&self) -> Result<(), ServiceError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| ServiceError::Storage(format!("create {}: {e}", self.data_dir.display())))?;
        for kind in RecordKind::ALL {
            init_collection(&self.path_for(kind)).await?;
        }
        Ok(())
    }

    /// The whole collection for `T`. Missing, unreadable or corrupt files read as empty.
    pub async fn read_all<T: Record>(&self) -> Vec<T> {
        self.load::<T>().await.records
    }

    /// Load the collection for a read-modify-write cycle; pair with [`RecordStore::save`].
    pub async fn load<T: Record>(&self) -> Collection<T> {
        let path = self.path_for(T::KIND);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                STORE_READ_FALLBACK_TOTAL.inc();
                warn!(path = %path.display(), error = %e, "collection unreadable, treating as empty");
                return Collection::default();
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Collection::default();
        }
        let entries: Vec<Value> = match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                STORE_READ_FALLBACK_TOTAL.inc();
                warn!(path = %path.display(), error = %e, "collection corrupt, treating as empty");
                return Collection::default();
            }
        };

        let mut collection = Collection::default();
        for (index, entry) in entries.into_iter().enumerate() {
            match T::deserialize(&entry) {
                Ok(record) => collection.records.push(record),
                Err(e) => {
                    STORE_RECORDS_RETAINED_TOTAL.inc();
                    warn!(path = %path.display(), index, error = %e, "record has unexpected shape, keeping it as is");
                    collection.retained.push((index, entry));
                }
            }
        }
        collection
    }

    /// Write `collection` back: its records, with retained entries at their original
    /// positions. Records only ever change in place or get appended between load and save.
    pub async fn save<T: Record>(&self, collection: &Collection<T>) -> Result<(), ServiceError> {
        let mut slots = Vec::with_capacity(collection.records.len() + collection.retained.len());
        let mut records = collection.records.iter();
        let mut retained = collection.retained.iter().peekable();
        loop {
            if let Some((_, raw)) = retained.next_if(|(index, _)| *index <= slots.len()) {
                slots.push(Slot::Raw(raw));
                continue;
            }
            match records.next() {
                Some(record) => slots.push(Slot::Record(record)),
                None => break,
            }
        }
        slots.extend(retained.map(|(_, raw)| Slot::Raw(raw)));
        self.write_json(T::KIND, &slots).await
    }

    /// Replace the collection for `T` with `records`, pretty-printed.
    pub async fn write_all<T: Record>(&self, records: &[T]) -> Result<(), ServiceError> {
        self.write_json(T::KIND, records).await
    }

    async fn write_json<S: Serialize + ?Sized>(&self, kind: RecordKind, value: &S) -> Result<(), ServiceError> {
        let path = self.path_for(kind);
        let data = serde_json::to_vec_pretty(value)
            .map_err(|e| ServiceError::Storage(format!("serialize {}: {e}", path.display())))?;
        fs::write(&path, data)
            .await
            .map_err(|e| ServiceError::Storage(format!("write {}: {e}", path.display())))?;
        Ok(())
    }
}
