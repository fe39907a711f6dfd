// In-memory document store for dry runs and tests

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{auto_id, Document, DocumentStore};
use crate::error::SeedError;

/// A write as it was applied, in order
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    pub collection: String,
    pub id: String,
    pub generated: bool,
}

#[derive(Default)]
struct Inner {
    collections: BTreeMap<String, BTreeMap<String, Document>>,
    log: Vec<WriteRecord>,
}

/// Keeps every collection in process memory. Server timestamps resolve to
/// the wall clock at write time.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, collection: &str, id: &str) -> Option<Document> {
        let inner = self.inner.lock().ok()?;
        inner.collections.get(collection)?.get(id).cloned()
    }

    /// Number of documents currently held in `collection`
    pub fn count(&self, collection: &str) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.collections.get(collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    pub fn write_log(&self) -> Vec<WriteRecord> {
        self.inner
            .lock()
            .map(|inner| inner.log.clone())
            .unwrap_or_default()
    }

    fn store(&self, collection: &str, id: &str, doc: &Document, generated: bool) -> Result<(), SeedError> {
        let mut inner = self.inner.lock().map_err(|_| SeedError::Write {
            collection: collection.to_string(),
            detail: "in-memory store lock poisoned".to_string(),
        })?;

        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc.resolve_server_timestamps(Utc::now()));
        inner.log.push(WriteRecord {
            collection: collection.to_string(),
            id: id.to_string(),
            generated,
        });
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn set(&self, collection: &str, id: &str, doc: &Document) -> Result<(), SeedError> {
        self.store(collection, id, doc, false)
    }

    async fn add(&self, collection: &str, doc: &Document) -> Result<String, SeedError> {
        let id = auto_id();
        self.store(collection, &id, doc, true)?;
        Ok(id)
    }
}
