// Common test utilities shared across test files

use async_trait::async_trait;
use farm_seed::error::SeedError;
use farm_seed::store::{memory::InMemoryStore, Document, DocumentStore};
use std::path::{Path, PathBuf};

pub const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/test_key.pem");

/// Service account key JSON pointing its token endpoint at `token_uri`
#[allow(dead_code)]
pub fn service_account_json(token_uri: &str) -> String {
    serde_json::json!({
        "type": "service_account",
        "project_id": "grape-master",
        "private_key_id": "test-kid",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": "seeder@grape-master.iam.gserviceaccount.com",
        "client_id": "1234567890",
        "token_uri": token_uri
    })
    .to_string()
}

/// Write a key file into `dir` and return its path
#[allow(dead_code)]
pub fn write_key_file(dir: &Path, token_uri: &str) -> PathBuf {
    let path = dir.join("serviceAccountKey.json");
    std::fs::write(&path, service_account_json(token_uri)).expect("Failed to write key file");
    path
}

/// In-memory store that rejects every write to one collection
#[allow(dead_code)]
pub struct RejectingStore {
    pub inner: InMemoryStore,
    pub reject: &'static str,
}

#[allow(dead_code)]
impl RejectingStore {
    pub fn new(reject: &'static str) -> Self {
        Self {
            inner: InMemoryStore::new(),
            reject,
        }
    }

    fn check(&self, collection: &str) -> Result<(), SeedError> {
        if collection == self.reject {
            return Err(SeedError::Write {
                collection: collection.to_string(),
                detail: "PERMISSION_DENIED: Missing or insufficient permissions.".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for RejectingStore {
    async fn set(&self, collection: &str, id: &str, doc: &Document) -> Result<(), SeedError> {
        self.check(collection)?;
        self.inner.set(collection, id, doc).await
    }

    async fn add(&self, collection: &str, doc: &Document) -> Result<String, SeedError> {
        self.check(collection)?;
        self.inner.add(collection, doc).await
    }
}
