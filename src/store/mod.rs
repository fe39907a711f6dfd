// Document store access: the write contract and its backends

pub mod auth;
pub mod firestore;
pub mod memory;
pub mod value;

use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};

use crate::error::SeedError;

pub use value::{Document, FieldValue, GeoPoint};

/// Length of store-generated document identifiers
pub const AUTO_ID_LEN: usize = 20;

/// Write operations the seeder needs from a document store.
///
/// Each call is committed on its own; there is no batching across calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create or overwrite the document at `collection/id`
    async fn set(&self, collection: &str, id: &str, doc: &Document) -> Result<(), SeedError>;

    /// Insert a new document under a store-generated identifier and return it
    async fn add(&self, collection: &str, doc: &Document) -> Result<String, SeedError>;
}

// Same shape as the identifiers Firestore client libraries generate
pub fn auto_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(AUTO_ID_LEN)
        .map(char::from)
        .collect()
}
