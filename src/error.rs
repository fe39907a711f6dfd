// Error handling for farm-seed

use std::path::PathBuf;
use thiserror::Error;

/// Seeder error type
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(
        "Missing {}. Download from Firebase Console -> Project Settings -> Service accounts -> Generate new private key",
        .path.display()
    )]
    MissingCredential { path: PathBuf },

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid seed scenario: {0}")]
    Scenario(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Write to '{collection}' failed: {detail}")]
    Write { collection: String, detail: String },
}

impl SeedError {
    /// True for failures detected before any network activity
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SeedError::MissingCredential { .. } | SeedError::Scenario(_)
        )
    }
}

// Extension trait for store result handling
pub trait StoreResultExt<T> {
    /// Convert transport errors to SeedError::Write tagged with the target collection
    fn write_err(self, collection: &str) -> Result<T, SeedError>;
}

impl<T, E: std::fmt::Display> StoreResultExt<T> for Result<T, E> {
    fn write_err(self, collection: &str) -> Result<T, SeedError> {
        self.map_err(|e| SeedError::Write {
            collection: collection.to_string(),
            detail: e.to_string(),
        })
    }
}
