use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::SeedError;

pub const DEFAULT_CREDENTIALS_FILE: &str = "./serviceAccountKey.json";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Service account key as downloaded from the Firebase console
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Fails with `MissingCredential` unless a file exists at `path`.
/// Touches nothing but the local filesystem.
pub fn require_credential_file(path: &Path) -> Result<PathBuf, SeedError> {
    if !path.is_file() {
        return Err(SeedError::MissingCredential {
            path: path.to_path_buf(),
        });
    }
    Ok(path.to_path_buf())
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SeedError::InvalidCredential(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, SeedError> {
        let key: ServiceAccountKey = serde_json::from_str(contents)
            .map_err(|e| SeedError::InvalidCredential(e.to_string()))?;

        if key.key_type != "service_account" {
            return Err(SeedError::InvalidCredential(format!(
                "expected type \"service_account\", found \"{}\"",
                key.key_type
            )));
        }
        if key.project_id.trim().is_empty() {
            return Err(SeedError::InvalidCredential("project_id is empty".to_string()));
        }
        if key.client_email.trim().is_empty() {
            return Err(SeedError::InvalidCredential("client_email is empty".to_string()));
        }

        Ok(key)
    }
}
