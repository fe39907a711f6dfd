// Firestore REST client

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use super::auth::ServiceAccountAuth;
use super::{auto_id, Document, DocumentStore};
use crate::error::{SeedError, StoreResultExt};

pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1/";

// The emulator accepts this token as an admin credential
const EMULATOR_BEARER: &str = "owner";

/// One authenticated session against a single Firestore database
pub struct FirestoreClient {
    http: reqwest::Client,
    base_url: Url,
    database_path: String,
    bearer: Option<String>,
}

impl FirestoreClient {
    pub fn new(base_url: &str, project: &str, database: &str) -> Result<Self, SeedError> {
        // Url::join drops the last segment unless the base ends in '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| SeedError::Config(format!("store endpoint '{}': {}", normalized, e)))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            database_path: format!("projects/{}/databases/{}", project, database),
            bearer: None,
        })
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Session against the production endpoint, authorized by the service account
    pub async fn authenticated(
        auth: &ServiceAccountAuth,
        project: &str,
        database: &str,
    ) -> Result<Self, SeedError> {
        Self::authenticated_at(FIRESTORE_BASE_URL, auth, project, database).await
    }

    pub async fn authenticated_at(
        base_url: &str,
        auth: &ServiceAccountAuth,
        project: &str,
        database: &str,
    ) -> Result<Self, SeedError> {
        let client = Self::new(base_url, project, database)?;
        let token = auth.fetch_token(&client.http).await?;
        info!(
            "Authenticated as {} (token valid until {})",
            auth.key().client_email,
            token.expires_at
        );
        Ok(client.with_bearer(token.token))
    }

    /// Session against a local emulator at `host` (host:port), no OAuth exchange
    pub fn emulator(host: &str, project: &str, database: &str) -> Result<Self, SeedError> {
        info!("Using Firestore emulator at {}", host);
        Ok(Self::new(&format!("http://{}/v1/", host), project, database)?.with_bearer(EMULATOR_BEARER))
    }

    pub fn database_path(&self) -> &str {
        &self.database_path
    }

    /// Full resource name of `collection/id`
    pub fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/documents/{}/{}", self.database_path, collection, id)
    }

    fn commit_url(&self) -> Result<Url, url::ParseError> {
        self.base_url
            .join(&format!("{}/documents:commit", self.database_path))
    }

    /// Request body for a single-write commit
    pub fn commit_body(&self, collection: &str, id: &str, doc: &Document, must_not_exist: bool) -> Value {
        let mut write = json!({
            "update": {
                "name": self.document_name(collection, id),
                "fields": doc.to_wire_fields(),
            }
        });

        let transforms: Vec<Value> = doc
            .server_timestamp_paths()
            .into_iter()
            .map(|path| json!({ "fieldPath": path, "setToServerValue": "REQUEST_TIME" }))
            .collect();
        if !transforms.is_empty() {
            write["updateTransforms"] = Value::Array(transforms);
        }
        if must_not_exist {
            write["currentDocument"] = json!({ "exists": false });
        }

        json!({ "writes": [write] })
    }

    // The commit API has no transform for a sentinel inside an array
    fn check_encodable(collection: &str, doc: &Document) -> Result<(), SeedError> {
        match doc.array_timestamp_path() {
            Some(path) => Err(SeedError::Write {
                collection: collection.to_string(),
                detail: format!("server timestamp inside array field '{}' cannot be written", path),
            }),
            None => Ok(()),
        }
    }

    async fn commit(&self, collection: &str, body: &Value) -> Result<(), SeedError> {
        let url = self.commit_url().write_err(collection)?;
        debug!("POST {}", url);

        let mut request = self.http.post(url).json(body);
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.write_err(collection)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SeedError::Write {
                collection: collection.to_string(),
                detail: format!("{}: {}", status, body.trim()),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn set(&self, collection: &str, id: &str, doc: &Document) -> Result<(), SeedError> {
        Self::check_encodable(collection, doc)?;
        let body = self.commit_body(collection, id, doc, false);
        self.commit(collection, &body).await
    }

    async fn add(&self, collection: &str, doc: &Document) -> Result<String, SeedError> {
        Self::check_encodable(collection, doc)?;
        // Ids are generated client-side; the precondition makes a collision fail instead of overwrite
        let id = auto_id();
        let body = self.commit_body(collection, &id, doc, true);
        self.commit(collection, &body).await?;
        Ok(id)
    }
}
