// Service account authentication against the OAuth2 token endpoint

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ServiceAccountKey;
use crate::error::SeedError;

pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

// Upper bound Google accepts for assertion lifetime
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AssertionClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub scope: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Holds the parsed signing key so a malformed credential fails before any request
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey) -> Result<Self, SeedError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| SeedError::InvalidCredential(format!("private_key: {}", e)))?;
        Ok(Self { key, encoding_key })
    }

    pub fn key(&self) -> &ServiceAccountKey {
        &self.key
    }

    pub fn claims(&self, now: DateTime<Utc>) -> AssertionClaims {
        AssertionClaims {
            iss: self.key.client_email.clone(),
            sub: self.key.client_email.clone(),
            aud: self.key.token_uri.clone(),
            scope: DATASTORE_SCOPE.to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        }
    }

    /// RS256-signed JWT assertion
    pub fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, SeedError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        encode(&header, &self.claims(now), &self.encoding_key)
            .map_err(|e| SeedError::Auth(format!("failed to sign assertion: {}", e)))
    }

    /// Exchange a fresh assertion for a bearer token
    pub async fn fetch_token(&self, client: &reqwest::Client) -> Result<AccessToken, SeedError> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;

        debug!("Requesting access token from {}", self.key.token_uri);
        let response = client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| SeedError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SeedError::Auth(format!("token endpoint returned {}: {}", status, body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SeedError::Auth(format!("invalid token response: {}", e)))?;

        Ok(AccessToken {
            token: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS)),
        })
    }
}
