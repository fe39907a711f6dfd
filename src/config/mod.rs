// Configuration: credential artifact and seed scenario

pub mod credentials;
pub mod scenario;

use std::path::PathBuf;

pub use credentials::{ServiceAccountKey, DEFAULT_CREDENTIALS_FILE};
pub use scenario::SeedScenario;

pub const EMULATOR_HOST_ENV: &str = "FIRESTORE_EMULATOR_HOST";
pub const DEFAULT_DATABASE: &str = "(default)";

/// Settings resolved from the command line and environment
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: PathBuf,
    pub project: Option<String>,
    pub database: String,
    pub scenario: Option<PathBuf>,
    pub emulator_host: Option<String>,
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            project: None,
            database: DEFAULT_DATABASE.to_string(),
            scenario: None,
            emulator_host: None,
            dry_run: false,
        }
    }
}
