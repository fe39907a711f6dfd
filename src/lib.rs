pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod store;

use tracing::{info, warn};

use config::{credentials::require_credential_file, SeedScenario, ServiceAccountKey, Settings};
use error::SeedError;
use services::{SeedReport, Seeder};
use store::{auth::ServiceAccountAuth, firestore::FirestoreClient, memory::InMemoryStore, DocumentStore};

/// Open the store session the settings point at.
///
/// Parsing the signing key happens here, so a malformed credential fails
/// before the first request.
pub async fn open_store(
    settings: &Settings,
    key: ServiceAccountKey,
) -> Result<Box<dyn DocumentStore>, SeedError> {
    let project = settings
        .project
        .clone()
        .unwrap_or_else(|| key.project_id.clone());

    match &settings.emulator_host {
        Some(host) => Ok(Box::new(FirestoreClient::emulator(
            host,
            &project,
            &settings.database,
        )?)),
        None => {
            let auth = ServiceAccountAuth::new(key)?;
            let client = FirestoreClient::authenticated(&auth, &project, &settings.database).await?;
            info!("Connected to {}", client.database_path());
            Ok(Box::new(client))
        }
    }
}

/// Check the credential, then write the scenario.
///
/// Every local precondition (credential file, scenario file) is checked
/// before any network activity.
pub async fn run(settings: &Settings) -> Result<SeedReport, SeedError> {
    let credentials = require_credential_file(&settings.credentials)?;
    let scenario = SeedScenario::load(settings.scenario.as_deref())?;
    let key = ServiceAccountKey::from_file(&credentials)?;

    if settings.dry_run {
        return dry_run(&scenario).await;
    }

    let store = open_store(settings, key).await?;
    Seeder::new(store.as_ref()).run(&scenario).await
}

async fn dry_run(scenario: &SeedScenario) -> Result<SeedReport, SeedError> {
    warn!("Dry run: nothing is written to the remote store");
    let store = InMemoryStore::new();
    let report = Seeder::new(&store).run(scenario).await?;

    for record in store.write_log() {
        if let Some(doc) = store.get(&record.collection, &record.id) {
            println!("{}/{}: {}", record.collection, record.id, doc.to_plain_json());
        }
    }

    Ok(report)
}
