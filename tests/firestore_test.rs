// Firestore client against a mocked token endpoint and REST API

use anyhow::Result;
use farm_seed::config::{SeedScenario, ServiceAccountKey};
use farm_seed::error::SeedError;
use farm_seed::services::Seeder;
use farm_seed::store::auth::{ServiceAccountAuth, JWT_BEARER_GRANT};
use farm_seed::store::firestore::FirestoreClient;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

const COMMIT_PATH: &str = r"^/v1/projects/grape-master/databases/\(default\)/documents:commit$";

// Same version prefix as the production endpoint
fn api_base(server: &MockServer) -> String {
    format!("{}/v1", server.uri())
}

fn test_auth(server: &MockServer) -> ServiceAccountAuth {
    let json = common::service_account_json(&format!("{}/token", server.uri()));
    let key = ServiceAccountKey::from_json(&json).unwrap();
    ServiceAccountAuth::new(key).unwrap()
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.test-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn commit_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path().ends_with(":commit"))
        .map(|r| r.body_json::<Value>().unwrap())
        .collect()
}

// "projects/.../documents/<collection>/<id>" -> (collection, id)
fn collection_and_id(body: &Value) -> (String, String) {
    let name = body["writes"][0]["update"]["name"].as_str().unwrap();
    let mut parts = name.rsplit('/');
    let id = parts.next().unwrap().to_string();
    let collection = parts.next().unwrap().to_string();
    (collection, id)
}

#[tokio::test]
async fn test_token_exchange_uses_jwt_bearer_grant() -> Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let auth = test_auth(&server);
    let token = auth.fetch_token(&reqwest::Client::new()).await?;
    assert_eq!(token.token, "ya29.test-token");

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone())?;
    assert!(body.contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"));
    assert!(body.contains("assertion="));
    assert!(JWT_BEARER_GRANT.starts_with("urn:ietf"));

    Ok(())
}

#[tokio::test]
async fn test_rejected_token_request_fails_session_setup() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT Signature."
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(COMMIT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let auth = test_auth(&server);
    let result = FirestoreClient::authenticated_at(&api_base(&server), &auth, "grape-master", "(default)").await;

    match result {
        Err(SeedError::Auth(detail)) => assert!(detail.contains("invalid_grant")),
        Err(other) => panic!("unexpected error: {:?}", other),
        Ok(_) => panic!("session should not be established"),
    }

    Ok(())
}

#[tokio::test]
async fn test_full_run_commits_five_linked_writes() -> Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path_regex(COMMIT_PATH))
        .and(header("authorization", "Bearer ya29.test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "writeResults": [{ "updateTime": "2025-01-01T00:00:00.000000Z" }],
            "commitTime": "2025-01-01T00:00:00.000000Z"
        })))
        .expect(5)
        .mount(&server)
        .await;

    let auth = test_auth(&server);
    let client = FirestoreClient::authenticated_at(&api_base(&server), &auth, "grape-master", "(default)").await?;
    let report = Seeder::new(&client).run(&SeedScenario::default()).await?;

    let bodies = commit_bodies(&server).await;
    assert_eq!(bodies.len(), 5);

    let written: Vec<(String, String)> = bodies.iter().map(collection_and_id).collect();
    let collections: Vec<&str> = written.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(collections, ["users", "farmers", "crops", "diagnoses", "products"]);

    // user is a plain overwrite, the rest are create-only
    assert_eq!(written[0].1, "test-user-uid-1");
    assert!(bodies[0]["writes"][0].get("currentDocument").is_none());
    for body in &bodies[1..] {
        assert_eq!(body["writes"][0]["currentDocument"], json!({ "exists": false }));
    }

    let farmer_id = &written[1].1;
    let crop_id = &written[2].1;
    assert_eq!(farmer_id, report.farmer.as_str());
    assert_eq!(crop_id, report.crop.as_str());

    let crop_fields = &bodies[2]["writes"][0]["update"]["fields"];
    assert_eq!(crop_fields["farmerId"]["stringValue"], farmer_id.as_str());

    let diagnosis_fields = &bodies[3]["writes"][0]["update"]["fields"];
    assert_eq!(diagnosis_fields["farmerId"]["stringValue"], farmer_id.as_str());
    assert_eq!(diagnosis_fields["cropId"]["stringValue"], crop_id.as_str());
    assert_eq!(diagnosis_fields["reportedByUid"]["stringValue"], "test-user-uid-1");

    let farmer_fields = &bodies[1]["writes"][0]["update"]["fields"];
    assert_eq!(
        farmer_fields["location"],
        json!({ "geoPointValue": { "latitude": 18.5204, "longitude": 73.8567 } })
    );
    assert_eq!(bodies[4]["writes"][0]["update"]["fields"]["price"], json!({ "integerValue": "190" }));

    for body in &bodies {
        let transforms = body["writes"][0]["updateTransforms"].as_array().unwrap();
        assert!(transforms
            .iter()
            .any(|t| t["fieldPath"] == "createdAt" && t["setToServerValue"] == "REQUEST_TIME"));
    }

    Ok(())
}

#[tokio::test]
async fn test_rejected_write_stops_the_run_without_rollback() -> Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path_regex(COMMIT_PATH))
        .and(body_string_contains("/documents/diagnoses/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED" }
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(COMMIT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let auth = test_auth(&server);
    let client = FirestoreClient::authenticated_at(&api_base(&server), &auth, "grape-master", "(default)").await?;
    let err = Seeder::new(&client)
        .run(&SeedScenario::default())
        .await
        .unwrap_err();

    match &err {
        SeedError::Write { collection, detail } => {
            assert_eq!(collection, "diagnoses");
            assert!(detail.contains("403"));
            assert!(detail.contains("PERMISSION_DENIED"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // users, farmers, crops, then the rejected diagnosis; no product and no deletes
    let collections: Vec<String> = commit_bodies(&server)
        .await
        .iter()
        .map(|b| collection_and_id(b).0)
        .collect();
    assert_eq!(collections, ["users", "farmers", "crops", "diagnoses"]);

    Ok(())
}

#[tokio::test]
async fn test_emulator_session_sends_owner_token() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1/projects/demo-farm/databases/\(default\)/documents:commit$"))
        .and(header("authorization", "Bearer owner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(5)
        .mount(&server)
        .await;

    let host = server.uri().trim_start_matches("http://").to_string();
    let client = FirestoreClient::emulator(&host, "demo-farm", "(default)")?;
    Seeder::new(&client).run(&SeedScenario::default()).await?;

    Ok(())
}
