//! End-to-end tests against the live HTTP surface.
//!
//! The router is served on an ephemeral port, backed by the in-memory
//! store, and driven with a real HTTP client.

use std::sync::Arc;

use serde_json::{json, Value};

use sourcecast::api::{self, ApiState};
use sourcecast::auth::{self, TokenService};
use sourcecast::model::{now_millis, Admin};
use sourcecast::repo::EpisodeRepository;
use sourcecast::store::memory::MemoryStore;
use sourcecast::store::AdminStore;

const TEST_SECRET: &str = "test-secret";
const ADMIN_PASSWORD: &str = "correct horse battery staple";

async fn spawn_server() -> String {
    let store = Arc::new(MemoryStore::default());

    let now = now_millis();
    store
        .upsert(&Admin {
            id: "adm1".to_string(),
            username: "admin".to_string(),
            password_hash: auth::hash_password(ADMIN_PASSWORD).expect("hash password"),
            email: "admin@example.com".to_string(),
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("seed admin");

    let state = Arc::new(ApiState::new(
        EpisodeRepository::new(store.clone()),
        store,
        TokenService::new(TEST_SECRET),
    ));

    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    format!("http://{}", addr)
}

async fn login(client: &reqwest::Client, base: &str) -> String {
    let response = client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "username": "admin", "password": ADMIN_PASSWORD }))
        .send()
        .await
        .expect("login request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("login body");
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["user"]["email"], "admin@example.com");

    body["token"].as_str().expect("token").to_string()
}

fn episode_draft(title: &str) -> Value {
    json!({
        "title": title,
        "date": "2024-03-01",
        "description": "An episode about something",
        "audioUrl": "https://player.example.com/ep",
        "sections": [
            {
                "title": "Intro",
                "timestamp": "00:00:00 - 00:15:00",
                "sources": [
                    { "title": "Article", "url": "https://example.com/article" }
                ]
            }
        ]
    })
}

#[tokio::test]
async fn login_requires_both_fields() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "username": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Username and password are required");
}

#[tokio::test]
async fn login_does_not_leak_which_credential_was_wrong() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let wrong_password = client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "username": "admin", "password": "nope" }))
        .send()
        .await
        .unwrap();
    let unknown_user = client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "username": "ghost", "password": "nope" }))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_user.status(), 401);

    let a: Value = wrong_password.json().await.unwrap();
    let b: Value = unknown_user.json().await.unwrap();
    assert_eq!(a["error"], b["error"]);
}

#[tokio::test]
async fn writes_require_a_valid_token() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    // No Authorization header.
    let response = client
        .post(format!("{base}/episodes"))
        .json(&episode_draft("Pilot"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    // Wrong scheme.
    let response = client
        .post(format!("{base}/episodes"))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .json(&episode_draft("Pilot"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    // Token signed with a different secret.
    let forged = TokenService::new("other-secret")
        .issue("adm1", "admin", "admin@example.com")
        .unwrap();
    let response = client
        .post(format!("{base}/episodes"))
        .bearer_auth(forged)
        .json(&episode_draft("Pilot"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    // Nothing was persisted.
    let episodes: Vec<Value> = client
        .get(format!("{base}/episodes"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(episodes.is_empty());
}

#[tokio::test]
async fn create_read_update_delete_flow() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let token = login(&client, &base).await;

    // Create: the server assigns the id and features the episode.
    let response = client
        .post(format!("{base}/episodes"))
        .bearer_auth(&token)
        .json(&episode_draft("Pilot"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let first: Value = response.json().await.unwrap();
    let first_id = first["id"].as_str().unwrap().to_string();
    assert!(first_id.starts_with("ep"));
    assert_eq!(first["isLatest"], true);

    // The featured episode is the one just created.
    let latest: Value = client
        .get(format!("{base}/episodes?latest=true"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(latest["id"], first_id.as_str());

    // A second create evicts the first from the featured slot.
    let second: Value = client
        .post(format!("{base}/episodes"))
        .bearer_auth(&token)
        .json(&episode_draft("Second"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second_id = second["id"].as_str().unwrap().to_string();

    let episodes: Vec<Value> = client
        .get(format!("{base}/episodes"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0]["id"], second_id.as_str());
    let featured: Vec<_> = episodes
        .iter()
        .filter(|e| e["isLatest"] == true)
        .collect();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0]["id"], second_id.as_str());

    // Replace the first episode and re-feature it.
    let mut update = episode_draft("Pilot, revised");
    update["isLatest"] = json!(true);
    let response = client
        .put(format!("{base}/episodes/{first_id}"))
        .bearer_auth(&token)
        .json(&update)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["id"], first_id.as_str());
    assert_eq!(updated["title"], "Pilot, revised");

    let latest: Value = client
        .get(format!("{base}/episodes?latest=true"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(latest["id"], first_id.as_str());

    // Unauthenticated delete is rejected and the episode survives.
    let response = client
        .delete(format!("{base}/episodes/{first_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    let response = client
        .get(format!("{base}/episodes/{first_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // Authenticated delete removes it; the featured slot stays empty
    // because deletion never promotes another episode.
    let response = client
        .delete(format!("{base}/episodes/{first_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Episode deleted successfully");

    let response = client
        .get(format!("{base}/episodes/{first_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let latest: Value = client
        .get(format!("{base}/episodes?latest=true"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(latest.is_null());
}

#[tokio::test]
async fn unknown_episode_returns_404() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/episodes/ep-missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Episode not found");
}

#[tokio::test]
async fn malformed_sections_are_dropped_not_rejected() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let token = login(&client, &base).await;

    // One section with a blank timestamp, otherwise valid.
    let draft = json!({
        "title": "Pilot",
        "date": "2024-03-01",
        "description": "An episode about something",
        "audioUrl": "https://player.example.com/ep",
        "sections": [
            {
                "title": "Intro",
                "timestamp": "   ",
                "sources": [
                    { "title": "Article", "url": "https://example.com/article" }
                ]
            }
        ]
    });

    let response = client
        .post(format!("{base}/episodes"))
        .bearer_auth(&token)
        .json(&draft)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let created: Value = response.json().await.unwrap();
    assert_eq!(created["sections"].as_array().unwrap().len(), 0);

    // And the persisted document agrees.
    let id = created["id"].as_str().unwrap();
    let fetched: Value = client
        .get(format!("{base}/episodes/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["sections"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn status_reports_collection_shape() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let token = login(&client, &base).await;

    let status: Value = client
        .get(format!("{base}/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["status"], "ok");
    assert_eq!(status["episodes"], 0);
    assert!(status["latest_id"].is_null());

    let created: Value = client
        .post(format!("{base}/episodes"))
        .bearer_auth(&token)
        .json(&episode_draft("Pilot"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let status: Value = client
        .get(format!("{base}/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["episodes"], 1);
    assert_eq!(status["latest_id"], created["id"]);
}
