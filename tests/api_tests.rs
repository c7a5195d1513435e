use auto_board::{
    AppConfig, AppState, create_router,
    models::Ad,
    repository::{
        AdRepositoryState, InMemoryAdRepository, InMemoryUserRepository, UserRepositoryState,
    },
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Debug)]
pub struct TestApp {
    pub address: String,
}

/// Spawns the full router (all middleware layers included) on an ephemeral port,
/// backed by the in-memory repositories so no database is required.
async fn spawn_app() -> TestApp {
    let users = Arc::new(InMemoryUserRepository::new()) as UserRepositoryState;
    let ads = Arc::new(InMemoryAdRepository::new()) as AdRepositoryState;

    let state = AppState {
        users,
        ads,
        config: AppConfig::default(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address }
}

// --- Request Helpers ---

fn ad_payload() -> serde_json::Value {
    serde_json::json!({
        "vin": "WVWZZZ1JZXW000001",
        "vrc": "AB123456",
        "license_plate": "X123YZ",
        "brand": "Volkswagen",
        "model": "Golf",
        "mileage": 154000,
        "engine_capacity": 1595,
        "price": 4200,
        "description": "Runs fine, second owner",
        "city": "Limerick",
        "phone": "+353000000"
    })
}

async fn register(client: &reqwest::Client, address: &str, email: &str, is_admin: bool) -> i64 {
    let response = client
        .post(format!("{}/users/registration", address))
        .json(&serde_json::json!({
            "email": email,
            "name": "Test",
            "surname": "User",
            "password": "hunter2hunter2",
            "is_admin": is_admin
        }))
        .send()
        .await
        .expect("registration request failed");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User registered successfully");
    body["user_id"].as_i64().expect("user_id should be an integer")
}

async fn login(client: &reqwest::Client, address: &str, email: &str) -> String {
    let response = client
        .post(format!("{}/users/login", address))
        .json(&serde_json::json!({ "email": email, "password": "hunter2hunter2" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    body["token"].as_str().expect("token should be present").to_string()
}

async fn submit_ad(client: &reqwest::Client, address: &str, token: &str) -> i64 {
    let response = client
        .post(format!("{}/ads", address))
        .bearer_auth(token)
        .json(&ad_payload())
        .send()
        .await
        .expect("submit request failed");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Ad applied successfully");
    body["id"].as_i64().expect("id should be an integer")
}

// --- Tests ---

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_submitted_ad_is_not_publicly_listed() {
    // Scenario: register, login, submit. The fresh ad must not appear on the
    // public listing until moderated.
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    register(&client, &app.address, "u1@example.com", false).await;
    let token = login(&client, &app.address, "u1@example.com").await;
    let ad_id = submit_ad(&client, &app.address, &token).await;

    let list: Vec<Ad> = client
        .get(format!("{}/ads", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(
        list.iter().all(|ad| ad.id != ad_id),
        "Pending ad should not be listed"
    );
}

#[tokio::test]
async fn test_submission_without_token_is_unauthorized() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/ads", app.address))
        .json(&ad_payload())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_unknown_token_degrades_to_anonymous() {
    // A syntactically fine but unknown bearer token resolves to anonymous, so
    // the submission is rejected by the auth gate, not by a server error.
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/ads", app.address))
        .bearer_auth("deadbeefdeadbeefdeadbeefdeadbeef")
        .json(&ad_payload())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_bad_request() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    register(&client, &app.address, "u1@example.com", false).await;

    let response = client
        .post(format!("{}/users/login", app.address))
        .json(&serde_json::json!({ "email": "u1@example.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Wrong email or password");
}

#[tokio::test]
async fn test_moderating_missing_ad_is_not_found() {
    // Scenario: an admin moderating a nonexistent id gets 404.
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    register(&client, &app.address, "admin@example.com", true).await;
    let token = login(&client, &app.address, "admin@example.com").await;

    let response = client
        .post(format!("{}/ads/999999/moderate", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_non_admin_cannot_moderate_own_ad() {
    // Scenario: a regular user submits an ad and then tries to moderate it
    // with their own token. Forbidden, even though the ad exists and is theirs.
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    register(&client, &app.address, "u2@example.com", false).await;
    let token = login(&client, &app.address, "u2@example.com").await;
    let ad_id = submit_ad(&client, &app.address, &token).await;

    let response = client
        .post(format!("{}/ads/{}/moderate", app.address, ad_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_ad_lifecycle_through_moderation() {
    // Full lifecycle: submit as a user, verify hidden, moderate as an admin,
    // verify publicly visible, and confirm moderation is idempotent.
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    register(&client, &app.address, "seller@example.com", false).await;
    let seller_token = login(&client, &app.address, "seller@example.com").await;
    let ad_id = submit_ad(&client, &app.address, &seller_token).await;

    // Hidden while pending review.
    let detail = client
        .get(format!("{}/ads/{}", app.address, ad_id))
        .send()
        .await
        .unwrap();
    assert_eq!(detail.status(), 404);

    register(&client, &app.address, "admin@example.com", true).await;
    let admin_token = login(&client, &app.address, "admin@example.com").await;

    let moderate = client
        .post(format!("{}/ads/{}/moderate", app.address, ad_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(moderate.status(), 200);
    let body: serde_json::Value = moderate.json().await.unwrap();
    assert_eq!(body["message"], "moderation_completed");

    // Idempotent: a second pass succeeds the same way.
    let again = client
        .post(format!("{}/ads/{}/moderate", app.address, ad_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), 200);

    // Now publicly visible, both on the detail and the listing path.
    let detail = client
        .get(format!("{}/ads/{}", app.address, ad_id))
        .send()
        .await
        .unwrap();
    assert_eq!(detail.status(), 200);
    let ad: Ad = detail.json().await.unwrap();
    assert_eq!(ad.id, ad_id);
    assert_eq!(ad.brand, "Volkswagen");
    assert!(ad.is_moderated);

    let list: Vec<Ad> = client
        .get(format!("{}/ads", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.iter().any(|ad| ad.id == ad_id));
}
