//! End-to-end pipeline behavior against a mock API server: bearer
//! injection, single-shot token renewal, replay, and session teardown.

use bingo_client::{ApiConfig, BingoClient, CredentialStore, Error, MemoryStore};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn profile_json() -> serde_json::Value {
    json!({
        "userId": 1,
        "userName": "casey",
        "firstName": "Casey",
        "lastName": "Jones",
        "bio": "",
        "totalPoints": 40,
        "email": "casey@example.com",
        "visibility": 2,
        "avatar": 3,
        "isSuperuser": false
    })
}

fn grid_json() -> serde_json::Value {
    json!({
        "grid_id": 7,
        "challenges": [{
            "name": "Say hello",
            "description": "Introduce yourself to someone new.",
            "challenge_type": "connect",
            "points": 5,
            "status": "not started"
        }]
    })
}

fn client_for(server: &MockServer) -> BingoClient<MemoryStore> {
    let config = ApiConfig::new(server.uri().parse().unwrap());
    BingoClient::new(config, MemoryStore::new()).unwrap()
}

/// Put a full credential triple in the client's store, as a prior login
/// would have.
fn seed_session(client: &BingoClient<MemoryStore>, access: &str, refresh: &str) {
    let profile = serde_json::from_value(profile_json()).unwrap();
    client
        .store()
        .set(profile, access.into(), refresh.into())
        .unwrap();
}

#[tokio::test]
async fn login_stores_triple_and_derives_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token/"))
        .and(body_json(json!({"username": "casey", "password": "hunter2"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "A1", "refresh": "R1"})),
        )
        .expect(1)
        .named("token obtain")
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/me/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .expect(1)
        .named("current user")
        .mount(&server)
        .await;

    let client = client_for(&server);
    let profile = client.login("casey", "hunter2").await.unwrap();
    assert_eq!(profile.user_name, "casey");

    let record = client.store().get();
    assert_eq!(record.access_token(), Some("A1"));
    assert_eq!(record.refresh_token(), Some("R1"));

    let session = client.session();
    assert!(session.is_logged_in());
    assert!(!session.is_elevated());
}

#[tokio::test]
async fn rejected_login_leaves_store_logged_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .expect(1)
        .mount(&server)
        .await;

    // A login 401 means bad credentials, never a refresh attempt.
    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .named("refresh exchange")
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.login("casey", "wrong").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!client.session().is_logged_in());
}

#[tokio::test]
async fn renews_once_and_replays_with_new_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bingo/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .named("stale request")
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .and(body_json(json!({"refresh": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "A2"})))
        .expect(1)
        .named("refresh exchange")
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bingo/"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grid_json()))
        .expect(1)
        .named("replayed request")
        .mount(&server)
        .await;

    let client = client_for(&server);
    seed_session(&client, "A1", "R1");

    let grid = client.bingo_grid().await.unwrap();
    assert_eq!(grid.grid_id, 7);

    // Renewal swapped only the access token; the session survived.
    let record = client.store().get();
    assert_eq!(record.access_token(), Some("A2"));
    assert_eq!(record.refresh_token(), Some("R1"));
    assert!(record.is_logged_in());
}

#[tokio::test]
async fn failed_refresh_clears_store_and_marks_session_expired() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/me/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("refresh token blacklisted"))
        .expect(1)
        .named("refresh exchange")
        .mount(&server)
        .await;

    let client = client_for(&server);
    seed_session(&client, "A1", "R1");

    let err = client.current_user().await.unwrap_err();
    assert!(err.is_session_expired());
    match err {
        Error::SessionExpired { detail, .. } => assert!(detail.contains("token expired")),
        other => panic!("expected SessionExpired, got {other:?}"),
    }

    // Full teardown: the whole triple is gone.
    let record = client.store().get();
    assert!(!record.is_logged_in());
    assert!(record.access_token().is_none());
    assert!(record.refresh_token().is_none());
}

#[tokio::test]
async fn replayed_401_is_not_refreshed_again() {
    let server = MockServer::start().await;

    // Original and replay both come back 401.
    Mock::given(method("GET"))
        .and(path("/leaderboard/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("still denied"))
        .expect(2)
        .named("leaderboard")
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "A2"})))
        .expect(1)
        .named("refresh exchange")
        .mount(&server)
        .await;

    let client = client_for(&server);
    seed_session(&client, "A1", "R1");

    // The replay's failure propagates as-is, not as session-expired.
    let err = client.leaderboard().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!err.is_session_expired());

    // The successful exchange was stored; only the replay failed.
    let record = client.store().get();
    assert!(record.is_logged_in());
    assert_eq!(record.access_token(), Some("A2"));
}

#[tokio::test]
async fn missing_refresh_token_never_triggers_an_exchange() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bingo/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("denied"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "A2"})))
        .expect(0)
        .named("refresh exchange")
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.bingo_grid().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn refresh_without_usable_access_token_ends_the_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/me/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&server)
        .await;

    // 2xx, but no usable token in the body.
    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": ""})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    seed_session(&client, "A1", "R1");

    let err = client.current_user().await.unwrap_err();
    assert!(err.is_session_expired());
    assert!(!client.session().is_logged_in());
}

#[tokio::test]
async fn validation_failure_propagates_without_touching_the_session() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/user/update/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"bio": ["Ensure this field has no more than 300 characters."]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .named("refresh exchange")
        .mount(&server)
        .await;

    let client = client_for(&server);
    seed_session(&client, "A1", "R1");

    let preferences = bingo_client::UpdatePreferences {
        avatar: bingo_client::Avatar::try_from(1).unwrap(),
        bio: "x".repeat(301),
        visibility: bingo_client::Visibility::Public,
    };
    let err = client.update_preferences(&preferences).await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));

    // 400s never log the user out.
    let record = client.store().get();
    assert!(record.is_logged_in());
    assert_eq!(record.access_token(), Some("A1"));
}

#[tokio::test]
async fn anonymous_grid_fetch_sends_no_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bingo/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(grid_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let grid = client.bingo_grid().await.unwrap();
    assert_eq!(grid.challenges.len(), 1);

    let requests = server.received_requests().await.unwrap();
    assert!(
        requests[0].headers.get("authorization").is_none(),
        "logged-out requests must be unauthenticated"
    );
}
