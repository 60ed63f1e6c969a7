//! End-to-end tests for the HTTP API, driven in-process through the router.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tictac_server::api::{AppState, router};
use tictac_server::{GameRepository, GameStore};
use tower::ServiceExt;

struct TestApp {
    _db: NamedTempFile,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let db = NamedTempFile::new().expect("Failed to create temp file");
        let path = db.path().to_str().expect("Invalid path").to_string();
        let repo = GameRepository::new(path).expect("Failed to create repository");
        repo.run_migrations().expect("Migrations failed");
        let origins = vec!["http://localhost:3000".to_string()];
        let router = router(AppState::new(GameStore::new(repo)), &origins);
        Self { _db: db, router }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Body failed")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Body was not JSON")
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("Bad request");
        self.send(request).await
    }

    async fn post(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(Method::POST).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Bad request");
        self.send(request).await
    }

    async fn create(&self, player1: &str, player2: &str) -> String {
        let (status, body) = self
            .post(
                "/api/games",
                Some(json!({ "player1": player1, "player2": player2 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["_id"].as_str().expect("Missing id").to_string()
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn test_create_game_returns_201() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/games", Some(json!({ "player1": "Alice", "player2": "Bob" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["player1"], "Alice");
    assert_eq!(body["player2"], "Bob");
    assert_eq!(body["status"], "active");
    assert_eq!(body["rounds"], json!([]));
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_game_missing_player_is_400() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/games", Some(json!({ "player1": "Alice" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "player1 and player2 are required");

    let (_, games) = app.get("/api/games").await;
    assert_eq!(games, json!([]));
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/games")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("Bad request");
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_get_unknown_game_is_404() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/games/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Game not found");
}

#[tokio::test]
async fn test_list_games_newest_first() {
    let app = TestApp::new();
    let first = app.create("A", "B").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = app.create("C", "D").await;

    let (status, body) = app.get("/api/games").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .expect("Expected array")
        .iter()
        .map(|g| g["_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);
}

#[tokio::test]
async fn test_round_with_board_snapshot() {
    let app = TestApp::new();
    let id = app.create("Alice", "Bob").await;
    let board = json!([["X", "X", "X"], ["O", "O", ""], ["", "", ""]]);

    let (status, body) = app
        .post(
            &format!("/api/games/{id}/rounds"),
            Some(json!({ "winner": "player1", "board": board })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rounds"][0]["winner"], "player1");
    assert_eq!(body["rounds"][0]["board"], board);
}

#[tokio::test]
async fn test_round_with_bad_winner_is_400() {
    let app = TestApp::new();
    let id = app.create("Alice", "Bob").await;
    let (status, body) = app
        .post(
            &format!("/api/games/{id}/rounds"),
            Some(json!({ "winner": "player3" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "winner must be player1, player2, or draw");
}

#[tokio::test]
async fn test_round_with_bad_cell_is_400() {
    let app = TestApp::new();
    let id = app.create("Alice", "Bob").await;
    let (status, _) = app
        .post(
            &format!("/api/games/{id}/rounds"),
            Some(json!({ "winner": "draw", "board": [["Z", "", ""], ["", "", ""], ["", "", ""]] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_round_for_unknown_game_is_404() {
    let app = TestApp::new();
    let (status, _) = app
        .post("/api/games/missing/rounds", Some(json!({ "winner": "draw" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stop_unknown_game_is_404() {
    let app = TestApp::new();
    let (status, _) = app.post("/api/games/missing/stop", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_scenario() {
    let app = TestApp::new();
    let id = app.create("Alice", "Bob").await;
    let rounds_uri = format!("/api/games/{id}/rounds");

    let (status, _) = app
        .post(&rounds_uri, Some(json!({ "winner": "player1" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.post(&rounds_uri, Some(json!({ "winner": "draw" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, game) = app.get(&format!("/api/games/{id}")).await;
    assert_eq!(game["rounds"].as_array().unwrap().len(), 2);
    assert_eq!(game["status"], "active");

    let (status, stopped) = app.post(&format!("/api/games/{id}/stop"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stopped["status"], "stopped");

    let (status, again) = app.post(&format!("/api/games/{id}/stop"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["status"], "stopped");

    let (_, game) = app.get(&format!("/api/games/{id}")).await;
    assert_eq!(game["status"], "stopped");

    let (status, body) = app
        .post(&rounds_uri, Some(json!({ "winner": "player2" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Game already stopped");

    let (_, game) = app.get(&format!("/api/games/{id}")).await;
    assert_eq!(game["rounds"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_cors_allows_configured_origin_only() {
    let app = TestApp::new();
    let preflight = |origin: &str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/games")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .expect("Bad request")
    };

    let response = app
        .router
        .clone()
        .oneshot(preflight("http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );

    let response = app
        .router
        .clone()
        .oneshot(preflight("http://evil.test"))
        .await
        .unwrap();
    assert!(
        !response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
