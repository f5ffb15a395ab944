use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send a request through the full router and decode the JSON body
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn create_game(&self, mode: &str) -> String {
        let (status, body) = self
            .request("POST", "/api/create-game", Some(json!({ "mode": mode })))
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", body);
        body["gameId"].as_str().unwrap().to_string()
    }

    pub async fn join(&self, game_id: &str, player_id: &str, nickname: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/api/join-game",
            Some(json!({ "gameId": game_id, "playerId": player_id, "nickname": nickname })),
        )
        .await
    }

    pub async fn play(&self, game_id: &str, player_id: &str, index: usize) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/api/move",
            Some(json!({ "gameId": game_id, "index": index, "playerId": player_id })),
        )
        .await
    }

    pub async fn restart(&self, game_id: &str, player_id: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/api/restart",
            Some(json!({ "gameId": game_id, "playerId": player_id })),
        )
        .await
    }

    pub async fn chat(&self, game_id: &str, player_id: &str, text: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/api/chat",
            Some(json!({ "gameId": game_id, "playerId": player_id, "text": text })),
        )
        .await
    }

    pub async fn game(&self, game_id: &str) -> Value {
        let (status, body) = self
            .request("GET", &format!("/api/game/{}", game_id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}
