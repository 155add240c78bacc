//! Integration tests for slack-notify against a local mock of the Web API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use slack_notify::{Block, Document, SlackClient, SlackConfig, SlackError};
use tokio::net::TcpListener;

/// What the mock answers to `chat.postMessage`.
#[derive(Clone, Copy)]
enum Reply {
    Ok,
    ApiError(&'static str),
    RateLimited,
}

#[derive(Clone)]
struct MockState {
    reply: Reply,
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn post_message(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push((auth, body));

    match state.reply {
        Reply::Ok => Json(json!({"ok": true, "channel": "C1", "ts": "1700000000.000100"})).into_response(),
        Reply::ApiError(code) => Json(json!({"ok": false, "error": code})).into_response(),
        Reply::RateLimited => (
            StatusCode::TOO_MANY_REQUESTS,
            [("retry-after", "7")],
            Json(json!({"ok": false, "error": "ratelimited"})),
        )
            .into_response(),
    }
}

async fn auth_test() -> Json<Value> {
    Json(json!({"ok": true, "team": "Quake Ops", "user": "quakebot", "bot_id": "B1"}))
}

async fn spawn_mock(reply: Reply) -> (SlackClient, Arc<Mutex<Vec<(Option<String>, Value)>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        reply,
        requests: Arc::clone(&requests),
    };
    let app = Router::new()
        .route("/api/chat.postMessage", post(post_message))
        .route("/api/auth.test", post(auth_test))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config =
        SlackConfig::new("xoxb-test", "C1").with_api_base(format!("http://{}/api", addr));
    (SlackClient::new(config).unwrap(), requests)
}

fn sample_document() -> Document {
    Document::new("Earthquake Information: max intensity 4")
        .with_color("#f1c40f")
        .with_block(Block::header("Earthquake Information"))
        .with_block(Block::divider())
}

#[tokio::test]
async fn test_post_document_success() {
    let (client, requests) = spawn_mock(Reply::Ok).await;

    let posted = client.post_document(&sample_document()).await.unwrap();
    assert_eq!(posted.ts, "1700000000.000100");

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (auth, body) = &requests[0];
    assert_eq!(auth.as_deref(), Some("Bearer xoxb-test"));
    assert_eq!(body["channel"], "C1");
    assert_eq!(body["text"], "Earthquake Information: max intensity 4");
    assert_eq!(body["attachments"][0]["color"], "#f1c40f");
    assert_eq!(body["attachments"][0]["blocks"][0]["type"], "header");
}

#[tokio::test]
async fn test_post_document_api_errors_are_classified() {
    let (client, _) = spawn_mock(Reply::ApiError("not_in_channel")).await;
    assert!(matches!(
        client.post_document(&sample_document()).await,
        Err(SlackError::NotInChannel)
    ));

    let (client, _) = spawn_mock(Reply::ApiError("channel_not_found")).await;
    assert!(matches!(
        client.post_document(&sample_document()).await,
        Err(SlackError::ChannelNotFound)
    ));

    let (client, _) = spawn_mock(Reply::ApiError("invalid_auth")).await;
    assert!(matches!(
        client.post_document(&sample_document()).await,
        Err(SlackError::InvalidAuth(_))
    ));
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let (client, _) = spawn_mock(Reply::RateLimited).await;
    let err = client.post_document(&sample_document()).await.unwrap_err();
    assert!(err.is_transient());
    assert!(matches!(
        err,
        SlackError::RateLimited {
            retry_after: Some(delay)
        } if delay == Duration::from_secs(7)
    ));
}

#[tokio::test]
async fn test_check_auth() {
    let (client, _) = spawn_mock(Reply::Ok).await;
    let info = client.check_auth().await.unwrap();
    assert_eq!(info.team.as_deref(), Some("Quake Ops"));
    assert_eq!(info.bot_id.as_deref(), Some("B1"));
}
