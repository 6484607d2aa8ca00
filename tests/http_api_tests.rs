// Integration tests for the HTTP API
//
// The router is driven in-process with tower's `oneshot`; the AI services
// are replaced by the scripted fake.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::Engine;
use common::FakeAi;
use serde_json::{json, Value};
use speaking_partner::http::{EndSessionResponse, StartSessionResponse, TurnResponse};
use speaking_partner::{create_router, AiError, AiServices, AppState};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "speaking-partner-test-boundary";

fn app(ai: &Arc<FakeAi>) -> Router {
    create_router(AppState::new(Arc::clone(ai) as Arc<dyn AiServices>))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn voice_request(session_id: &str, audio: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"session_id\"\r\n\r\n{session_id}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"clip.webm\"\r\nContent-Type: audio/webm\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(audio);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/session/voice")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn start(app: &Router) -> StartSessionResponse {
    let (status, body) = send(
        app,
        post_json(
            "/session/start",
            json!({"user_id": "user-1", "level": "beginner", "gender": "female"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn test_health_check_reports_ok() {
    let ai = Arc::new(FakeAi::new());
    let request = Request::get("/health").body(Body::empty()).unwrap();

    let (status, body) = send(&app(&ai), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_start_returns_starter_and_base64_audio() {
    let ai = Arc::new(FakeAi::new());
    let app = app(&ai);

    let started = start(&app).await;

    assert!(uuid::Uuid::parse_str(&started.session_id).is_ok());
    assert!(speaking_partner::content::starters(speaking_partner::Level::Beginner)
        .contains(&started.message.as_str()));
    let audio = base64::engine::general_purpose::STANDARD
        .decode(started.audio_base64.unwrap())
        .unwrap();
    assert_eq!(audio, b"RIFF");
}

#[tokio::test]
async fn test_start_with_invalid_level_is_bad_request() {
    let ai = Arc::new(FakeAi::new());

    let (status, body) = send(
        &app(&ai),
        post_json("/session/start", json!({"user_id": "u", "level": "expert"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid level"));
}

#[tokio::test]
async fn test_text_turn_round_trip() {
    let ai = Arc::new(FakeAi::with_replies([
        "Lovely!\nFEEDBACK_START\nScore: 8/10\nFEEDBACK_END",
    ]));
    let app = app(&ai);
    let started = start(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/session/text",
            json!({"session_id": started.session_id, "message": "I like red apples"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("user_text").is_none());
    let turn: TurnResponse = serde_json::from_value(body).unwrap();
    assert_eq!(turn.exchange_count, 1);
    assert_eq!(turn.stats.total_words, 4);
    assert_eq!(turn.stats.exchanges, 1);
    assert_eq!(turn.stats.avg_score, Some(8.0));
    assert!(turn.audio_base64.is_some());
}

#[tokio::test]
async fn test_running_average_is_null_without_scores() {
    let ai = Arc::new(FakeAi::new());
    let app = app(&ai);
    let started = start(&app).await;

    let (_, body) = send(
        &app,
        post_json(
            "/session/text",
            json!({"session_id": started.session_id, "message": "hello"}),
        ),
    )
    .await;

    assert_eq!(body["stats"]["avg_score"], Value::Null);
}

#[tokio::test]
async fn test_voice_turn_echoes_transcript() {
    let ai = Arc::new(FakeAi::with_replies(["Cats are great."]));
    ai.set_transcript(Ok("I have a cat".to_string()));
    let app = app(&ai);
    let started = start(&app).await;

    let (status, body) = send(&app, voice_request(&started.session_id, b"fake-webm")).await;

    assert_eq!(status, StatusCode::OK);
    let turn: TurnResponse = serde_json::from_value(body).unwrap();
    assert_eq!(turn.user_text.as_deref(), Some("I have a cat"));
    assert_eq!(turn.ai_response, "Cats are great.");
}

#[tokio::test]
async fn test_voice_turn_error_statuses() {
    let ai = Arc::new(FakeAi::new());
    let app = app(&ai);
    let started = start(&app).await;

    ai.set_transcript(Err(AiError::Transcription("HTTP 500".to_string())));
    let (status, _) = send(&app, voice_request(&started.session_id, b"x")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    ai.set_transcript(Ok("  ".to_string()));
    let (status, body) = send(&app, voice_request(&started.session_id, b"x")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Could not transcribe audio");

    let (status, _) = send(&app, voice_request("missing", b"x")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_synthesis_failure_yields_null_audio() {
    let ai = Arc::new(FakeAi::new());
    let app = app(&ai);
    let started = start(&app).await;
    ai.fail_synthesis(true);

    let (status, body) = send(
        &app,
        post_json(
            "/session/text",
            json!({"session_id": started.session_id, "message": "hello"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["audio_base64"], Value::Null);
}

#[tokio::test]
async fn test_completion_failure_is_bad_gateway() {
    let ai = Arc::new(FakeAi::new());
    ai.push_reply(Err(AiError::Completion("HTTP 503".to_string())));
    let app = app(&ai);
    let started = start(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/session/text",
            json!({"session_id": started.session_id, "message": "hello"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("HTTP 503"));
}

#[tokio::test]
async fn test_end_then_every_operation_is_not_found() {
    let ai = Arc::new(FakeAi::new());
    let app = app(&ai);
    let started = start(&app).await;

    let (status, body) = send(
        &app,
        post_json("/session/end", json!({"session_id": started.session_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ended: EndSessionResponse = serde_json::from_value(body).unwrap();
    assert_eq!(ended.stats.avg_score, 0.0);
    assert_eq!(ended.summary, speaking_partner::content::SHORT_SESSION_SUMMARY);

    let (status, _) = send(
        &app,
        post_json(
            "/session/text",
            json!({"session_id": started.session_id, "message": "hi"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, voice_request(&started.session_id, b"x")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        post_json("/session/end", json!({"session_id": started.session_id})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}
