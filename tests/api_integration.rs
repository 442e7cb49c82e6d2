//! HTTP API tests driven through the router with a scripted model.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use content_forge::llm::{LlmError, RetryPolicy, ScriptedClient};
use content_forge::{AppState, ServiceConfig, create_router};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(client: Arc<ScriptedClient>) -> Router {
    let mut config = ServiceConfig::default();
    config.generation.retry = RetryPolicy {
        max_attempts: 3,
        initial_delay_ms: 2,
        max_delay_ms: 4,
    };
    let state = AppState::with_client(&config, client).unwrap();
    create_router(Arc::new(state))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn script_one_topic(client: &ScriptedClient, title: &str) {
    client
        .push_json(json!({
            "topics": [{
                "title": title,
                "keywords": ["kw"],
                "search_volume": "low",
                "competition": 0.2
            }]
        }))
        .await;
    client
        .push_json(json!({
            "outline": ["Intro"],
            "key_points": ["Point"],
            "word_count": 900,
            "references": [],
            "audience": "Beginners",
            "writing_time": 45
        }))
        .await;
    client.push_json(json!({"gaps": []})).await;
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_content_health() {
    let (status, body) = send(app(Arc::new(ScriptedClient::new())), get("/api/content/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn test_liveness() {
    let (status, body) = send(app(Arc::new(ScriptedClient::new())), get("/-/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_health_reports_version_and_timestamp() {
    let (status, body) = send(app(Arc::new(ScriptedClient::new())), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

// ============================================================================
// Content generation
// ============================================================================

#[tokio::test]
async fn test_generate_success() {
    let client = Arc::new(ScriptedClient::new());
    client.push_text("# Title\n\nBody").await;

    let (status, body) = send(
        app(client.clone()),
        json_request(
            "POST",
            "/api/content/generate",
            json!({"topic": "Composting", "keywords": ["compost"]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "# Title\n\nBody");
    assert_eq!(body["model"], "gpt-4");
    assert_eq!(
        body["usage"],
        json!({"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30})
    );

    // defaults: medium length
    assert_eq!(client.requests().await[0].max_tokens, Some(2500));
}

#[tokio::test]
async fn test_generate_failure_maps_to_500_detail() {
    let client = Arc::new(ScriptedClient::new());
    client.push_error(LlmError::MissingApiKey).await;

    let (status, body) = send(
        app(client),
        json_request(
            "POST",
            "/api/content/generate",
            json!({"topic": "Composting", "keywords": []}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "Content generation failed: No API key configured for the language model provider"
    );
}

#[tokio::test]
async fn test_generate_missing_keywords_rejected() {
    let client = Arc::new(ScriptedClient::new());

    let (status, _) = send(
        app(client.clone()),
        json_request("POST", "/api/content/generate", json!({"topic": "Composting"})),
    )
    .await;

    assert!(status.is_client_error());
    assert!(client.requests().await.is_empty());
}

// ============================================================================
// Calendar
// ============================================================================

#[tokio::test]
async fn test_plan_then_upcoming_then_status() {
    let client = Arc::new(ScriptedClient::new());
    script_one_topic(&client, "Raised Beds").await;
    let app = app(client);

    let (status, body) = send(
        app.clone(),
        json_request(
            "POST",
            "/api/calendar/plan",
            json!({"niche": "gardening", "posts_per_week": 1}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let planned = body.as_array().unwrap();
    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0]["plan"]["topic"]["title"], "Raised Beds");
    assert_eq!(planned[0]["competition_analysis"], json!({"gaps": []}));

    let (status, body) = send(app.clone(), get("/api/calendar/upcoming?days=30")).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["status"], "planned");

    let (status, body) = send(
        app.clone(),
        json_request(
            "PUT",
            "/api/calendar/status",
            json!({"title": "Raised Beds", "status": "published"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"title": "Raised Beds", "status": "published", "updated": true})
    );

    let (_, body) = send(app, get("/api/calendar/upcoming")).await;
    assert_eq!(body[0]["status"], "published");
}

#[tokio::test]
async fn test_status_update_unknown_title_404() {
    let (status, body) = send(
        app(Arc::new(ScriptedClient::new())),
        json_request(
            "PUT",
            "/api/calendar/status",
            json!({"title": "Nope", "status": "published"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["updated"], false);
}

#[tokio::test]
async fn test_plan_zero_posts_per_week_rejected() {
    let client = Arc::new(ScriptedClient::new());

    let (status, body) = send(
        app(client.clone()),
        json_request(
            "POST",
            "/api/calendar/plan",
            json!({"niche": "gardening", "posts_per_week": 0}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Content planning failed:")
    );
    assert!(client.requests().await.is_empty());
}

#[tokio::test]
async fn test_plan_model_failure_maps_to_500() {
    let client = Arc::new(ScriptedClient::new());
    client.push_text("not json").await;

    let (status, body) = send(
        app(client),
        json_request("POST", "/api/calendar/plan", json!({"niche": "gardening"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Content planning failed: Failed to parse research results")
    );
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/content/generate")
        .header(header::ORIGIN, "http://localhost:5000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app(Arc::new(ScriptedClient::new()))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5000"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );
}
