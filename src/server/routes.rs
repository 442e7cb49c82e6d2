//! Route definitions.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post, put},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::handlers;
use super::state::AppState;

/// CORS for the configured origins, with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Creates the Axum router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.server.cors_origins);

    let content = Router::new()
        .route("/generate", post(handlers::generate_content))
        .route("/health", get(handlers::content_health));

    let calendar = Router::new()
        .route("/plan", post(handlers::plan_calendar))
        .route("/upcoming", get(handlers::upcoming))
        .route("/status", put(handlers::update_status));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/-/health", get(handlers::liveness))
        .nest("/api/content", content)
        .nest("/api/calendar", calendar)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_skips_invalid_origins() {
        // construction must not panic with credentials + explicit lists
        let _ = cors_layer(&[
            "http://localhost:5000".to_string(),
            "bad\norigin".to_string(),
        ]);
    }
}
