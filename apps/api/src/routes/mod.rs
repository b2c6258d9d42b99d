pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

/// Converts the configured megabytes to bytes, capping at `usize::MAX`.
fn upload_limit_bytes(max_upload_mb: usize) -> usize {
    max_upload_mb.saturating_mul(1024 * 1024)
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = upload_limit_bytes(state.config.max_upload_mb);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route(
            "/api/v1/session/start",
            post(handlers::handle_start).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/v1/session/answers",
            post(handlers::handle_submit_answers),
        )
        .route(
            "/api/v1/session/answers/:index",
            put(handlers::handle_record_answer),
        )
        .route(
            "/api/v1/session/report",
            get(handlers::handle_download_report),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm_client::testing::ScriptedClient;

    #[test]
    fn test_upload_limit_converts_megabytes() {
        assert_eq!(upload_limit_bytes(200), 200 * 1024 * 1024);
        assert_eq!(upload_limit_bytes(0), 0);
    }

    #[test]
    fn test_huge_upload_limit_saturates() {
        assert_eq!(upload_limit_bytes(usize::MAX), usize::MAX);
        assert_eq!(upload_limit_bytes(usize::MAX / 1024), usize::MAX);
    }

    #[test]
    fn test_router_builds_with_huge_upload_limit() {
        let config = Config {
            google_api_key: None,
            gemini_api_url: "http://127.0.0.1:1".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            max_upload_mb: usize::MAX,
        };
        let _router = build_router(AppState::new(config, ScriptedClient::replying(&[])));
    }
}
