use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect},
    Extension,
};
use serde_json::json;

use crate::database::DatabaseManager;
use crate::error::NOT_FOUND_PATH;
use crate::middleware::Identity;
use crate::pages;
use crate::state::AppState;

/// GET / - landing page
pub async fn index(Extension(identity): Extension<Identity>) -> Html<String> {
    Html(pages::index(identity.display_name()))
}

/// GET /404 - the only route that answers with status 404
pub async fn page_not_found(Extension(identity): Extension<Identity>) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(pages::not_found(identity.display_name())))
}

/// Any unmatched route
pub async fn fallback() -> Redirect {
    Redirect::to(NOT_FOUND_PATH)
}

/// GET /health - database liveness probe
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(state.repo.pool()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
