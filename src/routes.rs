use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::error::NOT_FOUND_PATH;
use crate::handlers::{protected, public};
use crate::middleware::{auth_gate, require_login};
use crate::state::AppState;

/// Every fixed path the router serves besides the OIDC callback
pub const APP_PATHS: &[&str] = &[
    "/",
    NOT_FOUND_PATH,
    "/logout",
    "/health",
    "/dashboard",
    "/journals",
    "/journal/:ident",
    "/entry/:ident",
    "/newjournal",
    "/newentry/:ident",
    "/login",
];

/// Full application router.
///
/// Pages sit behind `auth_gate`, which resolves the session to a directory
/// user. Logout, the OIDC callback and the health probe are mounted outside
/// it so they keep working while the directory is failing for a subject.
pub fn app(state: AppState) -> Router {
    let callback_route = state.config.oidc.callback_route.clone();

    Router::new()
        .route("/", get(public::index))
        .route(NOT_FOUND_PATH, get(public::page_not_found))
        .merge(protected_routes(state.clone()))
        .fallback(public::fallback)
        .layer(middleware::from_fn_with_state(state.clone(), auth_gate))
        // No identity resolution
        .route("/logout", get(public::logout))
        .route("/health", get(public::health))
        .route(&callback_route, get(public::oidc_callback))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::*;

    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/journals", get(journals))
        .route("/journal/:ident", get(journal))
        .route("/entry/:ident", get(entry))
        .route("/newjournal", get(new_journal_form).post(new_journal))
        .route("/newentry/:ident", get(new_entry_form).post(new_entry))
        .route("/login", get(login))
        .route_layer(middleware::from_fn_with_state(state, require_login))
}
