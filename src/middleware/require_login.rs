use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use time::Duration;
use uuid::Uuid;

use super::auth::Identity;
use crate::auth::{self, cookie, LoginState, LOGIN_STATE_TTL_MINUTES};
use crate::error::ApiError;
use crate::state::AppState;

/// Gate for protected routes. Anonymous requests are sent through the login
/// challenge and never reach the handler.
pub async fn require_login(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authenticated = request
        .extensions()
        .get::<Identity>()
        .is_some_and(Identity::is_authenticated);

    if authenticated {
        return next.run(request).await;
    }

    let destination = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    login_challenge(&state, &destination).unwrap_or_else(|err| err.into_response())
}

/// Redirect to the identity provider with a signed `state` that remembers
/// `destination`, binding it to this browser with a nonce cookie.
pub fn login_challenge(state: &AppState, destination: &str) -> Result<Response, ApiError> {
    let nonce = Uuid::new_v4().simple().to_string();
    let login_state = LoginState::new(destination, nonce.as_str());
    let signed = auth::issue_login_state(&login_state, &state.config.security.secret_key)?;

    let location = state.provider.authorization_url(&signed);

    let jar = CookieJar::new().add(cookie::app_cookie(
        cookie::NONCE_COOKIE,
        &nonce,
        Duration::minutes(LOGIN_STATE_TTL_MINUTES),
        state.config.oidc.cookie_secure,
    ));

    tracing::debug!(destination, "Starting login challenge");
    Ok((jar, Redirect::to(location.as_str())).into_response())
}
