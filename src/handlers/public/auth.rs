use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::auth::{self, cookie};
use crate::error::ApiError;
use crate::state::AppState;

/// Where a completed login lands when the remembered path is unusable
pub const DEFAULT_DESTINATION: &str = "/dashboard";

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// GET {callback route} - finish the authorization-code flow.
///
/// Checks the signed `state` against the nonce cookie, trades the code for
/// the subject's claims, stores the session cookie and returns the browser
/// to the page that triggered the login.
pub async fn oidc_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    if let Some(error) = query.error {
        tracing::warn!(error = %error, description = ?query.error_description, "Identity provider refused login");
        return Err(ApiError::unauthorized("Login was cancelled or refused"));
    }

    let (Some(code), Some(raw_state)) = (query.code, query.state) else {
        return Err(ApiError::bad_request("Missing code or state"));
    };

    let secret = &state.config.security.secret_key;
    let login_state = auth::verify_login_state(&raw_state, secret)?;

    let nonce = jar.get(cookie::NONCE_COOKIE).map(|c| c.value());
    if nonce != Some(login_state.nonce.as_str()) {
        tracing::warn!("Login state nonce does not match this browser");
        return Err(ApiError::unauthorized("Login could not be completed"));
    }

    let claims = state.provider.exchange_code(&code).await?;
    let expiry_hours = auth::session_hours(state.config.security.session_expiry_hours);
    let session = auth::issue_session(&claims.sub, secret, expiry_hours)?;

    let oidc = &state.config.oidc;
    let session_cookie = cookie::app_cookie(
        &oidc.cookie_name,
        &session,
        time::Duration::hours(expiry_hours as i64),
        oidc.cookie_secure,
    );
    let jar = jar.add(session_cookie).remove(cookie::removal(cookie::NONCE_COOKIE));

    tracing::info!(subject = %claims.sub, "Login completed");
    Ok((jar, Redirect::to(safe_destination(&login_state.next))).into_response())
}

/// GET /logout - drop the local session and go home
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let jar = jar.remove(cookie::removal(&state.config.oidc.cookie_name));
    (jar, Redirect::to("/")).into_response()
}

/// Only same-site absolute paths are followed after login
fn safe_destination(next: &str) -> &str {
    let local = next.starts_with('/') && !next.starts_with("//") && !next.starts_with("/\\");
    if local {
        next
    } else {
        DEFAULT_DESTINATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_local_paths_only() {
        assert_eq!(safe_destination("/journal/abc?x=1"), "/journal/abc?x=1");
        assert_eq!(safe_destination("//evil.example.com"), DEFAULT_DESTINATION);
        assert_eq!(safe_destination("/\\evil.example.com"), DEFAULT_DESTINATION);
        assert_eq!(safe_destination("https://evil.example.com"), DEFAULT_DESTINATION);
        assert_eq!(safe_destination(""), DEFAULT_DESTINATION);
    }
}
