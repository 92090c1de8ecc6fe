use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth;
use crate::directory::{DirectoryError, DirectoryUser};
use crate::error::ApiError;
use crate::state::AppState;

/// A signed-in subject and their directory record
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub subject: String,
    pub user: DirectoryUser,
}

/// Request-scoped identity resolved by [`auth_gate`]. Anonymous when `current` is `None`.
#[derive(Clone, Debug, Default)]
pub struct Identity {
    pub current: Option<CurrentUser>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(subject: impl Into<String>, user: DirectoryUser) -> Self {
        Self {
            current: Some(CurrentUser {
                subject: subject.into(),
                user,
            }),
        }
    }

    pub fn subject(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.subject.as_str())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.user.display_name())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }
}

/// Runs before every request: resolve the session cookie to a directory user
/// and attach the resulting [`Identity`] to the request.
///
/// A missing, expired or forged session is anonymous, as is a subject the
/// directory no longer knows. Any other directory failure for a valid session
/// aborts the request with 502.
pub async fn auth_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let identity = match session_subject(&state, &request) {
        Some(subject) => match state.directory.get_user(&subject).await {
            Ok(user) => Identity::authenticated(subject, user),
            Err(DirectoryError::NotFound(_)) => {
                tracing::warn!(subject = %subject, "Session subject is not in the directory");
                Identity::anonymous()
            }
            Err(err) => return ApiError::from(err).into_response(),
        },
        None => Identity::anonymous(),
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

fn session_subject(state: &AppState, request: &Request) -> Option<String> {
    let jar = CookieJar::from_headers(request.headers());
    let token = jar.get(&state.config.oidc.cookie_name)?.value();
    if token.is_empty() {
        return None;
    }

    match auth::verify_session(token, &state.config.security.secret_key) {
        Ok(claims) => Some(claims.sub),
        Err(err) => {
            tracing::debug!(error = %err, "Ignoring invalid session cookie");
            None
        }
    }
}
