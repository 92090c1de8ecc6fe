use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Cookie holding the nonce that binds a login challenge to this browser
pub const NONCE_COOKIE: &str = "oidc_nonce";

/// HttpOnly, same-site cookie scoped to the whole app
pub fn app_cookie(name: &str, value: &str, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), value.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

/// Cookie to pass to `CookieJar::remove`; the path must match the one it was set with
pub fn removal(name: &str) -> Cookie<'static> {
    Cookie::build(name.to_string()).path("/").build()
}
