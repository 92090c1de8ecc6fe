use axum::response::Redirect;

/// GET /login - the login gate has already run; land on the dashboard
pub async fn login() -> Redirect {
    Redirect::to("/dashboard")
}
