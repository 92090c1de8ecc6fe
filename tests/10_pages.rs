mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::{assert_redirect, body_text, set_cookie_value, TestApp, BROKEN_SUBJECT, GONE_SUBJECT};

#[tokio::test]
async fn index_is_public() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app.get("/", None).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await?.contains("Personal Digital Journal"));

    Ok(())
}

#[tokio::test]
async fn index_greets_signed_in_user() -> Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.session_cookie("u1");

    let res = app.get("/", Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await?.contains("User u1"));

    Ok(())
}

#[tokio::test]
async fn not_found_page_answers_404() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app.get("/404", None).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(body_text(res).await?.contains("Page not found"));

    Ok(())
}

#[tokio::test]
async fn unknown_paths_redirect_to_404() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app.get("/no/such/page", None).await?;
    assert_redirect(&res, "/404");

    Ok(())
}

#[tokio::test]
async fn forged_session_is_treated_as_anonymous() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app.get("/", Some("oidc_token=not-a-jwt")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(!body_text(res).await?.contains("Log out"));

    Ok(())
}

#[tokio::test]
async fn directory_failure_is_bad_gateway() -> Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.session_cookie(BROKEN_SUBJECT);

    let res = app.get("/", Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    Ok(())
}

#[tokio::test]
async fn subject_missing_from_directory_is_anonymous() -> Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.session_cookie(GONE_SUBJECT);

    let res = app.get("/", Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(!body_text(res).await?.contains("Log out"));

    let res = app.get("/journals", Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(set_cookie_value(&res, "oidc_nonce").is_some());

    Ok(())
}

#[tokio::test]
async fn logout_works_while_directory_is_failing() -> Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.session_cookie(BROKEN_SUBJECT);

    let res = app.get("/logout", Some(&cookie)).await?;
    assert_redirect(&res, "/");
    assert_eq!(set_cookie_value(&res, &app.config.oidc.cookie_name).as_deref(), Some(""));

    Ok(())
}

#[tokio::test]
async fn callback_and_health_skip_directory_lookup() -> Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.session_cookie(BROKEN_SUBJECT);

    let res = app.get("/oidc/callback?state=abc", Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.get("/health", Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn health_reports_database_ok() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app.get("/health", None).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_text(res).await?)?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");

    Ok(())
}
