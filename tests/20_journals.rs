mod common;

use anyhow::{Context, Result};
use axum::http::StatusCode;

use common::{assert_redirect, body_text, location, TestApp};

/// Create a journal through the form and return its id
async fn create_journal(app: &TestApp, cookie: &str, form: &str) -> Result<String> {
    let res = app.post_form("/newjournal", Some(cookie), form).await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let to = location(&res).context("missing location")?;
    let id = to.strip_prefix("/journal/").context("unexpected redirect")?;
    Ok(id.to_string())
}

#[tokio::test]
async fn journal_and_entry_round_trip_through_forms() -> Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.session_cookie("u1");

    let journal_id = create_journal(&app, &cookie, "title=Trip&body_text=Summer+2024").await?;

    let res = app.get("/journals", Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await?;
    assert!(html.contains("Trip"));
    assert!(html.contains(&format!("/journal/{}", journal_id)));

    let res = app
        .post_form(
            &format!("/newentry/{}", journal_id),
            Some(&cookie),
            "title=Day+1&body_text=Arrived+%3Cafe%3E",
        )
        .await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let entry_path = location(&res).context("missing location")?;
    assert!(entry_path.starts_with("/entry/"));

    let res = app.get(&entry_path, Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await?;
    assert!(html.contains("Day 1"));
    assert!(html.contains("Arrived &lt;afe&gt;"));
    assert!(html.contains(&format!("/journal/{}", journal_id)));

    let res = app.get(&format!("/journal/{}", journal_id), Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await?;
    assert!(html.contains("Summer 2024"));
    assert!(html.contains(&entry_path));

    Ok(())
}

#[tokio::test]
async fn journals_list_only_the_owners_journals() -> Result<()> {
    let app = TestApp::new().await?;
    let u1 = app.session_cookie("u1");
    let u2 = app.session_cookie("u2");

    create_journal(&app, &u1, "title=Mine").await?;
    create_journal(&app, &u2, "title=Theirs").await?;

    let html = body_text(app.get("/journals", Some(&u1)).await?).await?;
    assert!(html.contains("Mine"));
    assert!(!html.contains("Theirs"));

    Ok(())
}

#[tokio::test]
async fn other_users_cannot_see_or_extend_a_journal() -> Result<()> {
    let app = TestApp::new().await?;
    let u1 = app.session_cookie("u1");
    let u2 = app.session_cookie("u2");

    let journal_id = create_journal(&app, &u1, "title=Trip").await?;
    let entry = app.repo.create_entry(&journal_id, None, "private").await?;

    let res = app.get(&format!("/journal/{}", journal_id), Some(&u2)).await?;
    assert_redirect(&res, "/404");

    let res = app.get(&format!("/entry/{}", entry.id), Some(&u2)).await?;
    assert_redirect(&res, "/404");

    let res = app.get(&format!("/newentry/{}", journal_id), Some(&u2)).await?;
    assert_redirect(&res, "/404");

    let res = app
        .post_form(&format!("/newentry/{}", journal_id), Some(&u2), "body_text=sneaky")
        .await?;
    assert_redirect(&res, "/404");
    assert_eq!(app.repo.get_entries(&journal_id).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn missing_resources_redirect_to_404() -> Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.session_cookie("u1");

    assert_redirect(&app.get("/journal/does-not-exist", Some(&cookie)).await?, "/404");
    assert_redirect(&app.get("/entry/does-not-exist", Some(&cookie)).await?, "/404");
    assert_redirect(
        &app.post_form("/newentry/does-not-exist", Some(&cookie), "body_text=x").await?,
        "/404",
    );

    Ok(())
}

#[tokio::test]
async fn blank_journal_title_rerenders_form_with_400() -> Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.session_cookie("u1");

    let res = app.post_form("/newjournal", Some(&cookie), "title=++&body_text=x").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let html = body_text(res).await?;
    assert!(html.contains("title: is required"));
    assert!(app.repo.get_journals("u1").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn blank_entry_body_is_rejected() -> Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.session_cookie("u1");
    let journal_id = create_journal(&app, &cookie, "title=Trip").await?;

    let res = app
        .post_form(&format!("/newentry/{}", journal_id), Some(&cookie), "title=Empty&body_text=")
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(app.repo.get_entries(&journal_id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn malformed_form_body_is_bad_request() -> Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.session_cookie("u1");

    let res = app.post_form("/newjournal", Some(&cookie), "body_text=no-title").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn dashboard_greets_by_directory_name() -> Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.session_cookie("u1");

    let res = app.get("/dashboard", Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await?.contains("Welcome, User u1"));

    Ok(())
}
