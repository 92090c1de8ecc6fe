use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};

use super::forms::NewJournalForm;
use super::subject;
use crate::api::format::{entry_views, journal_views, JournalView};
use crate::error::{ApiError, FieldErrors};
use crate::middleware::Identity;
use crate::pages;
use crate::services::{check_user, ResourceKind};
use crate::state::AppState;

const NEW_JOURNAL_PATH: &str = "/newjournal";

/// GET /dashboard
pub async fn dashboard(Extension(identity): Extension<Identity>) -> Result<Html<String>, ApiError> {
    let name = identity
        .display_name()
        .ok_or_else(|| ApiError::unauthorized("Login required"))?;
    Ok(Html(pages::dashboard(name)))
}

/// GET /journals - journals owned by the current subject
pub async fn journals(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Html<String>, ApiError> {
    let owner = subject(&identity)?;
    let journals = state.repo.get_journals(owner).await?;

    Ok(Html(pages::journals(identity.display_name(), &journal_views(&journals))))
}

/// GET /journal/:ident - a journal and its entries
pub async fn journal(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(ident): Path<String>,
) -> Result<Html<String>, ApiError> {
    if check_user(&state.repo, identity.subject(), &ident, ResourceKind::Journal).await? {
        return Err(ApiError::not_found("Journal not found"));
    }

    let journal = state
        .repo
        .get_journal(&ident)
        .await?
        .ok_or_else(|| ApiError::not_found("Journal not found"))?;
    let entries = state.repo.get_entries(&ident).await?;

    Ok(Html(pages::journal(
        identity.display_name(),
        &JournalView::from(&journal),
        &entry_views(&entries),
    )))
}

/// GET /newjournal
pub async fn new_journal_form(Extension(identity): Extension<Identity>) -> Html<String> {
    Html(pages::form(identity.display_name(), NEW_JOURNAL_PATH, "Journal", &FieldErrors::new()))
}

/// POST /newjournal - create a journal owned by the current subject
pub async fn new_journal(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    form: Result<Form<NewJournalForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let owner = subject(&identity)?;
    let Form(form) = form.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let new_journal = match form.validate() {
        Ok(valid) => valid,
        Err(field_errors) => {
            let page = pages::form(identity.display_name(), NEW_JOURNAL_PATH, "Journal", &field_errors);
            return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
        }
    };

    let journal = state
        .repo
        .create_journal(&new_journal.name, new_journal.desc.as_deref(), owner)
        .await?;

    tracing::info!(journal_id = %journal.id, owner, "Journal created");
    Ok(Redirect::to(&format!("/journal/{}", journal.id)).into_response())
}
