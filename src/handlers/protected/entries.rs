use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};

use super::forms::NewEntryForm;
use crate::api::format::EntryView;
use crate::error::{ApiError, FieldErrors};
use crate::middleware::Identity;
use crate::pages;
use crate::services::{check_user, ResourceKind};
use crate::state::AppState;

fn new_entry_path(journal_id: &str) -> String {
    format!("/newentry/{}", journal_id)
}

/// GET /entry/:ident
pub async fn entry(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(ident): Path<String>,
) -> Result<Html<String>, ApiError> {
    if check_user(&state.repo, identity.subject(), &ident, ResourceKind::Entry).await? {
        return Err(ApiError::not_found("Entry not found"));
    }

    let entry = state
        .repo
        .get_entry(&ident)
        .await?
        .ok_or_else(|| ApiError::not_found("Entry not found"))?;

    Ok(Html(pages::entry(identity.display_name(), &EntryView::from(&entry))))
}

/// GET /newentry/:ident - form for a new entry in journal `ident`
pub async fn new_entry_form(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(ident): Path<String>,
) -> Result<Html<String>, ApiError> {
    if check_user(&state.repo, identity.subject(), &ident, ResourceKind::Journal).await? {
        return Err(ApiError::not_found("Journal not found"));
    }

    Ok(Html(pages::form(
        identity.display_name(),
        &new_entry_path(&ident),
        "Entry",
        &FieldErrors::new(),
    )))
}

/// POST /newentry/:ident - create an entry under journal `ident`.
///
/// The ownership check also proves the journal exists; the foreign key
/// covers a journal vanishing in between.
pub async fn new_entry(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(ident): Path<String>,
    form: Result<Form<NewEntryForm>, FormRejection>,
) -> Result<Response, ApiError> {
    if check_user(&state.repo, identity.subject(), &ident, ResourceKind::Journal).await? {
        return Err(ApiError::not_found("Journal not found"));
    }

    let Form(form) = form.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let new_entry = match form.validate() {
        Ok(valid) => valid,
        Err(field_errors) => {
            let page = pages::form(identity.display_name(), &new_entry_path(&ident), "Entry", &field_errors);
            return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
        }
    };

    let entry = state
        .repo
        .create_entry(&ident, new_entry.title.as_deref(), &new_entry.body)
        .await?;

    tracing::info!(entry_id = %entry.id, journal_id = %ident, "Entry created");
    Ok(Redirect::to(&format!("/entry/{}", entry.id)).into_response())
}
