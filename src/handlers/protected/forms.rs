// Typed bodies for the creation forms. Both forms post `title` and `body_text`.

use serde::Deserialize;

use crate::error::FieldErrors;

pub const MAX_TITLE_LEN: usize = 80;
pub const MAX_DESC_LEN: usize = 280;

#[derive(Debug, Clone, Deserialize)]
pub struct NewJournalForm {
    pub title: String,
    #[serde(default)]
    pub body_text: String,
}

/// A journal submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournal {
    pub name: String,
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEntryForm {
    #[serde(default)]
    pub title: String,
    pub body_text: String,
}

/// An entry submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub title: Option<String>,
    pub body: String,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn check_len(errors: &mut FieldErrors, field: &'static str, value: Option<&str>, max: usize) {
    if value.is_some_and(|v| v.chars().count() > max) {
        errors.insert(field, format!("must be at most {} characters", max));
    }
}

impl NewJournalForm {
    pub fn validate(&self) -> Result<NewJournal, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = non_empty(&self.title);
        if name.is_none() {
            errors.insert("title", "is required".to_string());
        }
        check_len(&mut errors, "title", name.as_deref(), MAX_TITLE_LEN);

        let desc = non_empty(&self.body_text);
        check_len(&mut errors, "body_text", desc.as_deref(), MAX_DESC_LEN);

        match name {
            Some(name) if errors.is_empty() => Ok(NewJournal { name, desc }),
            _ => Err(errors),
        }
    }
}

impl NewEntryForm {
    pub fn validate(&self) -> Result<NewEntry, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = non_empty(&self.title);
        check_len(&mut errors, "title", title.as_deref(), MAX_TITLE_LEN);

        // Body text is kept verbatim; only an all-blank body is refused
        if self.body_text.trim().is_empty() {
            errors.insert("body_text", "is required".to_string());
        }

        if errors.is_empty() {
            Ok(NewEntry {
                title,
                body: self.body_text.clone(),
            })
        } else {
            Err(errors)
        }
    }
}
