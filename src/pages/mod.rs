// Server-rendered HTML pages

use axum::http::StatusCode;
use std::fmt::Write;

use crate::api::format::{EntryView, JournalView};
use crate::error::FieldErrors;

/// Escape text for use in HTML element content and quoted attributes
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap page content in the shared document shell.
/// `user` is the signed-in user's display name, if any.
fn layout(title: &str, user: Option<&str>, content: &str) -> String {
    let nav = match user {
        Some(name) => format!(
            r#"<a href="/dashboard">Dashboard</a> <a href="/journals">Journals</a> <span class="user">{}</span> <a href="/logout">Log out</a>"#,
            escape(name)
        ),
        None => r#"<a href="/login">Log in</a>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} - PDA</title></head>
<body>
<nav><a href="/">PDA</a> {nav}</nav>
<main>
{content}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn index(user: Option<&str>) -> String {
    layout(
        "Home",
        user,
        "<h1>Personal Digital Journal</h1>\n<p>Keep your journals and entries in one private place.</p>",
    )
}

pub fn dashboard(user: &str) -> String {
    let content = format!(
        r#"<h1>Welcome, {}</h1>
<ul>
<li><a href="/journals">Your journals</a></li>
<li><a href="/newjournal">Start a new journal</a></li>
</ul>"#,
        escape(user)
    );
    layout("Dashboard", Some(user), &content)
}

pub fn journals(user: Option<&str>, journals: &[JournalView]) -> String {
    let mut content = String::from("<h1>Journals</h1>\n<ul class=\"journals\">\n");
    for journal in journals {
        let _ = writeln!(
            content,
            r#"<li><a href="/journal/{}">{}</a> <span class="desc">{}</span></li>"#,
            escape(&journal.link),
            escape(&journal.name),
            escape(journal.desc.as_deref().unwrap_or_default()),
        );
    }
    content.push_str("</ul>\n<p><a href=\"/newjournal\">New journal</a></p>");
    layout("Journals", user, &content)
}

pub fn journal(user: Option<&str>, journal: &JournalView, entries: &[EntryView]) -> String {
    let mut content = format!(
        "<h1>{}</h1>\n<p class=\"desc\">{}</p>\n<ul class=\"entries\">\n",
        escape(&journal.name),
        escape(journal.desc.as_deref().unwrap_or_default()),
    );
    for entry in entries {
        let _ = writeln!(
            content,
            r#"<li><a href="/entry/{}">{}</a> <time>{}</time></li>"#,
            escape(&entry.link),
            escape(entry.title.as_deref().unwrap_or("Untitled")),
            escape(&entry.date),
        );
    }
    let _ = write!(
        content,
        "</ul>\n<p><a href=\"/newentry/{}\">New entry</a></p>",
        escape(&journal.link)
    );
    layout(&journal.name, user, &content)
}

pub fn entry(user: Option<&str>, entry: &EntryView) -> String {
    let title = entry.title.as_deref().unwrap_or("Untitled");
    let content = format!(
        r#"<h1>{}</h1>
<time>{}</time>
<article>{}</article>
<p><a href="/journal/{}">Back to journal</a></p>"#,
        escape(title),
        escape(&entry.date),
        escape(&entry.body),
        escape(&entry.jid),
    );
    layout(title, user, &content)
}

/// Creation form shared by journals and entries; both post `title` and `body_text`
pub fn form(user: Option<&str>, url: &str, data_type: &str, field_errors: &FieldErrors) -> String {
    let mut content = format!("<h1>New {}</h1>\n", escape(data_type));
    content.push_str(&error_list(field_errors));
    let _ = write!(
        content,
        r#"<form method="post" action="{}">
<label>Title <input type="text" name="title" maxlength="80"></label>
<label>Text <textarea name="body_text"></textarea></label>
<button type="submit">Create {}</button>
</form>"#,
        escape(url),
        escape(data_type),
    );
    layout(&format!("New {}", data_type), user, &content)
}

pub fn not_found(user: Option<&str>) -> String {
    layout(
        "Not found",
        user,
        "<h1>Page not found</h1>\n<p>That page does not exist. <a href=\"/\">Go home</a>.</p>",
    )
}

pub fn error_page(status: StatusCode, message: &str, field_errors: &FieldErrors) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let content = format!(
        "<h1>{}</h1>\n<p>{}</p>\n{}",
        escape(title),
        escape(message),
        error_list(field_errors)
    );
    layout(title, None, &content)
}

fn error_list(field_errors: &FieldErrors) -> String {
    if field_errors.is_empty() {
        return String::new();
    }
    let mut list = String::from("<ul class=\"errors\">\n");
    for (field, message) in field_errors {
        let _ = writeln!(list, "<li>{}: {}</li>", escape(field), escape(message));
    }
    list.push_str("</ul>\n");
    list
}
