use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{Entry, Journal};

/// Fixed, locale-independent rendering of an entry timestamp,
/// e.g. `March 05, 2024 at 3:07 PM`
pub const ENTRY_DATE_FORMAT: &str = "%B %d, %Y at %-I:%M %p";

/// Flat journal mapping consumed by the pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalView {
    pub link: String,
    pub name: String,
    pub desc: Option<String>,
}

/// Flat entry mapping consumed by the pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryView {
    pub title: Option<String>,
    pub body: String,
    pub date: String,
    pub link: String,
    pub jid: String,
}

pub fn format_entry_date(date: &DateTime<Utc>) -> String {
    date.format(ENTRY_DATE_FORMAT).to_string()
}

impl From<&Journal> for JournalView {
    fn from(journal: &Journal) -> Self {
        Self {
            link: journal.id.clone(),
            name: journal.name.clone(),
            desc: journal.desc.clone(),
        }
    }
}

impl From<&Entry> for EntryView {
    fn from(entry: &Entry) -> Self {
        Self {
            title: entry.title.clone(),
            body: entry.body.clone(),
            date: format_entry_date(&entry.date),
            link: entry.id.clone(),
            jid: entry.journal_id.clone(),
        }
    }
}

pub fn journal_views(journals: &[Journal]) -> Vec<JournalView> {
    journals.iter().map(JournalView::from).collect()
}

pub fn entry_views(entries: &[Entry]) -> Vec<EntryView> {
    entries.iter().map(EntryView::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_afternoon_without_hour_padding() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 15, 7, 0).unwrap();
        assert_eq!(format_entry_date(&date), "March 05, 2024 at 3:07 PM");
    }

    #[test]
    fn formats_midnight_and_noon() {
        let midnight = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 59).unwrap();
        assert_eq!(format_entry_date(&midnight), "December 31, 2023 at 12:00 AM");

        let noon = Utc.with_ymd_and_hms(2021, 7, 14, 12, 30, 0).unwrap();
        assert_eq!(format_entry_date(&noon), "July 14, 2021 at 12:30 PM");
    }

    #[test]
    fn entry_view_links_back_to_journal() {
        let entry = Entry {
            id: "e1".to_string(),
            title: None,
            body: "Oh man 0".to_string(),
            date: Utc.with_ymd_and_hms(2020, 1, 2, 9, 5, 0).unwrap(),
            journal_id: "j1".to_string(),
        };

        let view = EntryView::from(&entry);
        assert_eq!(view.link, "e1");
        assert_eq!(view.jid, "j1");
        assert_eq!(view.date, "January 02, 2020 at 9:05 AM");
    }
}
