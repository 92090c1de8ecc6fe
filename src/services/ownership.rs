use crate::database::{DatabaseError, Repository};

/// Which table an identifier passed to [`check_user`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Journal,
    Entry,
}

/// Decide whether `subject` is denied access to the journal or entry `ident`.
///
/// Returns `true` when denied. Entries are judged solely by the owner of
/// their parent journal. Unknown identifiers are denied, so callers can
/// answer "missing" and "not yours" identically.
///
/// With no subject at all the check does NOT deny. Every route that calls
/// this sits behind the login gate; a new caller without it would be open.
pub async fn check_user(
    repo: &Repository,
    subject: Option<&str>,
    ident: &str,
    kind: ResourceKind,
) -> Result<bool, DatabaseError> {
    let Some(subject) = subject else {
        tracing::warn!(ident, ?kind, "Ownership check reached without a subject");
        return Ok(false);
    };

    let journal = match kind {
        ResourceKind::Journal => repo.get_journal(ident).await?,
        ResourceKind::Entry => match repo.get_entry(ident).await? {
            Some(entry) => repo.get_journal(&entry.journal_id).await?,
            None => None,
        },
    };

    let denied = match journal {
        Some(journal) => journal.user != subject,
        None => true,
    };

    if denied {
        tracing::debug!(ident, ?kind, subject, "Ownership check denied");
    }
    Ok(denied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_repository;

    #[tokio::test]
    async fn owner_is_allowed_and_others_denied() {
        let repo = memory_repository().await;
        let trip = repo.create_journal("Trip", Some("Summer"), "u1").await.unwrap();

        let fetched = repo.get_journal(&trip.id).await.unwrap().unwrap();
        assert_eq!((fetched.name.as_str(), fetched.desc.as_deref(), fetched.user.as_str()), ("Trip", Some("Summer"), "u1"));

        assert!(!check_user(&repo, Some("u1"), &trip.id, ResourceKind::Journal).await.unwrap());
        assert!(check_user(&repo, Some("u2"), &trip.id, ResourceKind::Journal).await.unwrap());
    }

    #[tokio::test]
    async fn entry_follows_its_journal() {
        let repo = memory_repository().await;
        let journal = repo.create_journal("Notes", None, "u1").await.unwrap();
        let entry = repo.create_entry(&journal.id, Some("Head 1"), "Oh man 0").await.unwrap();

        for subject in ["u1", "u2", "U1", ""] {
            let journal_denied = check_user(&repo, Some(subject), &journal.id, ResourceKind::Journal).await.unwrap();
            let entry_denied = check_user(&repo, Some(subject), &entry.id, ResourceKind::Entry).await.unwrap();
            assert_eq!(journal_denied, entry_denied, "subject {subject:?}");
        }
    }

    #[tokio::test]
    async fn unknown_identifiers_are_denied() {
        let repo = memory_repository().await;
        let journal = repo.create_journal("Notes", None, "u1").await.unwrap();

        assert!(check_user(&repo, Some("u1"), "does-not-exist", ResourceKind::Journal).await.unwrap());
        assert!(check_user(&repo, Some("u1"), "does-not-exist", ResourceKind::Entry).await.unwrap());
        // A journal id is not an entry id
        assert!(check_user(&repo, Some("u1"), &journal.id, ResourceKind::Entry).await.unwrap());
    }

    #[tokio::test]
    async fn missing_subject_is_not_denied() {
        let repo = memory_repository().await;
        let journal = repo.create_journal("Notes", None, "u1").await.unwrap();

        assert!(!check_user(&repo, None, &journal.id, ResourceKind::Journal).await.unwrap());
        assert!(!check_user(&repo, None, "does-not-exist", ResourceKind::Entry).await.unwrap());
    }
}
