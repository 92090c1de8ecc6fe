// handlers/protected - every route here sits behind `require_login`,
// so handlers may rely on an authenticated `Identity`.
pub mod entries;
pub mod forms;
pub mod journals;
pub mod session;

pub use entries::{entry, new_entry, new_entry_form};
pub use journals::{dashboard, journal, journals, new_journal, new_journal_form};
pub use session::login;

use crate::error::ApiError;
use crate::middleware::Identity;

/// Subject of a request that passed the login gate
pub(crate) fn subject(identity: &Identity) -> Result<&str, ApiError> {
    identity
        .subject()
        .ok_or_else(|| ApiError::unauthorized("Login required"))
}
