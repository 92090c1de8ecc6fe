pub mod auth;
pub mod require_login;

pub use auth::{auth_gate, CurrentUser, Identity};
pub use require_login::{login_challenge, require_login};
