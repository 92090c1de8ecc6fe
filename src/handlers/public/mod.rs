// handlers/public - reachable without a session
pub mod auth;
pub mod pages;

pub use auth::{logout, oidc_callback};
pub use pages::{fallback, health, index, page_not_found};
