pub mod ownership;

pub use ownership::{check_user, ResourceKind};
