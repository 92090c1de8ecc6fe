// handlers/mod.rs - two security tiers
//
// Public (no login) -> Protected (login challenge enforced by `require_login`)
pub mod public;
pub mod protected;
