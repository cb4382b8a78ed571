//! Roles service models

pub mod role;
pub mod user;

// Re-export for convenience
pub use role::{CustomRole, NewCustomRole, UpdateCustomRole};
pub use user::{LegacyRole, NewUser, UnknownRole, User};
