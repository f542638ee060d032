//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in
//! `0001_create_users.sql`.

pub const ROLE_CLIENT: &str = "client";
pub const ROLE_OWNER: &str = "owner";
pub const ROLE_ADMIN: &str = "admin";
