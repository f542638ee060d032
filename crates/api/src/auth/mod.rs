//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- HS256 JWT generation and validation.

pub mod jwt;
pub mod password;
