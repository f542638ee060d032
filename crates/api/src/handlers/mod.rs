//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the repositories in `sejour_db` and map errors via
//! [`crate::error::AppError`]. Side effects that must not fail the request
//! (cache invalidation, system messages) go through `sejour_cache` and
//! [`crate::notify`].

pub mod auth;
pub mod availability;
pub mod booking;
pub mod chat;
pub mod image;
pub mod property;
