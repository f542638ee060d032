//! Domain logic for the Séjour booking platform.
//!
//! Pure types and rules with no I/O: the booking state machine and pricing,
//! availability date handling, chat message rules, the error taxonomy, and
//! pagination math. Persistence lives in `sejour-db`, HTTP in `sejour-api`.

pub mod availability;
pub mod booking;
pub mod chat;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod types;
