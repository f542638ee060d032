pub mod blocked_date;
pub mod booking;
pub mod conversation;
pub mod message;
pub mod property;
pub mod user;
