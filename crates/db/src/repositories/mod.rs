pub mod blocked_date_repo;
pub mod booking_repo;
pub mod conversation_repo;
pub mod message_repo;
pub mod property_repo;
pub mod user_repo;

pub use blocked_date_repo::BlockedDateRepo;
pub use booking_repo::BookingRepo;
pub use conversation_repo::ConversationRepo;
pub use message_repo::MessageRepo;
pub use property_repo::PropertyRepo;
pub use user_repo::UserRepo;
