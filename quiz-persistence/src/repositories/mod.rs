pub mod content_repository;
pub mod room_repository;
pub mod user_repository;

pub use content_repository::ContentRepository;
pub use room_repository::RoomRegistry;
pub use user_repository::UserRepository;
