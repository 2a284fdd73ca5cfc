pub mod content;
pub mod errors;
pub mod room;
pub mod updates;
pub mod user;

// Re-export all types
pub use content::*;
pub use errors::*;
pub use room::*;
pub use updates::*;
pub use user::*;
