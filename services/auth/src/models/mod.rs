//! Authentication service models

pub mod session;
pub mod todo;
pub mod user;

// Re-export for convenience
pub use session::{Claims, Session};
pub use todo::TodoId;
pub use user::{NewUser, User, UserId, UserRecord};
