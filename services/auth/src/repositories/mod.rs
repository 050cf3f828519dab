//! Storage adapters

pub mod memory;
pub mod todo;
pub mod user;

pub use memory::MemoryStore;
pub use todo::TodoRepository;
pub use user::UserRepository;
