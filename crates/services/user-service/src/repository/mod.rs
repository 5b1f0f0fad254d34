//! Repository layer for data access.

mod db_error;
pub mod entities;
mod memory;
mod user_repository;

pub use db_error::{classify_sqlstate, translate_db_error};
pub use memory::InMemoryUserRepository;
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
