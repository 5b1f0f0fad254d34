//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the `User` aggregate, its value objects and validation rules, the password
//! hashing port and the error taxonomy shared by every layer.

pub mod constants;
pub mod error;
pub mod password;
pub mod user;
pub mod validate;
pub mod values;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::{Argon2Hasher, PasswordHasher};
pub use user::{User, UserResponse};
pub use validate::{validate_email, validate_name, validate_password};
pub use values::{Email, Name, Password, PasswordHash};
