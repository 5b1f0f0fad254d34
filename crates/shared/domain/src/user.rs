//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::password::PasswordHasher;
use crate::validate::{validate_email, validate_name, validate_password};
use crate::values::{Email, Name, Password, PasswordHash};

/// User aggregate root
#[derive(Debug, Clone)]
pub struct User {
    id: Uuid,
    email: Email,
    name: Name,
    password_hash: PasswordHash,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id and timestamps
    pub fn new(email: Email, name: Name, password_hash: PasswordHash) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from persisted fields
    pub fn restore(
        id: Uuid,
        email: Email,
        name: Name,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Check the aggregate invariants.
    ///
    /// The password is validated as plaintext before hashing; here only the
    /// presence of a stored hash is checked.
    pub fn validate(&self) -> DomainResult<()> {
        validate_email(&self.email)?;
        validate_name(&self.name)?;
        if self.password_hash.is_empty() {
            return Err(DomainError::InvalidPassword);
        }
        Ok(())
    }

    /// Update user's name. Left unchanged on validation failure.
    pub fn update_name(&mut self, name: Name) -> DomainResult<()> {
        validate_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    /// Update user's email. Left unchanged on validation failure.
    pub fn update_email(&mut self, email: Email) -> DomainResult<()> {
        validate_email(&email)?;
        self.email = email;
        self.touch();
        Ok(())
    }

    /// Replace the password with a hash of `password`.
    ///
    /// Nothing changes if validation or hashing fails.
    pub fn update_password(
        &mut self,
        password: &Password,
        hasher: &dyn PasswordHasher,
    ) -> DomainResult<()> {
        validate_password(password)?;
        self.password_hash = hasher.hash(password)?;
        self.touch();
        Ok(())
    }

    /// Store-assigned timestamps after an insert.
    pub fn set_timestamps(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = updated_at;
    }

    /// Store-assigned modification time after an update.
    pub fn set_updated_at(&mut self, updated_at: DateTime<Utc>) {
        self.updated_at = updated_at;
    }

    fn touch(&mut self) {
        let now = Utc::now();
        // Keep updated_at monotonic even if the clock steps backwards
        self.updated_at = if now > self.updated_at { now } else { self.updated_at };
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Unique user identifier
    #[cfg_attr(feature = "openapi", schema(example = "550e8400-e29b-41d4-a716-446655440000"))]
    pub id: Uuid,
    /// User email address
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "user@example.com"))]
    pub email: Email,
    /// User display name
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "John Doe"))]
    pub name: Name,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
