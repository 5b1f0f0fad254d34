//! Translation of storage failures into domain errors.
//!
//! Postgres SQLSTATE codes are inspected first; SeaORM's backend-neutral
//! `SqlErr` classification is the fallback. Anything unrecognized passes
//! through as `DomainError::Storage` with the original message.

use domain::DomainError;
use sea_orm::{sqlx, DbErr, RuntimeErr, SqlErr};

/// Postgres error codes
pub const PG_UNIQUE_VIOLATION: &str = "23505";
pub const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
pub const PG_NOT_NULL_VIOLATION: &str = "23502";
pub const PG_CHECK_VIOLATION: &str = "23514";
pub const PG_INVALID_TEXT_REPRESENTATION: &str = "22P02";
pub const PG_DATA_EXCEPTION: &str = "22000";

/// Map a SeaORM error to the domain taxonomy.
pub fn translate_db_error(err: DbErr) -> DomainError {
    if let DbErr::RecordNotFound(_) = err {
        return DomainError::NotFound;
    }

    if let Some(db_err) = database_error(&err) {
        let code = db_err.code().unwrap_or_default();
        let constraint = db_err.constraint().unwrap_or_default();
        if let Some(mapped) = classify_sqlstate(&code, constraint, db_err.message()) {
            return mapped;
        }
    }

    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => classify_unique_violation("", &msg),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            DomainError::invalid_input("foreign key constraint violation")
        }
        _ => DomainError::storage(err.to_string()),
    }
}

/// Classify a SQLSTATE code; `None` leaves the error unclassified.
pub fn classify_sqlstate(code: &str, constraint: &str, message: &str) -> Option<DomainError> {
    let mapped = match code {
        PG_UNIQUE_VIOLATION => classify_unique_violation(constraint, message),
        PG_FOREIGN_KEY_VIOLATION => DomainError::invalid_input("foreign key constraint violation"),
        PG_NOT_NULL_VIOLATION => {
            if message.contains("email") {
                DomainError::invalid_input("email is required")
            } else if message.contains("name") {
                DomainError::invalid_input("name is required")
            } else {
                DomainError::invalid_input("required field is missing")
            }
        }
        PG_CHECK_VIOLATION => DomainError::invalid_input("check constraint violation"),
        PG_INVALID_TEXT_REPRESENTATION | PG_DATA_EXCEPTION => {
            DomainError::invalid_input("invalid data format")
        }
        _ => return None,
    };
    Some(mapped)
}

/// Decide which uniqueness rule was violated.
fn classify_unique_violation(constraint: &str, message: &str) -> DomainError {
    let mentions = |needle: &str| constraint.contains(needle) || message.contains(needle);

    if mentions("email") {
        DomainError::DuplicateEmail
    } else if mentions("pkey") || mentions("(id)") {
        DomainError::DuplicateId
    } else {
        DomainError::UserAlreadyExists
    }
}

fn database_error(err: &DbErr) -> Option<&dyn sqlx::error::DatabaseError> {
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(e))) => Some(e.as_ref()),
        _ => None,
    }
}
