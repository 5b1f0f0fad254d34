//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum name length (characters)
pub const MIN_NAME_LENGTH: usize = 3;

/// Maximum name length (characters)
pub const MAX_NAME_LENGTH: usize = 255;

/// Minimum password length (characters)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (characters)
pub const MAX_PASSWORD_LENGTH: usize = 255;

/// Syntactic email pattern: `local-part@domain.tld`
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

// =============================================================================
// Pagination
// =============================================================================

/// Page size used when the caller gives none (or an out-of-range one)
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest page size accepted at the HTTP boundary
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Offset used when the caller gives none
pub const DEFAULT_PAGE_OFFSET: i64 = 0;

// =============================================================================
// Password hashing
// =============================================================================

/// Default Argon2 time cost (iterations)
pub const DEFAULT_HASH_TIME_COST: u32 = 3;

/// Default Argon2 memory cost in KiB
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19 * 1024;

/// Default Argon2 lanes
pub const DEFAULT_HASH_PARALLELISM: u32 = 1;
