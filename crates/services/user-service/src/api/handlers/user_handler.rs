//! User handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult};
use domain::{
    validate_email, DomainError, Email, Name, Password, UserResponse, DEFAULT_PAGE_LIMIT,
    DEFAULT_PAGE_OFFSET, MAX_PAGE_LIMIT,
};

use crate::api::extractors::{AppJson, ValidatedJson};
use crate::api::AppState;
use crate::service;

/// User registration request. Missing fields are treated as empty.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "Password123")]
    pub password: String,
}

/// User update request. An empty string counts as "not provided".
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[schema(example = "jane.doe@example.com")]
    pub email: Option<String>,
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
}

/// Credentials check request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AuthenticateRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    #[schema(example = "Password123")]
    pub password: String,
}

/// Paging query. Unparsable or out-of-range values fall back to defaults.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Page size, 1..=100 (default 10)
    pub limit: Option<String>,
    /// Users to skip (default 0)
    pub offset: Option<String>,
}

impl ListUsersQuery {
    fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|l| (1..=MAX_PAGE_LIMIT).contains(l))
            .unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    fn offset(&self) -> i64 {
        self.offset
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|o| *o >= 0)
            .unwrap_or(DEFAULT_PAGE_OFFSET)
    }
}

/// One page of users
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    /// Number of users in this page
    pub total_count: usize,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/authenticate", post(authenticate_user))
        .route("/by-email/:email", get(get_user_by_email))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

fn parse_user_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request("Invalid user ID format"))
}

/// Client mistakes are logged at `warn`, server-side failures at `error`.
fn service_error(operation: &'static str, err: DomainError) -> AppError {
    let err = AppError::from(err);
    if err.status().is_server_error() {
        tracing::error!(operation, code = err.code(), error = %err, "User service call failed");
    } else {
        tracing::warn!(operation, code = err.code(), error = %err, "User service call rejected");
    }
    err
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    tracing::info!(
        email = %req.email,
        name = %req.name,
        password_length = req.password.chars().count(),
        "Create user request"
    );

    let user = state
        .user_service
        .create_user(service::CreateUserRequest {
            email: Email::new(req.email),
            name: Name::new(req.name),
            password: Password::new(req.password),
        })
        .await
        .map_err(|e| service_error("create_user", e))?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// List users, newest first
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = ListUsersResponse)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<ListUsersResponse>> {
    let (limit, offset) = (query.limit(), query.offset());

    let users = state
        .user_service
        .list_users(service::ListUsersRequest { limit, offset })
        .await
        .map_err(|e| service_error("list_users", e))?;

    Ok(Json(ListUsersResponse {
        total_count: users.len(),
        users,
        limit,
        offset,
    }))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_user_id(&id)?;

    let user = state
        .user_service
        .get_user_by_id(id)
        .await
        .map_err(|e| service_error("get_user_by_id", e))?;

    Ok(Json(user))
}

/// Get user by email address
#[utoipa::path(
    get,
    path = "/api/v1/users/by-email/{email}",
    tag = "Users",
    params(
        ("email" = String, Path, description = "Email address")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "Invalid email"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let email = Email::new(email);
    validate_email(&email)?;

    let user = state
        .user_service
        .get_user_by_email(&email)
        .await
        .map_err(|e| service_error("get_user_by_email", e))?;

    Ok(Json(user))
}

/// Update email and/or name
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_user_id(&id)?;

    let user = state
        .user_service
        .update_user(service::UpdateUserRequest {
            id,
            email: req.email.map(Email::new),
            name: req.name.map(Name::new),
        })
        .await
        .map_err(|e| service_error("update_user", e))?;

    Ok(Json(user))
}

/// Delete user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid user ID")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_user_id(&id)?;

    state
        .user_service
        .delete_user(id)
        .await
        .map_err(|e| service_error("delete_user", e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Check email and password
#[utoipa::path(
    post,
    path = "/api/v1/users/authenticate",
    tag = "Users",
    request_body = AuthenticateRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = MessageResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "User not found")
    )
)]
pub async fn authenticate_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AuthenticateRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .user_service
        .authenticate_user(service::AuthenticateUserRequest {
            email: Email::new(req.email),
            password: Password::new(req.password),
        })
        .await
        .map_err(|e| service_error("authenticate_user", e))?;

    Ok(Json(MessageResponse {
        message: "Authentication successful".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, offset: Option<&str>) -> ListUsersQuery {
        ListUsersQuery {
            limit: limit.map(str::to_string),
            offset: offset.map(str::to_string),
        }
    }

    #[test]
    fn test_list_query_defaults() {
        let q = ListUsersQuery::default();
        assert_eq!(q.limit(), 10);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_list_query_out_of_range_resets() {
        assert_eq!(query(Some("0"), None).limit(), 10);
        assert_eq!(query(Some("101"), None).limit(), 10);
        assert_eq!(query(Some("abc"), None).limit(), 10);
        assert_eq!(query(None, Some("-5")).offset(), 0);
        assert_eq!(query(None, Some("x")).offset(), 0);
    }

    #[test]
    fn test_service_error_keeps_status() {
        let rejected = service_error("get_user_by_id", DomainError::NotFound);
        assert_eq!(rejected.status(), StatusCode::NOT_FOUND);
        assert_eq!(rejected.code(), "E008");

        let failed = service_error("create_user", DomainError::storage("connection reset"));
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failed.code(), "E017");
    }

    #[test]
    fn test_list_query_accepts_valid_values() {
        let q = query(Some("100"), Some("40"));
        assert_eq!(q.limit(), 100);
        assert_eq!(q.offset(), 40);
    }
}
