//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::api::handlers::user_handler::{
    AuthenticateRequest, CreateUserRequest, ListUsersResponse, MessageResponse, UpdateUserRequest,
};
use domain::UserResponse;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::user_handler::create_user,
        crate::api::handlers::user_handler::list_users,
        crate::api::handlers::user_handler::get_user,
        crate::api::handlers::user_handler::get_user_by_email,
        crate::api::handlers::user_handler::update_user,
        crate::api::handlers::user_handler::delete_user,
        crate::api::handlers::user_handler::authenticate_user,
    ),
    components(
        schemas(
            CreateUserRequest,
            UpdateUserRequest,
            AuthenticateRequest,
            ListUsersResponse,
            MessageResponse,
            UserResponse,
        )
    ),
    tags(
        (name = "Users", description = "User management endpoints"),
    )
)]
pub struct ApiDoc;
