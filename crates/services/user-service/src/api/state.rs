//! Application state for dependency injection.

use std::sync::Arc;

use crate::repository::UserRepository;
use crate::service::UserService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    /// Used by the readiness probe only
    pub repo: Arc<dyn UserRepository>,
}

impl AppState {
    /// Create new app state.
    pub fn new(user_service: Arc<dyn UserService>, repo: Arc<dyn UserRepository>) -> Self {
        Self { user_service, repo }
    }
}
