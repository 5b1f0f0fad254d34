//! User Service Library
//!
//! This crate provides user account management over an HTTP JSON API:
//! registration, lookup, update, deletion, paging and credential checks.

pub mod api;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use common::AppResult;
use domain::{Argon2Hasher, PasswordHasher};

use crate::api::{create_router, AppState};
use crate::config::UserServiceConfig;
use crate::infra::Database;
use crate::repository::{InMemoryUserRepository, UserRepository, UserStore};
use crate::service::UserManager;

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> AppResult<()> {
    let config = UserServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Wire the service graph and build the HTTP application.
pub fn build_app(
    config: &UserServiceConfig,
    repo: Arc<dyn UserRepository>,
) -> Result<axum::Router, Box<dyn std::error::Error>> {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new(
        config.hasher.time_cost,
        config.hasher.memory_kib,
        config.hasher.parallelism,
    )?);

    let mut user_service = UserManager::new(Arc::clone(&repo), hasher);
    if config.request_timeout_secs > 0 {
        user_service = user_service.with_timeout(Duration::from_secs(config.request_timeout_secs));
    }

    let state = AppState::new(Arc::new(user_service), repo);
    Ok(create_router(state))
}

/// Run the HTTP server.
pub async fn run_server(
    host: &str,
    port: u16,
    config: UserServiceConfig,
    in_memory: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo: Arc<dyn UserRepository> = if in_memory {
        info!("Using in-memory user store");
        Arc::new(InMemoryUserRepository::new())
    } else {
        let db = Database::connect(&config.database).await?;
        Arc::new(UserStore::new(db.get_connection()))
    };

    let app = build_app(&config, repo)?;

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("User service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
