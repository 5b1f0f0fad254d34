//! User repository port and its SeaORM implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, Unchanged,
};
use uuid::Uuid;

use super::db_error::translate_db_error;
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::infra;
use domain::{DomainError, DomainResult, Email, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Implementations translate storage failures into [`DomainError`] kinds;
/// uniqueness conflicts must surface as a duplicate kind.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; timestamps are overwritten with store-assigned values
    async fn create(&self, user: &mut User) -> DomainResult<()>;

    /// Find user by ID, `NotFound` if absent
    async fn get_by_id(&self, id: Uuid) -> DomainResult<User>;

    /// Find user by email address, `NotFound` if absent
    async fn get_by_email(&self, email: &Email) -> DomainResult<User>;

    /// Persist email, name and password; refreshes `updated_at`
    async fn update(&self, user: &mut User) -> DomainResult<()>;

    /// Delete by ID. Deleting a missing user is not an error.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Page of users, newest first
    async fn list_users(&self, limit: u64, offset: u64) -> DomainResult<Vec<User>>;

    /// Check the backing store is reachable
    async fn ping(&self) -> DomainResult<()>;
}

/// Concrete implementation of UserRepository over Postgres
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, user: &mut User) -> DomainResult<()> {
        // Timestamps left unset so the column defaults apply
        let active_model = ActiveModel {
            id: Set(user.id()),
            email: Set(user.email().as_str().to_string()),
            password: Set(user.password_hash().as_str().to_string()),
            name: Set(user.name().as_str().to_string()),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(translate_db_error)?;

        user.set_timestamps(model.created_at, model.updated_at);
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> DomainResult<User> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(translate_db_error)?
            .map(User::from)
            .ok_or(DomainError::NotFound)
    }

    async fn get_by_email(&self, email: &Email) -> DomainResult<User> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await
            .map_err(translate_db_error)?
            .map(User::from)
            .ok_or(DomainError::NotFound)
    }

    async fn update(&self, user: &mut User) -> DomainResult<()> {
        let active_model = ActiveModel {
            id: Unchanged(user.id()),
            email: Set(user.email().as_str().to_string()),
            password: Set(user.password_hash().as_str().to_string()),
            name: Set(user.name().as_str().to_string()),
            created_at: NotSet,
            updated_at: Set(Utc::now()),
        };

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => DomainError::UserNotFound,
            other => translate_db_error(other),
        })?;

        user.set_updated_at(model.updated_at);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(translate_db_error)?;

        if result.rows_affected == 0 {
            tracing::debug!(user_id = %id, "Delete matched no rows");
        }
        Ok(())
    }

    async fn list_users(&self, limit: u64, offset: u64) -> DomainResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(translate_db_error)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn ping(&self) -> DomainResult<()> {
        infra::ping(&self.db).await.map_err(translate_db_error)
    }
}
