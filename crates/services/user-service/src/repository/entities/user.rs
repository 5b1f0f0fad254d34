//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Email, Name, PasswordHash, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    /// Hashed password, never plaintext
    pub password: String,
    pub name: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User::restore(
            model.id,
            Email::new(model.email),
            Name::new(model.name),
            PasswordHash::from_hash(model.password),
            model.created_at,
            model.updated_at,
        )
    }
}
