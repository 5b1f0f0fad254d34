//! In-memory user repository.
//!
//! Honors the same contract as [`UserStore`](super::UserStore), including
//! unique emails, so it can back tests and the `--in-memory` server mode.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::UserRepository;
use domain::{DomainError, DomainResult, Email, User};

struct StoredUser {
    user: User,
    // Insertion order, breaks created_at ties
    seq: u64,
}

#[derive(Default)]
struct State {
    users: HashMap<Uuid, StoredUser>,
    next_seq: u64,
}

/// Thread-safe in-memory repository
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: RwLock<State>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn email_taken(state: &State, email: &Email, except: Option<Uuid>) -> bool {
    state
        .users
        .values()
        .any(|s| s.user.email() == email && Some(s.user.id()) != except)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &mut User) -> DomainResult<()> {
        let mut state = self.state.write().await;

        if state.users.contains_key(&user.id()) {
            return Err(DomainError::DuplicateId);
        }
        if email_taken(&state, user.email(), None) {
            return Err(DomainError::DuplicateEmail);
        }

        let now = Utc::now();
        user.set_timestamps(now, now);

        let seq = state.next_seq;
        state.next_seq += 1;
        state.users.insert(
            user.id(),
            StoredUser {
                user: user.clone(),
                seq,
            },
        );
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> DomainResult<User> {
        self.state
            .read()
            .await
            .users
            .get(&id)
            .map(|s| s.user.clone())
            .ok_or(DomainError::NotFound)
    }

    async fn get_by_email(&self, email: &Email) -> DomainResult<User> {
        self.state
            .read()
            .await
            .users
            .values()
            .find(|s| s.user.email() == email)
            .map(|s| s.user.clone())
            .ok_or(DomainError::NotFound)
    }

    async fn update(&self, user: &mut User) -> DomainResult<()> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&user.id()) {
            return Err(DomainError::UserNotFound);
        }
        if email_taken(&state, user.email(), Some(user.id())) {
            return Err(DomainError::DuplicateEmail);
        }

        let now = Utc::now();
        if now > user.updated_at() {
            user.set_updated_at(now);
        }

        if let Some(stored) = state.users.get_mut(&user.id()) {
            // id and created_at stay as stored
            stored.user = User::restore(
                stored.user.id(),
                user.email().clone(),
                user.name().clone(),
                user.password_hash().clone(),
                stored.user.created_at(),
                user.updated_at(),
            );
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.state.write().await.users.remove(&id);
        Ok(())
    }

    async fn list_users(&self, limit: u64, offset: u64) -> DomainResult<Vec<User>> {
        let state = self.state.read().await;

        let mut stored: Vec<&StoredUser> = state.users.values().collect();
        stored.sort_by(|a, b| {
            b.user
                .created_at()
                .cmp(&a.user.created_at())
                .then(b.seq.cmp(&a.seq))
        });

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(stored
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|s| s.user.clone())
            .collect())
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}
