//! User service - Orchestrates the user use cases.
//!
//! Each operation is a short pipeline: validate, hash, check duplicates,
//! persist. The service holds no mutable state and is safe to share across
//! tasks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use domain::{
    validate_email, validate_name, validate_password, DomainError, DomainResult, Email, Name,
    Password, PasswordHash, PasswordHasher, User, UserResponse,
};

use crate::repository::UserRepository;

/// Input for [`UserService::create_user`]
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: Email,
    pub name: Name,
    pub password: Password,
}

/// Input for [`UserService::update_user`]. Absent fields are left unchanged.
#[derive(Debug, Clone)]
pub struct UpdateUserRequest {
    pub id: Uuid,
    pub email: Option<Email>,
    pub name: Option<Name>,
}

/// Input for [`UserService::list_users`]
#[derive(Debug, Clone, Copy)]
pub struct ListUsersRequest {
    pub limit: i64,
    pub offset: i64,
}

/// Input for [`UserService::authenticate_user`]
#[derive(Debug, Clone)]
pub struct AuthenticateUserRequest {
    pub email: Email,
    pub password: Password,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new user and return its public projection
    async fn create_user(&self, req: CreateUserRequest) -> DomainResult<UserResponse>;

    /// Get user by ID
    async fn get_user_by_id(&self, id: Uuid) -> DomainResult<UserResponse>;

    /// Get user by email
    async fn get_user_by_email(&self, email: &Email) -> DomainResult<UserResponse>;

    /// Change email and/or name
    async fn update_user(&self, req: UpdateUserRequest) -> DomainResult<UserResponse>;

    /// Delete user; missing users are not an error
    async fn delete_user(&self, id: Uuid) -> DomainResult<()>;

    /// Page of users, newest first
    async fn list_users(&self, req: ListUsersRequest) -> DomainResult<Vec<UserResponse>>;

    /// Check credentials. Succeeds with no payload.
    async fn authenticate_user(&self, req: AuthenticateUserRequest) -> DomainResult<()>;
}

/// Concrete implementation of UserService over a repository and a hasher.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    timeout: Option<Duration>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            repo,
            hasher,
            timeout: None,
        }
    }

    /// Abort any operation running longer than `limit` with `Cancelled`.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    async fn run<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = DomainResult<T>>,
    ) -> DomainResult<T> {
        let Some(limit) = self.timeout else {
            return fut.await;
        };

        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = limit.as_millis() as u64,
                    "Operation deadline elapsed"
                );
                Err(DomainError::Cancelled)
            }
        }
    }

    /// Hash off the async runtime; the hasher is deliberately slow.
    async fn hash_password(&self, password: &Password) -> DomainResult<PasswordHash> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.clone();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::hashing(e.to_string()))?
    }

    async fn verify_password(
        &self,
        hash: &PasswordHash,
        candidate: &Password,
    ) -> DomainResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        let hash = hash.clone();
        let candidate = candidate.clone();

        tokio::task::spawn_blocking(move || hasher.verify(&hash, candidate.as_str()))
            .await
            .map_err(|e| DomainError::hashing(e.to_string()))
    }

    async fn create(&self, req: CreateUserRequest) -> DomainResult<UserResponse> {
        if req.email.is_empty() {
            return Err(DomainError::InvalidEmail);
        }
        if req.name.is_empty() {
            return Err(DomainError::InvalidName);
        }
        if req.password.is_empty() {
            return Err(DomainError::InvalidPassword);
        }

        tracing::debug!(password_length = req.password.char_len(), "Validating password");
        validate_password(&req.password)?;

        let password_hash = self.hash_password(&req.password).await.map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            e
        })?;

        let mut user = User::new(req.email, req.name, password_hash);
        validate_email(user.email())?;
        validate_name(user.name())?;

        // Advisory only; the unique constraint in storage is authoritative
        match self.repo.get_by_email(user.email()).await {
            Ok(_) => {
                tracing::info!(email = %user.email(), "User already exists");
                return Err(DomainError::UserAlreadyExists);
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        self.repo.create(&mut user).await?;
        tracing::info!(user_id = %user.id(), "User created");

        Ok(UserResponse::from(user))
    }

    async fn update(&self, req: UpdateUserRequest) -> DomainResult<UserResponse> {
        if req.id.is_nil() {
            return Err(DomainError::InvalidId);
        }

        // An empty string counts as "not provided"
        let email = req.email.filter(|e| !e.is_empty());
        let name = req.name.filter(|n| !n.is_empty());
        if email.is_none() && name.is_none() {
            return Err(DomainError::InvalidUpdateInput);
        }

        let mut user = self.repo.get_by_id(req.id).await?;

        if let Some(email) = email {
            user.update_email(email)?;
        }
        if let Some(name) = name {
            user.update_name(name)?;
        }
        user.validate()?;

        self.repo.update(&mut user).await?;
        tracing::info!(user_id = %user.id(), "User updated");

        Ok(UserResponse::from(user))
    }

    async fn authenticate(&self, req: AuthenticateUserRequest) -> DomainResult<()> {
        if req.email.is_empty() {
            return Err(DomainError::InvalidEmail);
        }
        if req.password.is_empty() {
            return Err(DomainError::InvalidPassword);
        }

        let user = self.repo.get_by_email(&req.email).await?;

        if !self.verify_password(user.password_hash(), &req.password).await? {
            tracing::info!(user_id = %user.id(), "Authentication failed");
            return Err(DomainError::InvalidCredentials);
        }

        Ok(())
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, req: CreateUserRequest) -> DomainResult<UserResponse> {
        self.run("create_user", self.create(req)).await
    }

    async fn get_user_by_id(&self, id: Uuid) -> DomainResult<UserResponse> {
        if id.is_nil() {
            return Err(DomainError::InvalidId);
        }

        self.run("get_user_by_id", async {
            self.repo.get_by_id(id).await.map(UserResponse::from)
        })
        .await
    }

    async fn get_user_by_email(&self, email: &Email) -> DomainResult<UserResponse> {
        if email.is_empty() {
            return Err(DomainError::InvalidEmail);
        }

        self.run("get_user_by_email", async {
            self.repo.get_by_email(email).await.map(UserResponse::from)
        })
        .await
    }

    async fn update_user(&self, req: UpdateUserRequest) -> DomainResult<UserResponse> {
        self.run("update_user", self.update(req)).await
    }

    async fn delete_user(&self, id: Uuid) -> DomainResult<()> {
        if id.is_nil() {
            return Err(DomainError::InvalidId);
        }

        self.run("delete_user", self.repo.delete(id)).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn list_users(&self, req: ListUsersRequest) -> DomainResult<Vec<UserResponse>> {
        let limit = u64::try_from(req.limit)
            .ok()
            .filter(|l| *l > 0)
            .ok_or(DomainError::InvalidLimit)?;
        let offset = u64::try_from(req.offset).map_err(|_| DomainError::InvalidOffset)?;

        let users = self
            .run("list_users", self.repo.list_users(limit, offset))
            .await?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn authenticate_user(&self, req: AuthenticateUserRequest) -> DomainResult<()> {
        self.run("authenticate_user", self.authenticate(req)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use mockall::predicate::eq;

    use super::*;
    use crate::repository::MockUserRepository;

    /// Reversible stand-in for the real hasher; counts calls.
    #[derive(Default)]
    struct PlainHasher {
        calls: AtomicUsize,
    }

    impl PasswordHasher for PlainHasher {
        fn hash(&self, plain: &Password) -> DomainResult<PasswordHash> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PasswordHash::from_hash(format!("plain:{}", plain.as_str())))
        }

        fn verify(&self, hash: &PasswordHash, candidate: &str) -> bool {
            hash.as_str() == format!("plain:{}", candidate)
        }
    }

    struct FailingHasher;

    impl PasswordHasher for FailingHasher {
        fn hash(&self, _plain: &Password) -> DomainResult<PasswordHash> {
            Err(DomainError::hashing("entropy source unavailable"))
        }

        fn verify(&self, _hash: &PasswordHash, _candidate: &str) -> bool {
            false
        }
    }

    struct SlowHasher;

    impl PasswordHasher for SlowHasher {
        fn hash(&self, plain: &Password) -> DomainResult<PasswordHash> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(PasswordHash::from_hash(plain.as_str()))
        }

        fn verify(&self, _hash: &PasswordHash, _candidate: &str) -> bool {
            false
        }
    }

    fn service_with(repo: MockUserRepository, hasher: Arc<dyn PasswordHasher>) -> UserManager {
        UserManager::new(Arc::new(repo), hasher)
    }

    fn create_test_user(email: &str) -> User {
        User::new(
            Email::new(email),
            Name::new("Test User"),
            PasswordHash::from_hash("plain:Password123"),
        )
    }

    fn create_request(email: &str, name: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: Email::new(email),
            name: Name::new(name),
            password: Password::new(password),
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .times(1)
            .returning(|_| Err(DomainError::NotFound));
        repo.expect_create().times(1).returning(|user| {
            assert_eq!(user.password_hash().as_str(), "plain:Password123");
            Ok(())
        });

        let service = service_with(repo, Arc::new(PlainHasher::default()));
        let created = service
            .create_user(create_request("new@example.com", "New User", "Password123"))
            .await
            .unwrap();

        assert_eq!(created.email.as_str(), "new@example.com");
        assert_eq!(created.name.as_str(), "New User");
        assert!(!created.id.is_nil());
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_create_user_rejects_empty_fields_before_hashing() {
        let hasher = Arc::new(PlainHasher::default());
        // No expectations: any repository call panics
        let service = service_with(MockUserRepository::new(), hasher.clone());

        let cases = [
            (create_request("", "Name", "Password123"), DomainError::InvalidEmail),
            (create_request("a@example.com", "", "Password123"), DomainError::InvalidName),
            (create_request("a@example.com", "Name", ""), DomainError::InvalidPassword),
        ];
        for (req, expected) in cases {
            assert_eq!(service.create_user(req).await.unwrap_err(), expected);
        }
        assert_eq!(hasher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_user_short_password_not_hashed() {
        let hasher = Arc::new(PlainHasher::default());
        let service = service_with(MockUserRepository::new(), hasher.clone());

        let result = service
            .create_user(create_request("a@example.com", "Name", "short"))
            .await;

        assert_eq!(result.unwrap_err(), DomainError::InvalidPassword);
        assert_eq!(hasher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_user_hasher_failure_stops_pipeline() {
        let service = service_with(MockUserRepository::new(), Arc::new(FailingHasher));

        let result = service
            .create_user(create_request("a@example.com", "Name", "Password123"))
            .await;

        assert!(matches!(result, Err(DomainError::HashingFailure(_))));
    }

    #[tokio::test]
    async fn test_create_user_invalid_email_format() {
        let service = service_with(MockUserRepository::new(), Arc::new(PlainHasher::default()));

        let result = service
            .create_user(create_request("not-an-email", "Name", "Password123"))
            .await;

        assert_eq!(result.unwrap_err(), DomainError::InvalidEmail);
    }

    #[tokio::test]
    async fn test_create_user_precheck_finds_duplicate() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(|email| Ok(create_test_user(email.as_str())));
        repo.expect_create().never();

        let service = service_with(repo, Arc::new(PlainHasher::default()));
        let result = service
            .create_user(create_request("taken@example.com", "Name", "Password123"))
            .await;

        assert_eq!(result.unwrap_err(), DomainError::UserAlreadyExists);
    }

    #[tokio::test]
    async fn test_create_user_precheck_propagates_lookup_failure() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(|_| Err(DomainError::storage("connection refused")));
        repo.expect_create().never();

        let service = service_with(repo, Arc::new(PlainHasher::default()));
        let result = service
            .create_user(create_request("a@example.com", "Name", "Password123"))
            .await;

        assert_eq!(result.unwrap_err(), DomainError::storage("connection refused"));
    }

    #[tokio::test]
    async fn test_create_user_storage_constraint_catches_race() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(|_| Err(DomainError::NotFound));
        repo.expect_create()
            .returning(|_| Err(DomainError::DuplicateEmail));

        let service = service_with(repo, Arc::new(PlainHasher::default()));
        let err = service
            .create_user(create_request("a@example.com", "Name", "Password123"))
            .await
            .unwrap_err();

        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn test_get_user_by_id_nil_rejected() {
        let service = service_with(MockUserRepository::new(), Arc::new(PlainHasher::default()));
        let result = service.get_user_by_id(Uuid::nil()).await;
        assert_eq!(result.unwrap_err(), DomainError::InvalidId);
    }

    #[tokio::test]
    async fn test_get_user_by_id_not_found_propagates() {
        let user_id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .with(eq(user_id))
            .returning(|_| Err(DomainError::NotFound));

        let service = service_with(repo, Arc::new(PlainHasher::default()));
        let result = service.get_user_by_id(user_id).await;

        assert_eq!(result.unwrap_err(), DomainError::NotFound);
    }

    #[tokio::test]
    async fn test_get_user_by_email_empty_rejected() {
        let service = service_with(MockUserRepository::new(), Arc::new(PlainHasher::default()));
        let result = service.get_user_by_email(&Email::new("")).await;
        assert_eq!(result.unwrap_err(), DomainError::InvalidEmail);
    }

    #[tokio::test]
    async fn test_update_user_requires_a_field() {
        let service = service_with(MockUserRepository::new(), Arc::new(PlainHasher::default()));

        let both_empty = UpdateUserRequest {
            id: Uuid::new_v4(),
            email: Some(Email::new("")),
            name: Some(Name::new("")),
        };
        assert_eq!(
            service.update_user(both_empty).await.unwrap_err(),
            DomainError::InvalidUpdateInput
        );

        let both_absent = UpdateUserRequest {
            id: Uuid::new_v4(),
            email: None,
            name: None,
        };
        assert_eq!(
            service.update_user(both_absent).await.unwrap_err(),
            DomainError::InvalidUpdateInput
        );
    }

    #[tokio::test]
    async fn test_update_user_nil_id_rejected() {
        let service = service_with(MockUserRepository::new(), Arc::new(PlainHasher::default()));
        let req = UpdateUserRequest {
            id: Uuid::nil(),
            email: None,
            name: Some(Name::new("Valid Name")),
        };
        assert_eq!(service.update_user(req).await.unwrap_err(), DomainError::InvalidId);
    }

    #[tokio::test]
    async fn test_update_user_invalid_name_persists_nothing() {
        let existing = create_test_user("old@example.com");
        let user_id = existing.id();

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(existing.clone()));
        repo.expect_update().never();

        let service = service_with(repo, Arc::new(PlainHasher::default()));
        let req = UpdateUserRequest {
            id: user_id,
            email: Some(Email::new("new@example.com")),
            name: Some(Name::new("ab")),
        };

        assert_eq!(service.update_user(req).await.unwrap_err(), DomainError::InvalidName);
    }

    #[tokio::test]
    async fn test_update_user_success() {
        let existing = create_test_user("old@example.com");
        let user_id = existing.id();

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .with(eq(user_id))
            .returning(move |_| Ok(existing.clone()));
        repo.expect_update().times(1).returning(|user| {
            assert_eq!(user.email().as_str(), "new@example.com");
            assert_eq!(user.name().as_str(), "Test User");
            Ok(())
        });

        let service = service_with(repo, Arc::new(PlainHasher::default()));
        let req = UpdateUserRequest {
            id: user_id,
            email: Some(Email::new("new@example.com")),
            name: Some(Name::new("")),
        };
        let updated = service.update_user(req).await.unwrap();

        assert_eq!(updated.email.as_str(), "new@example.com");
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_update_user_not_found_propagates() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(|_| Err(DomainError::NotFound));

        let service = service_with(repo, Arc::new(PlainHasher::default()));
        let req = UpdateUserRequest {
            id: Uuid::new_v4(),
            email: None,
            name: Some(Name::new("Valid Name")),
        };

        assert_eq!(service.update_user(req).await.unwrap_err(), DomainError::NotFound);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let user_id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_delete()
            .with(eq(user_id))
            .times(1)
            .returning(|_| Ok(()));

        let service = service_with(repo, Arc::new(PlainHasher::default()));
        tokio_test::assert_ok!(service.delete_user(user_id).await);
        assert_eq!(service.delete_user(Uuid::nil()).await.unwrap_err(), DomainError::InvalidId);
    }

    #[tokio::test]
    async fn test_list_users_rejects_bad_paging() {
        let service = service_with(MockUserRepository::new(), Arc::new(PlainHasher::default()));

        let cases = [
            (0, 0, DomainError::InvalidLimit),
            (-1, 0, DomainError::InvalidLimit),
            (10, -1, DomainError::InvalidOffset),
        ];
        for (limit, offset, expected) in cases {
            let result = service.list_users(ListUsersRequest { limit, offset }).await;
            assert_eq!(result.unwrap_err(), expected, "limit={limit} offset={offset}");
        }
    }

    #[tokio::test]
    async fn test_list_users_delegates() {
        let mut repo = MockUserRepository::new();
        repo.expect_list_users()
            .with(eq(10u64), eq(20u64))
            .returning(|_, _| {
                Ok(vec![
                    create_test_user("one@example.com"),
                    create_test_user("two@example.com"),
                ])
            });

        let service = service_with(repo, Arc::new(PlainHasher::default()));
        let users = service
            .list_users(ListUsersRequest { limit: 10, offset: 20 })
            .await
            .unwrap();

        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn test_authenticate_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email().returning(|email| {
            if email.as_str() == "known@example.com" {
                Ok(create_test_user("known@example.com"))
            } else {
                Err(DomainError::NotFound)
            }
        });

        let service = service_with(repo, Arc::new(PlainHasher::default()));
        let auth = |email: &str, password: &str| AuthenticateUserRequest {
            email: Email::new(email),
            password: Password::new(password),
        };

        tokio_test::assert_ok!(
            service
                .authenticate_user(auth("known@example.com", "Password123"))
                .await
        );
        assert_eq!(
            service
                .authenticate_user(auth("known@example.com", "WrongPassword"))
                .await
                .unwrap_err(),
            DomainError::InvalidCredentials
        );
        assert_eq!(
            service
                .authenticate_user(auth("ghost@example.com", "Password123"))
                .await
                .unwrap_err(),
            DomainError::NotFound
        );
        assert_eq!(
            service
                .authenticate_user(auth("known@example.com", ""))
                .await
                .unwrap_err(),
            DomainError::InvalidPassword
        );
    }

    #[tokio::test]
    async fn test_deadline_cancels_operation() {
        let service = service_with(MockUserRepository::new(), Arc::new(SlowHasher))
            .with_timeout(Duration::from_millis(20));

        let result = service
            .create_user(create_request("a@example.com", "Name", "Password123"))
            .await;

        assert_eq!(result.unwrap_err(), DomainError::Cancelled);
    }
}
