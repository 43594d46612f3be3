//! User service: registration, login, sessions and admin user management.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;
use where2go_common::{AppError, AppResult, IdGenerator, validation_messages};
use where2go_db::{
    entities::user,
    repositories::{FoodPollVoteRepository, ReviewRepository, UserRepository},
};

/// Letters, digits and underscore, 3 to 30 characters.
#[allow(clippy::unwrap_used)]
static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,30}$").unwrap());

/// Self-service registration form.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterInput {
    #[validate(regex(
        path = *USERNAME_PATTERN,
        message = "Username may contain only letters, numbers and underscores (3-30 characters)."
    ))]
    pub username: String,

    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,

    #[validate(
        length(min = 8, message = "Password must be at least 8 characters."),
        must_match(other = "password2", message = "Passwords do not match.")
    )]
    pub password1: String,

    pub password2: String,
}

/// Admin form for creating a user directly.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminCreateUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// What was removed together with a deleted user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDeletion {
    pub username: String,
    pub review_count: u64,
    pub vote_count: u64,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    review_repo: ReviewRepository,
    food_vote_repo: FoodPollVoteRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        review_repo: ReviewRepository,
        food_vote_repo: FoodPollVoteRepository,
    ) -> Self {
        Self {
            user_repo,
            review_repo,
            food_vote_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new account and open a session for it.
    ///
    /// Every format problem is reported at once in a single `Validation`
    /// error. Username and email clashes come back together as `Conflict`.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        let mut errors = Vec::new();
        if [&input.username, &input.email, &input.password1, &input.password2]
            .iter()
            .any(|field| field.is_empty())
        {
            errors.push("All fields are required.".to_string());
        }
        if let Err(e) = input.validate() {
            errors.extend(validation_messages(&e));
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors.join("; ")));
        }

        let mut conflicts = Vec::new();
        if self.user_repo.find_by_username(&input.username).await?.is_some() {
            conflicts.push("Username already taken.");
        }
        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            conflicts.push("Email already registered.");
        }
        if !conflicts.is_empty() {
            return Err(AppError::Conflict(conflicts.join("; ")));
        }

        let now = chrono::Utc::now();
        let model = user::ActiveModel {
            username: Set(input.username.clone()),
            email: Set(Some(input.email)),
            password_hash: Set(hash_password(&input.password1)?),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            token: Set(Some(self.id_gen.generate_token())),
            is_superuser: Set(false),
            is_active: Set(true),
            created_at: Set(now.into()),
            last_login_at: Set(Some(now.into())),
            ..Default::default()
        };

        let user = self.user_repo.create(model).await?;
        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Check credentials and open a session.
    ///
    /// The identifier is tried as a username first, then as an email. The
    /// returned model always carries a session token.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> AppResult<user::Model> {
        if identifier.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required.".to_string(),
            ));
        }

        let mut matched = None;
        if let Some(user) = self.user_repo.find_by_username(identifier).await?
            && verify_password(password, &user.password_hash)?
        {
            matched = Some(user);
        }
        if matched.is_none()
            && let Some(user) = self.user_repo.find_by_email(identifier).await?
            && verify_password(password, &user.password_hash)?
        {
            matched = Some(user);
        }

        let user = matched.ok_or(AppError::Unauthorized)?;
        if !user.is_active {
            warn!(user_id = user.id, "Login attempt on disabled account");
            return Err(AppError::Forbidden(
                "Your account has been disabled".to_string(),
            ));
        }

        let token = user
            .token
            .clone()
            .unwrap_or_else(|| self.id_gen.generate_token());
        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(token));
        active.last_login_at = Set(Some(chrono::Utc::now().into()));

        let user = self.user_repo.update(active).await?;
        info!(user_id = user.id, "User logged in");
        Ok(user)
    }

    /// Resolve a session token to an active user.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::Unauthorized)
    }

    /// Replace a user's session token, ending every open session.
    pub async fn regenerate_token(&self, user_id: i32) -> AppResult<String> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let new_token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(new_token.clone()));
        self.user_repo.update(active).await?;

        info!(user_id = user_id, "Session token rotated");
        Ok(new_token)
    }

    /// All users sorted by username.
    pub async fn list(&self) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_all().await
    }

    /// Create a user from the admin view. No session is opened.
    pub async fn admin_create(&self, input: AdminCreateUserInput) -> AppResult<user::Model> {
        let username = input.username.trim();
        if username.is_empty() || input.password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Username \"{username}\" already exists"
            )));
        }

        let email = Some(input.email.trim().to_string()).filter(|e| !e.is_empty());
        if let Some(email) = &email
            && self.user_repo.find_by_email(email).await?.is_some()
        {
            return Err(AppError::Conflict(format!(
                "Email \"{email}\" is already registered"
            )));
        }

        let model = user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email),
            password_hash: Set(hash_password(&input.password)?),
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            token: Set(None),
            is_superuser: Set(false),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
            last_login_at: Set(None),
            ..Default::default()
        };

        let user = self.user_repo.create(model).await?;
        info!(user_id = user.id, username = %user.username, "User created by admin");
        Ok(user)
    }

    /// Delete a user on behalf of an admin.
    ///
    /// Superusers and the acting admin cannot be deleted. The user's votes
    /// and reviews are removed with it.
    pub async fn admin_delete(&self, actor_id: i32, target_id: i32) -> AppResult<UserDeletion> {
        let target = self.user_repo.get_by_id(target_id).await?;

        if target.is_superuser {
            return Err(AppError::Forbidden("Cannot delete superuser".to_string()));
        }
        if target.id == actor_id {
            return Err(AppError::Forbidden(
                "Cannot delete your own account".to_string(),
            ));
        }

        let review_count = self.review_repo.count_by_user(target.id).await?;
        let vote_count = self.food_vote_repo.count_by_user(target.id).await?;

        self.user_repo.delete(target.id).await?;

        info!(
            user_id = target.id,
            username = %target.username,
            review_count = review_count,
            vote_count = vote_count,
            "User deleted"
        );

        Ok(UserDeletion {
            username: target.username,
            review_count,
            vote_count,
        })
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored PHC string.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_service(db: DatabaseConnection) -> UserService {
        let db = Arc::new(db);
        UserService::new(
            UserRepository::new(db.clone()),
            ReviewRepository::new(db.clone()),
            FoodPollVoteRepository::new(db),
        )
    }

    fn create_test_user(id: i32, username: &str, password: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            email: Some(format!("{username}@example.com")),
            password_hash: hash_password(password).unwrap(),
            first_name: String::new(),
            last_name: String::new(),
            token: Some("tok".to_string()),
            is_superuser: false,
            is_active: true,
            created_at: Utc::now().into(),
            last_login_at: None,
        }
    }

    fn valid_registration() -> RegisterInput {
        RegisterInput {
            username: "mario_rossi".to_string(),
            email: "mario@example.com".to_string(),
            password1: "supersecret".to_string(),
            password2: "supersecret".to_string(),
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("test_password_123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("test_password_123", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_username_pattern() {
        assert!(USERNAME_PATTERN.is_match("abc"));
        assert!(USERNAME_PATTERN.is_match("Mario_Rossi_99"));
        assert!(!USERNAME_PATTERN.is_match("ab"));
        assert!(!USERNAME_PATTERN.is_match("mario.rossi"));
        assert!(!USERNAME_PATTERN.is_match(&"a".repeat(31)));
    }

    #[tokio::test]
    async fn test_register_collects_all_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = create_service(db);

        let input = RegisterInput {
            username: "x!".to_string(),
            email: "not-an-email".to_string(),
            password1: "short".to_string(),
            password2: "different".to_string(),
        };

        match service.register(input).await {
            Err(AppError::Validation(msg)) => {
                assert!(msg.contains("Passwords do not match."));
                assert!(msg.contains("Password must be at least 8 characters."));
                assert!(msg.contains("Enter a valid email address."));
                assert!(msg.contains("Username may contain only"));
                assert!(!msg.contains("All fields are required."));
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_missing_fields() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = create_service(db);

        let input = RegisterInput {
            password2: String::new(),
            ..valid_registration()
        };

        match service.register(input).await {
            Err(AppError::Validation(msg)) => {
                assert!(msg.starts_with("All fields are required."));
                assert!(msg.contains("Passwords do not match."));
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_username_and_email() {
        let existing = create_test_user(1, "mario_rossi", "whatever1");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing.clone()]])
            .append_query_results([[existing]])
            .into_connection();
        let service = create_service(db);

        match service.register(valid_registration()).await {
            Err(AppError::Conflict(msg)) => {
                assert_eq!(msg, "Username already taken.; Email already registered.");
            }
            other => panic!("Expected Conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_authenticate_falls_back_to_email() {
        let user = create_test_user(1, "alice", "correct-horse");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // username lookup misses
            .append_query_results([Vec::<user::Model>::new()])
            // email lookup hits
            .append_query_results([[user.clone()]])
            // update returning
            .append_query_results([[user]])
            .into_connection();
        let service = create_service(db);

        let logged_in = service
            .authenticate("alice@example.com", "correct-horse")
            .await
            .unwrap();

        assert_eq!(logged_in.username, "alice");
        assert!(logged_in.token.is_some());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let user = create_test_user(1, "alice", "correct-horse");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let service = create_service(db);

        let result = service.authenticate("alice", "battery-staple").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_disabled_account() {
        let user = user::Model {
            is_active: false,
            ..create_test_user(1, "alice", "correct-horse")
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .into_connection();
        let service = create_service(db);

        match service.authenticate("alice", "correct-horse").await {
            Err(AppError::Forbidden(msg)) => assert_eq!(msg, "Your account has been disabled"),
            other => panic!("Expected Forbidden, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_authenticate_by_token_rejects_inactive() {
        let user = user::Model {
            is_active: false,
            ..create_test_user(1, "alice", "pw-pw-pw-pw")
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .into_connection();
        let service = create_service(db);

        let result = service.authenticate_by_token("tok").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_admin_delete_refuses_superuser_and_self() {
        let admin = user::Model {
            is_superuser: true,
            ..create_test_user(1, "admin", "pw-pw-pw-pw")
        };
        let plain = create_test_user(2, "bob", "pw-pw-pw-pw");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[admin]])
            .append_query_results([[plain]])
            .into_connection();
        let service = create_service(db);

        match service.admin_delete(2, 1).await {
            Err(AppError::Forbidden(msg)) => assert_eq!(msg, "Cannot delete superuser"),
            other => panic!("Expected Forbidden, got {other:?}"),
        }
        match service.admin_delete(2, 2).await {
            Err(AppError::Forbidden(msg)) => assert_eq!(msg, "Cannot delete your own account"),
            other => panic!("Expected Forbidden, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_admin_delete_reports_cascade_counts() {
        let bob = create_test_user(2, "bob", "pw-pw-pw-pw");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[bob]])
            .append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(2))
            }]])
            .append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(1))
            }]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let service = create_service(db);

        let deletion = service.admin_delete(1, 2).await.unwrap();

        assert_eq!(
            deletion,
            UserDeletion {
                username: "bob".to_string(),
                review_count: 2,
                vote_count: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_admin_create_requires_username_and_password() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = create_service(db);

        let result = service
            .admin_create(AdminCreateUserInput {
                username: "carol".to_string(),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
