use std::sync::Arc;

use axum::extract::FromRef;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{
    dto::{AuthResponse, PublicUser, UserListResponse},
    repo::{StoreError, UserStore},
    repo_types::User,
};
use crate::{
    auth::{
        password::{hash_password, verify_password, PasswordError},
        JwtKeys, TokenError,
    },
    state::AppState,
};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("password length exceeds 72 bytes")]
    PasswordTooLong,
    #[error("email {0} is already registered")]
    DuplicateEmail(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("user with id {0} not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Password(PasswordError),
    #[error("{op}: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: StoreError,
    },
}

impl UserError {
    fn storage(op: &'static str) -> impl FnOnce(StoreError) -> UserError {
        move |source| {
            error!(error = %source, op, "user store failure");
            UserError::Storage { op, source }
        }
    }
}

impl From<PasswordError> for UserError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::TooLong => UserError::PasswordTooLong,
            other => UserError::Password(other),
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User use cases on top of a [`UserStore`].
///
/// Email uniqueness is left to the store's constraint; nothing is pre-checked here.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    keys: JwtKeys,
    bcrypt_cost: u32,
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, keys: JwtKeys, bcrypt_cost: u32) -> Self {
        Self {
            store,
            keys,
            bcrypt_cost,
        }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, UserError> {
        let email = normalize_email(email);
        let password_hash = hash_password(password, self.bcrypt_cost)?;

        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let user = match self.store.insert(&user).await {
            Ok(u) => u,
            Err(StoreError::DuplicateKey) => {
                warn!(email = %user.email, "register duplicate email");
                return Err(UserError::DuplicateEmail(user.email));
            }
            Err(e) => return Err(UserError::storage("insert user")(e)),
        };

        let access_token = self.keys.sign(user.id)?;
        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            access_token,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, UserError> {
        let email = normalize_email(email);
        let user = self
            .store
            .find_by_email(&email)
            .await
            .map_err(UserError::storage("find user by email"))?
            .ok_or_else(|| {
                warn!(email = %email, "login unknown email");
                UserError::InvalidCredentials
            })?;

        if !verify_password(password, &user.password_hash)? {
            warn!(email = %email, user_id = %user.id, "login invalid password");
            return Err(UserError::InvalidCredentials);
        }

        let access_token = self.keys.sign(user.id)?;
        info!(user_id = %user.id, "user logged in");
        Ok(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            access_token,
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<PublicUser, UserError> {
        self.find_existing(id, "find user by id")
            .await
            .map(PublicUser::from)
    }

    /// Expects `page >= 1` and `limit >= 1`.
    pub async fn list(&self, page: i64, limit: i64) -> Result<UserListResponse, UserError> {
        let Some(offset) = (page - 1).checked_mul(limit) else {
            debug!(page, limit, "page offset overflows, returning empty page");
            return Ok(UserListResponse {
                users: Vec::new(),
                page,
            });
        };
        let users = self
            .store
            .list(offset, limit)
            .await
            .map_err(UserError::storage("list users"))?;
        Ok(UserListResponse {
            users: users.into_iter().map(PublicUser::from).collect(),
            page,
        })
    }

    pub async fn update(&self, id: Uuid, name: &str, email: &str) -> Result<PublicUser, UserError> {
        let mut user = self.find_existing(id, "find user by id").await?;
        user.name = name.to_string();
        user.email = normalize_email(email);

        match self.store.update(&user).await {
            Ok(Some(updated)) => {
                info!(user_id = %id, "user updated");
                Ok(updated.into())
            }
            Ok(None) => Err(UserError::NotFound(id)),
            Err(StoreError::DuplicateKey) => {
                warn!(user_id = %id, email = %user.email, "update duplicate email");
                Err(UserError::DuplicateEmail(user.email))
            }
            Err(e) => Err(UserError::storage("update user")(e)),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), UserError> {
        self.find_existing(id, "find user by id").await?;
        let removed = self
            .store
            .delete(id)
            .await
            .map_err(UserError::storage("delete user"))?;
        if !removed {
            return Err(UserError::NotFound(id));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    async fn find_existing(&self, id: Uuid, op: &'static str) -> Result<User, UserError> {
        self.store
            .find_by_id(id)
            .await
            .map_err(UserError::storage(op))?
            .ok_or_else(|| {
                warn!(user_id = %id, "user not found");
                UserError::NotFound(id)
            })
    }
}
