use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::error::AppError;

/// Authenticated caller, taken from a verified `Authorization: Bearer <token>` header.
///
/// Every rejection is the same generic 401; the reason is only logged.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                warn!("missing Authorization header");
                AppError::unauthorized()
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("malformed Authorization header");
            AppError::unauthorized()
        })?;

        let token = token.trim();
        if token.is_empty() {
            warn!("empty bearer token");
            return Err(AppError::unauthorized());
        }

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token verification failed");
            AppError::unauthorized()
        })?;

        Ok(AuthUser(claims.sub))
    }
}
