use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::{instrument, warn};

use super::{
    dto::{
        AuthResponse, ListRequest, LoginRequest, PublicUser, RegisterRequest, UpdateRequest,
        UserListResponse,
    },
    services::UserService,
};
use crate::{
    auth::AuthUser,
    error::{ApiResponse, AppError, AppResult},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/get/me", get(get_me))
        .route("/users/get/list", get(list_users))
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/update", post(update))
        .route("/users/delete", post(delete))
}

fn invalid_body(e: impl std::fmt::Display) -> AppError {
    warn!(error = %e, "invalid request body");
    AppError::Validation("Invalid request body".into())
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(body)| body).map_err(invalid_body)
}

fn validated(check: Result<(), String>) -> AppResult<()> {
    check.map_err(|msg| {
        warn!(%msg, "request validation failed");
        AppError::Validation(msg)
    })
}

#[instrument(skip(users))]
pub async fn get_me(
    State(users): State<UserService>,
    AuthUser(user_id): AuthUser,
) -> AppResult<ApiResponse<PublicUser>> {
    let user = users.get_by_id(user_id).await?;
    Ok(ApiResponse::ok(user))
}

/// Body is optional; an empty body lists the first page.
#[instrument(skip(users, body))]
pub async fn list_users(
    State(users): State<UserService>,
    body: Bytes,
) -> AppResult<ApiResponse<UserListResponse>> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        ListRequest::default()
    } else {
        serde_json::from_slice::<ListRequest>(&body).map_err(invalid_body)?
    };
    let (page, limit) = req.normalized();
    let list = users.list(page, limit).await?;
    Ok(ApiResponse::ok(list))
}

#[instrument(skip(users, payload))]
pub async fn register(
    State(users): State<UserService>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let req = json_body(payload)?;
    validated(req.validate())?;
    let created = users.register(&req.name, &req.email, &req.password).await?;
    Ok(ApiResponse::ok(created))
}

#[instrument(skip(users, payload))]
pub async fn login(
    State(users): State<UserService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let req = json_body(payload)?;
    validated(req.validate())?;
    let session = users.login(&req.email, &req.password).await?;
    Ok(ApiResponse::ok(session))
}

#[instrument(skip(users, payload))]
pub async fn update(
    State(users): State<UserService>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> AppResult<ApiResponse<PublicUser>> {
    let req = json_body(payload)?;
    validated(req.validate())?;
    let user = users.update(user_id, &req.name, &req.email).await?;
    Ok(ApiResponse::ok(user))
}

#[instrument(skip(users))]
pub async fn delete(
    State(users): State<UserService>,
    AuthUser(user_id): AuthUser,
) -> AppResult<ApiResponse<&'static str>> {
    users.delete(user_id).await?;
    Ok(ApiResponse::ok("User deleted successfully"))
}
