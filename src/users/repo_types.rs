use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,                   // unique user ID, immutable
    pub name: String,               // display name
    pub email: String,              // lowercase, unique
    #[serde(skip_serializing)]
    pub password_hash: String,      // bcrypt hash, not exposed in JSON
    pub created_at: OffsetDateTime, // set once on insert
    pub updated_at: OffsetDateTime, // refreshed on every update
}
