use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: Uuid,   // user ID
    pub iss: String, // issuer
    pub iat: i64,    // issued at (unix timestamp)
    pub nbf: i64,    // not before (unix timestamp)
    pub exp: i64,    // expires at (unix timestamp)
}
