use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::User;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Field checks shared by the request bodies. Lengths count characters.
struct Checks(Vec<String>);

impl Checks {
    fn new() -> Self {
        Self(Vec::new())
    }

    fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min || len > max {
            self.0
                .push(format!("{field} must be between {min} and {max} characters"));
        }
        self
    }

    fn email(&mut self, value: &str) -> &mut Self {
        if !is_valid_email(value) {
            self.0.push("email must be a valid email address".into());
        }
        self.length("email", value, 5, 100)
    }

    fn finish(&mut self) -> Result<(), String> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(format!("Validation failed: {}", self.0.join("; ")))
        }
    }
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), String> {
        Checks::new()
            .length("name", &self.name, 3, 50)
            .email(&self.email)
            .length("password", &self.password, 8, 50)
            .finish()
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), String> {
        Checks::new()
            .email(&self.email)
            .length("password", &self.password, 8, 50)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub name: String,
    pub email: String,
}

impl UpdateRequest {
    pub fn validate(&self) -> Result<(), String> {
        Checks::new()
            .length("name", &self.name, 3, 50)
            .email(&self.email)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
}

impl ListRequest {
    /// Falls back to page 1 / limit 20 when either value is below 1.
    pub fn normalized(self) -> (i64, i64) {
        if self.page < 1 || self.limit < 1 {
            (DEFAULT_PAGE, DEFAULT_LIMIT)
        } else {
            (self.page, self.limit)
        }
    }
}

/// Returned after register or login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub access_token: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<PublicUser>,
    pub page: i64,
}
