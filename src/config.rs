use anyhow::Context;
use serde::Deserialize;

/// Longest accepted token lifetime: one year.
pub const MAX_JWT_EXPIRES_IN_MS: i64 = 365 * 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub expires_in_ms: i64,
}

impl JwtConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.secret.is_empty(), "JWT_SECRET must not be empty");
        anyhow::ensure!(
            (1..=MAX_JWT_EXPIRES_IN_MS).contains(&self.expires_in_ms),
            "JWT_EXPIRES_IN_MS must be between 1 and {MAX_JWT_EXPIRES_IN_MS}, got {}",
            self.expires_in_ms
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub max_pool_size: u32,
    pub connection_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub database: DatabaseConfig,
    pub bcrypt_cost: u32,
    pub user_count_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "user-api".into()),
            expires_in_ms: parse_var("JWT_EXPIRES_IN_MS", 60 * 60 * 1000)?,
        };
        jwt.validate()?;

        let database = DatabaseConfig {
            host: std::env::var("DB_HOST").context("DB_HOST must be set")?,
            port: parse_var("DB_PORT", 5432)?,
            name: std::env::var("DB_NAME").context("DB_NAME must be set")?,
            user: std::env::var("DB_USER").unwrap_or_else(|_| "postgres".into()),
            password: std::env::var("DB_PASSWORD").unwrap_or_else(|_| "postgres".into()),
            max_pool_size: parse_var("DB_MAX_POOL_SIZE", 10)?,
            connection_timeout_ms: parse_var("DB_CONNECTION_TIMEOUT_MS", 10_000)?,
        };

        let server = ServerConfig {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_var("APP_PORT", 8080)?,
            request_timeout_ms: parse_var("REQUEST_TIMEOUT_MS", 10_000)?,
        };

        Ok(Self {
            server,
            jwt,
            database,
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            user_count_interval_secs: parse_var("USER_COUNT_INTERVAL_SECS", 10)?,
        })
    }
}

/// Reads an optional numeric variable, falling back to `default` when unset.
fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}
