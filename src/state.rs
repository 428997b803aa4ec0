use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::users::{
    repo::{PgUserStore, UserStore},
    services::UserService,
};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub store: Arc<dyn UserStore>,
    pub users: UserService,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, db: PgPool) -> Self {
        let store = Arc::new(PgUserStore::new(db)) as Arc<dyn UserStore>;
        Self::from_parts(config, store)
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn UserStore>) -> Self {
        let keys = JwtKeys::new(&config.jwt);
        let users = UserService::new(store.clone(), keys.clone(), config.bcrypt_cost);
        Self {
            config,
            keys,
            store,
            users,
        }
    }

    #[cfg(test)]
    pub fn fake() -> (Self, Arc<crate::users::memory::MemoryUserStore>) {
        use crate::config::{DatabaseConfig, JwtConfig, ServerConfig};
        use crate::users::memory::MemoryUserStore;

        let config = Arc::new(AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                request_timeout_ms: 5_000,
            },
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                expires_in_ms: 5 * 60 * 1000,
            },
            database: DatabaseConfig {
                host: "localhost".into(),
                port: 5432,
                name: "users_test".into(),
                user: "postgres".into(),
                password: "postgres".into(),
                max_pool_size: 1,
                connection_timeout_ms: 1_000,
            },
            bcrypt_cost: 4,
            user_count_interval_secs: 1,
        });

        let store = Arc::new(MemoryUserStore::new());
        let state = Self::from_parts(config, store.clone() as Arc<dyn UserStore>);
        (state, store)
    }
}
