use std::sync::Arc;

use crate::auth::{
    jwt::JwtKeys,
    memory_repo::MemoryUserStore,
    password::PasswordService,
    repo::{PgUserStore, UserStore},
};
use crate::config::AppConfig;

pub const MEMORY_STORE_URL: &str = "memory://";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub passwords: PasswordService,
}

impl AppState {
    /// Connects to Postgres and applies migrations. `DATABASE_URL=memory://`
    /// selects the in-process store instead.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn UserStore> = if config.database_url == MEMORY_STORE_URL {
            tracing::warn!("using in-memory credential store; users are lost on restart");
            Arc::new(MemoryUserStore::new())
        } else {
            let store =
                PgUserStore::connect(&config.database_url, config.store_timeout()).await?;
            store.migrate().await?;
            Arc::new(store)
        };
        Self::from_parts(store, Arc::new(config))
    }

    pub fn from_parts(store: Arc<dyn UserStore>, config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let keys = JwtKeys::new(&config.jwt);
        let passwords = PasswordService::new(&config.password)?;
        Ok(Self {
            store,
            config,
            keys,
            passwords,
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with(|_| {})
    }

    #[cfg(test)]
    pub fn fake_with(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        use crate::config::{JwtConfig, PasswordConfig};

        let mut config = AppConfig {
            database_url: MEMORY_STORE_URL.into(),
            host: "127.0.0.1".into(),
            port: 0,
            store_timeout_secs: 1,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 60 * 24 * 7,
                leeway_secs: 0,
            },
            password: PasswordConfig {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        };
        tweak(&mut config);

        Self::from_parts(Arc::new(MemoryUserStore::new()), Arc::new(config)).expect("fake state")
    }
}
