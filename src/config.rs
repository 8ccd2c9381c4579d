use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    /// Clock-skew tolerance applied to `exp`. Zero means tokens die exactly at expiry.
    pub leeway_secs: u64,
}

/// One year; longer lifetimes are a misconfiguration.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub store_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. Required keys fail fast.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{key} must be set"))
        };
        let number = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let cost = |key: &str, default: u32| -> anyhow::Result<u32> {
            lookup(key)
                .map(|v| {
                    let value = v
                        .trim()
                        .parse::<u64>()
                        .with_context(|| format!("{key} must be a number"))?;
                    u32::try_from(value).with_context(|| format!("{key} is out of range"))
                })
                .transpose()
                .map(|v| v.unwrap_or(default))
        };

        let ttl_minutes = lookup("JWT_TTL_MINUTES")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(60 * 24 * 7);
        if ttl_minutes > MAX_TTL_MINUTES {
            anyhow::bail!("JWT_TTL_MINUTES must not exceed {MAX_TTL_MINUTES}");
        }

        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "resume-builder".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "resume-builder-users".into()),
            ttl_minutes,
            leeway_secs: number("JWT_LEEWAY_SECS", 0),
        };

        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: cost("PASSWORD_MEMORY_KIB", defaults.memory_kib)?,
            iterations: cost("PASSWORD_ITERATIONS", defaults.iterations)?,
            parallelism: cost("PASSWORD_PARALLELISM", defaults.parallelism)?,
        };

        let port = lookup("APP_PORT")
            .map(|v| v.parse::<u16>().context("APP_PORT must be a port number"))
            .transpose()?
            .unwrap_or(4000);

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            store_timeout_secs: number("STORE_TIMEOUT_SECS", 5).max(1),
            jwt,
            password,
        })
    }

    pub fn store_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.store_timeout_secs)
    }
}
