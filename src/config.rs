use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Re-check on every authenticated request that the token's user still exists.
    pub verify_user_exists: bool,
}

/// Argon2 cost parameters. `work_factor` is the iteration count.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub work_factor: u32,
    pub memory_kib: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            work_factor: 2,
            memory_kib: 19 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub auth: AuthConfig,
    pub password: PasswordConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "messagely".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "messagely-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES").unwrap_or(60 * 24),
        };
        let auth = AuthConfig {
            verify_user_exists: env_parse("AUTH_VERIFY_USER_EXISTS").unwrap_or(true),
        };
        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            work_factor: env_parse("PASSWORD_WORK_FACTOR").unwrap_or(defaults.work_factor),
            memory_kib: env_parse("PASSWORD_MEMORY_KIB").unwrap_or(defaults.memory_kib),
        };
        Ok(Self {
            database_url,
            max_connections: env_parse("DATABASE_MAX_CONNECTIONS").unwrap_or(10),
            jwt,
            auth,
            password,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}
