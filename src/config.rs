use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt: JwtConfig,
    /// bcrypt work factor for password hashing.
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "quill".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "quill-users".into()),
            ttl_hours: std::env::var("JWT_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(24),
        };
        let bcrypt_cost = std::env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        Ok(Self {
            host,
            port,
            database_url,
            jwt,
            bcrypt_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_fills_listener_and_policy_defaults() {
        std::env::set_var("DATABASE_URL", "postgres://localhost/quill-test");
        std::env::set_var("JWT_SECRET", "test-secret");
        std::env::remove_var("APP_HOST");
        std::env::remove_var("APP_PORT");
        std::env::remove_var("JWT_TTL_HOURS");
        std::env::remove_var("BCRYPT_COST");

        let cfg = AppConfig::from_env().expect("config");
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.jwt.ttl_hours, 24);
        assert_eq!(cfg.bcrypt_cost, 10);
    }
}
