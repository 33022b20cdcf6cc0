use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Development fallback only. Operators must override `jwt.secret`
/// (e.g. `CLINICHUB_JWT__SECRET`) before exposing the service.
pub const DEFAULT_JWT_SECRET: &str = "clinichub-dev-secret-change-in-production";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: String,
    pub expiration_days: i64,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite://data/clinichub.db")?
            .set_default("jwt.secret", DEFAULT_JWT_SECRET)?
            .set_default("jwt.expiration_days", 30)?;

        // Add configuration from file if exists
        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        // Add environment variables with prefix
        builder = builder.add_source(Environment::with_prefix("CLINICHUB").separator("__"));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Whether the process is still running on the baked-in dev secret.
    pub fn using_default_secret(&self) -> bool {
        self.jwt.secret == DEFAULT_JWT_SECRET
    }
}
