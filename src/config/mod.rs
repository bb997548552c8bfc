use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: u64,
}

/// SMTP settings. An empty `smtp_host` puts the mailer in no-op mode.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: String,
    #[serde(default)]
    pub use_starttls: bool,
    pub verification_base_url: Option<String>,
    pub password_reset_base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    10
}

fn default_expiry_hours() -> u64 {
    // one week
    24 * 7
}

fn default_smtp_port() -> u16 {
    587
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "postgres://localhost/quill")?
            .set_default("database.max_connections", 10)?
            .set_default("storage.backend", "postgres")?
            .set_default("jwt.secret", "development-secret-change-in-production")?
            .set_default("jwt.expiry_hours", 24 * 7)?
            .set_default("email.smtp_host", "")?
            .set_default("email.smtp_port", 587)?
            .set_default("email.smtp_from", "Quill <no-reply@quill.dev>")?
            .set_default("email.use_starttls", true)?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Configuration for tests and local runs: in-memory storage, no SMTP.
    pub fn for_memory(jwt_secret: &str) -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: default_max_connections(),
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
            },
            jwt: JwtConfig {
                secret: jwt_secret.to_string(),
                expiry_hours: default_expiry_hours(),
            },
            email: EmailConfig {
                smtp_host: String::new(),
                smtp_port: default_smtp_port(),
                smtp_username: None,
                smtp_password: None,
                smtp_from: "Quill <no-reply@quill.dev>".to_string(),
                use_starttls: false,
                verification_base_url: None,
                password_reset_base_url: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_parses_lowercase() {
        let backend: StorageBackend = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(backend, StorageBackend::Memory);
        let backend: StorageBackend = serde_json::from_str("\"postgres\"").unwrap();
        assert_eq!(backend, StorageBackend::Postgres);
    }

    #[test]
    fn memory_config_disables_smtp() {
        let config = Config::for_memory("secret");
        assert!(config.email.smtp_host.is_empty());
        assert_eq!(config.jwt.expiry_hours, 168);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }
}
