use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub connection_string: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub sslmode: String,
    pub max_connections: Option<u32>,
    /// Log every SQL statement at info level
    pub log_queries: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer tokens file; mutating routes are open when unset
    pub tokens_file: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Postgres,
            connection_string: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            name: "imageadmission".to_string(),
            sslmode: "disable".to_string(),
            max_connections: Some(20),
            log_queries: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::builder()?
            // Add config file if it exists
            .add_source(config::File::with_name("config").required(false))
            // Environment variables like ADMISSION_DATABASE__HOST
            .add_source(
                config::Environment::with_prefix("ADMISSION")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Builder seeded with the built-in defaults
    pub fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?))
    }

    /// Get the database URL from config or environment, if one is given
    pub fn database_url(&self) -> Option<String> {
        if let Some(connection_string) = &self.database.connection_string {
            return Some(connection_string.clone());
        }

        std::env::var("DATABASE_URL").ok()
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server_address(), "0.0.0.0:8000");
        assert_eq!(config.database.backend, StoreBackend::Postgres);
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.name, "imageadmission");
        assert_eq!(config.database.sslmode, "disable");
        assert!(!config.database.log_queries);
        assert!(config.auth.tokens_file.is_none());
    }

    #[test]
    fn test_file_source_overrides_defaults() {
        let toml = r#"
            [server]
            port = 9443

            [database]
            backend = "memory"
            log_queries = true

            [auth]
            tokens_file = "/etc/admission/tokens"
        "#;

        let config: AppConfig = AppConfig::builder()
            .unwrap()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9443);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert!(config.database.log_queries);
        assert_eq!(config.database.user, "postgres");
        assert_eq!(
            config.auth.tokens_file.as_deref(),
            Some("/etc/admission/tokens")
        );
    }

    #[test]
    fn test_explicit_connection_string_wins() {
        let mut config = AppConfig::default();
        config.database.connection_string = Some("postgres://u:p@db:5432/images".to_string());
        assert_eq!(
            config.database_url().as_deref(),
            Some("postgres://u:p@db:5432/images")
        );
    }
}
