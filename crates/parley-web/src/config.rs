use config::{Config as ConfigLoader, ConfigError, Environment, File};
use parley_types::Theme;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub backend_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_max_sessions() -> usize {
    1000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            request_timeout_secs: default_request_timeout_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    #[serde(default)]
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Http,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    pub base_url: String,
    #[serde(default = "default_backend_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_backend_timeout_ms() -> u64 {
    30_000
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            base_url: "http://127.0.0.1:2024".to_string(),
            timeout_ms: default_backend_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub app_title: String,
    #[serde(default)]
    pub default_theme: Theme,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            app_title: "Parley Chatbot".to_string(),
            default_theme: Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set, `dev` otherwise)
    /// 3. Environment variables: `PARLEY_<SECTION>__<KEY>`, e.g. `PARLEY_SERVER__PORT`
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("PARLEY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;

        let mut cfg: Config = config.try_deserialize()?;

        // Secrets never come from TOML
        cfg.backend_api_key = std::env::var("BACKEND_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [cors]
            enabled = true
            origins = ["http://localhost:3000"]

            [backend]
            kind = "memory"
            base_url = "http://graph:2024"

            [ui]
            app_title = "Support Bot"
            default_theme = "light"

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.request_timeout_secs, 300);
        assert_eq!(config.backend.kind, BackendKind::Memory);
        assert_eq!(config.backend.timeout_ms, 30_000);
        assert_eq!(config.ui.default_theme, Theme::Light);
        assert!(config.backend_api_key.is_none());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.server.port, 8501);
        assert_eq!(config.backend.kind, BackendKind::Http);
        assert_eq!(config.ui.app_title, "Parley Chatbot");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_shipped_default_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/default.toml");
        let config = Config::from_file(path).unwrap();

        assert_eq!(config.server.port, 8501);
        assert_eq!(config.server.max_sessions, 1000);
        assert_eq!(config.backend.base_url, "http://127.0.0.1:2024");
        assert_eq!(config.ui.default_theme, Theme::Dark);
    }
}
