//! TOML-based configuration for Atrium.
//!
//! Infrastructure configuration (server, auth, database, Google sign-in)
//! lives in `atrium.toml`. Secrets are referenced indirectly: the file
//! names an environment variable, never the secret itself.
//!
//! # Hot Reloading
//!
//! Configuration changes are detected and applied at runtime. Use
//! [`AtriumConfigManager`] for thread-safe access to the current config.

use arc_swap::ArcSwap;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Root configuration structure loaded from atrium.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtriumConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Google sign-in is optional; omitting the section disables the
    /// `/api/auth/google` flow.
    pub google: Option<GoogleConfig>,

    #[serde(default)]
    pub otp: OtpConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT secret
    pub jwt_secret_env: String,

    #[serde(default = "default_jwt_access_expiry")]
    pub jwt_access_expiry: i64,

    #[serde(default = "default_jwt_refresh_expiry")]
    pub jwt_refresh_expiry: i64,
}

fn default_jwt_access_expiry() -> i64 {
    900
}

fn default_jwt_refresh_expiry() -> i64 {
    604800
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: "JWT_SECRET".to_string(),
            jwt_access_expiry: default_jwt_access_expiry(),
            jwt_refresh_expiry: default_jwt_refresh_expiry(),
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Environment variable for a remote Turso URL (optional cloud config)
    pub turso_url_env: Option<String>,

    /// Environment variable for the Turso auth token
    pub turso_token_env: Option<String>,
}

fn default_database_url() -> String {
    "./data/atrium.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            turso_url_env: None,
            turso_token_env: None,
        }
    }
}

// ============= Google Sign-In Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// OAuth client id expected in the `aud` claim of incoming ID tokens
    pub client_id: String,

    /// Token verification endpoint; overridable for tests
    #[serde(default = "default_tokeninfo_url")]
    pub tokeninfo_url: String,
}

fn default_tokeninfo_url() -> String {
    "https://oauth2.googleapis.com/tokeninfo".to_string()
}

// ============= Phone OTP Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Verification code validity in seconds
    #[serde(default = "default_otp_ttl")]
    pub ttl_seconds: i64,
}

fn default_otp_ttl() -> i64 {
    300
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_otp_ttl(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),
}

impl AtriumConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: AtriumConfig = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration for internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_env_var(&self.auth.jwt_secret_env)?;

        if let Some(ref env) = self.database.turso_url_env {
            self.validate_env_var(env)?;
        }
        if let Some(ref env) = self.database.turso_token_env {
            self.validate_env_var(env)?;
        }

        if self.auth.jwt_access_expiry <= 0 || self.auth.jwt_refresh_expiry <= 0 {
            return Err(ConfigError::ValidationError(
                "JWT expiries must be positive".to_string(),
            ));
        }

        if let Some(ref google) = self.google {
            if google.client_id.is_empty() {
                return Err(ConfigError::ValidationError(
                    "google.client_id must not be empty".to_string(),
                ));
            }
        }

        if self.otp.ttl_seconds <= 0 {
            return Err(ConfigError::ValidationError(
                "otp.ttl_seconds must be positive".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name)
            .map(|_| ())
            .map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
    }

    /// Resolve an environment variable referenced by the config
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// The JWT signing secret
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.auth.jwt_secret_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))
    }
}

// ============= Hot Reloading Configuration Manager =============

/// Thread-safe configuration manager with hot reloading support
pub struct AtriumConfigManager {
    config: Arc<ArcSwap<AtriumConfig>>,
    config_path: PathBuf,
    watcher: RwLock<Option<RecommendedWatcher>>,
    reload_tx: Option<mpsc::UnboundedSender<()>>,
}

impl AtriumConfigManager {
    /// Create a new configuration manager and load the initial config
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        // Convert to absolute path for reliable file watching
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(ConfigError::ReadError)?
                .join(path)
        };

        let config = AtriumConfig::load(&path)?;

        Ok(Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: path,
            watcher: RwLock::new(None),
            reload_tx: None,
        })
    }

    /// Get the current configuration (lockless read)
    pub fn config(&self) -> Arc<AtriumConfig> {
        self.config.load_full()
    }

    /// Manually reload the configuration from disk
    pub fn reload(&self) -> Result<(), ConfigError> {
        info!("Reloading configuration from {:?}", self.config_path);

        let new_config = AtriumConfig::load(&self.config_path)?;
        self.config.store(Arc::new(new_config));

        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Start watching for configuration file changes
    pub fn start_watching(&mut self) -> Result<(), ConfigError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        self.reload_tx = Some(tx.clone());

        let config_path = self.config_path.clone();
        let config_arc = Arc::clone(&self.config);

        // Create debounced file watcher
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        // Send reload signal (debounced in the receiver)
                        let _ = tx.send(());
                    }
                }
                Err(e) => {
                    error!("Config watcher error: {:?}", e);
                }
            }
        })?;

        // Watch the config file's parent directory
        if let Some(parent) = self.config_path.parent() {
            watcher.watch(parent, RecursiveMode::NonRecursive)?;
        }

        *self.watcher.write() = Some(watcher);

        // Spawn reload handler with debouncing
        tokio::spawn(async move {
            let mut last_reload = std::time::Instant::now();
            let debounce_duration = Duration::from_millis(500);

            while rx.recv().await.is_some() {
                // Debounce: only reload if enough time has passed
                if last_reload.elapsed() < debounce_duration {
                    continue;
                }

                // Wait a bit for file write to complete
                tokio::time::sleep(Duration::from_millis(100)).await;

                match AtriumConfig::load(&config_path) {
                    Ok(new_config) => {
                        config_arc.store(Arc::new(new_config));
                        info!("Configuration hot-reloaded successfully");
                        last_reload = std::time::Instant::now();
                    }
                    Err(e) => {
                        warn!(
                            "Failed to hot-reload config: {}. Keeping previous config.",
                            e
                        );
                    }
                }
            }
        });

        info!("Configuration hot-reload watcher started");
        Ok(())
    }

    /// Stop watching for configuration changes
    pub fn stop_watching(&self) {
        *self.watcher.write() = None;
        info!("Configuration hot-reload watcher stopped");
    }

    /// Create a config manager directly from a config (useful for testing)
    /// This won't have file watching capabilities.
    pub fn from_config(config: AtriumConfig) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            config_path: PathBuf::from("test-config.toml"),
            watcher: RwLock::new(None),
            reload_tx: None,
        }
    }
}

impl Clone for AtriumConfigManager {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            config_path: self.config_path.clone(),
            watcher: RwLock::new(None), // Watcher is not cloned
            reload_tx: self.reload_tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn create_test_config() -> String {
        r#"
[server]
host = "127.0.0.1"
port = 4000
log_level = "debug"

[auth]
jwt_secret_env = "ATRIUM_TEST_JWT_SECRET"
jwt_access_expiry = 600

[database]
url = ":memory:"

[google]
client_id = "client-123.apps.googleusercontent.com"

[otp]
ttl_seconds = 120
"#
        .to_string()
    }

    fn set_test_env() {
        std::env::set_var("ATRIUM_TEST_JWT_SECRET", "a-test-secret-at-least-32-chars!!");
    }

    #[test]
    fn test_parse_config() {
        set_test_env();
        let config: AtriumConfig = toml::from_str(&create_test_config()).expect("parse");
        config.validate().expect("validate");

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.auth.jwt_access_expiry, 600);
        assert_eq!(config.auth.jwt_refresh_expiry, 604800); // default
        assert_eq!(config.otp.ttl_seconds, 120);
        assert!(config.google.is_some());
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        set_test_env();
        let config: AtriumConfig = toml::from_str(
            r#"
[auth]
jwt_secret_env = "ATRIUM_TEST_JWT_SECRET"
"#,
        )
        .expect("parse");

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "./data/atrium.db");
        assert!(config.google.is_none());
    }

    #[test]
    fn test_missing_env_var_fails_validation() {
        let config: AtriumConfig = toml::from_str(
            r#"
[auth]
jwt_secret_env = "ATRIUM_DEFINITELY_UNSET_VAR"
"#,
        )
        .expect("parse");

        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_load_from_file_and_manager() {
        set_test_env();
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("atrium.toml");
        let mut file = fs::File::create(&path).expect("create");
        file.write_all(create_test_config().as_bytes()).expect("write");

        let manager = AtriumConfigManager::new(&path).expect("manager");
        assert_eq!(manager.config().server.port, 4000);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            AtriumConfig::load("/nonexistent/atrium.toml"),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
