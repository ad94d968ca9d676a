//! Init command implementation
//!
//! Scaffolds a new Atrium project with all necessary configuration files.

use super::output::Output;
use std::fs;
use std::path::Path;

/// Result of the init operation
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (atrium.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: std::path::PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing Atrium Project");

    let base_path = &config.path;

    // Check if atrium.toml already exists
    let config_path = base_path.join("atrium.toml");
    if config_path.exists() && !config.force {
        output.warning("atrium.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    // Create directories
    output.subheader("Creating directories");

    let data_dir = base_path.join("data");
    if !data_dir.exists() {
        if let Err(e) = fs::create_dir_all(&data_dir) {
            output.error(&format!("Failed to create data: {}", e));
            return InitResult::Error(e.to_string());
        }
        output.created_dir("data");
    } else {
        output.skipped("data", "already exists");
    }

    // Create atrium.toml
    output.subheader("Creating configuration files");

    let toml_content = generate_atrium_toml(&config);
    if let Err(e) = write_file(&config_path, &toml_content, config.force) {
        output.error(&format!("Failed to create atrium.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", "atrium.toml");

    // Create .env.example
    let env_example_path = base_path.join(".env.example");
    let env_content = generate_env_example();
    if let Err(e) = write_file(&env_example_path, &env_content, config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("env", ".env.example");

    // Create .gitignore if it doesn't exist
    let gitignore_path = base_path.join(".gitignore");
    if !gitignore_path.exists() {
        if let Err(e) = write_file(&gitignore_path, generate_gitignore(), false) {
            output.warning(&format!("Failed to create .gitignore: {}", e));
        } else {
            output.created("git", ".gitignore");
        }
    } else {
        output.skipped(".gitignore", "already exists");
    }

    output.header("Next steps");
    output.info("Copy .env.example to .env and set ATRIUM_JWT_SECRET");
    output.info("Run `atrium-server` to start the portal");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_atrium_toml(config: &InitConfig) -> String {
    format!(
        r#"# Atrium server configuration
# Secrets never live in this file; the *_env keys name environment
# variables that are resolved at use time.

[server]
host = "{host}"
port = {port}
log_level = "info"

[auth]
jwt_secret_env = "ATRIUM_JWT_SECRET"
# Access tokens: 15 minutes. Refresh tokens: 7 days.
jwt_access_expiry = 900
jwt_refresh_expiry = 604800

[database]
url = "./data/atrium.db"
# Uncomment for a remote Turso database:
# turso_url_env = "TURSO_DATABASE_URL"
# turso_token_env = "TURSO_AUTH_TOKEN"

# Uncomment to enable Google sign-in:
# [google]
# client_id = "your-client-id.apps.googleusercontent.com"

[otp]
ttl_seconds = 300
"#,
        host = config.host,
        port = config.port,
    )
}

fn generate_env_example() -> &'static str {
    r#"# Atrium environment variables (copy to .env)

# Required: secret used to sign JWTs
ATRIUM_JWT_SECRET=change-me

# Optional: remote Turso database (with the `turso` feature)
# TURSO_DATABASE_URL=libsql://your-db.turso.io
# TURSO_AUTH_TOKEN=
"#
}

fn generate_gitignore() -> &'static str {
    r#"/target
.env
/data/
"#
}
