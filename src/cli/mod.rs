//! CLI module for Atrium
//!
//! Provides command-line interface parsing and handling for the atrium-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Atrium - Campus Portal Server
///
/// A faculty and course portal server with token-based authentication,
/// a calendar planner, two-party chat, and the dashboard pages.
#[derive(Parser, Debug)]
#[command(
    name = "atrium-server",
    version,
    about = "Atrium - Campus Portal Server",
    long_about = "A faculty and course portal server: email/password, phone code, and Google\n\
                  sign-in; a month-grid event planner; two-party chat with live snapshot\n\
                  feeds; and the dashboard directory pages.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a new project.",
    after_help = "EXAMPLES:\n    \
                  atrium-server init              # Scaffold a new Atrium project\n    \
                  atrium-server                   # Start the server (requires atrium.toml)\n    \
                  atrium-server --config my.toml  # Use a custom config file\n    \
                  atrium-server config --validate # Check the config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "atrium.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new Atrium project with configuration files
    ///
    /// Creates atrium.toml, .env.example, and the data/ directory.
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "3000")]
        port: u16,
    },

    /// Show configuration information
    Config {
        /// Show the full configuration
        #[arg(short = 'f', long)]
        full: bool,

        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
