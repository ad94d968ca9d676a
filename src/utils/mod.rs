//! Configuration and preference utilities.

/// TOML configuration loading, validation, and hot reloading.
pub mod config;
/// Persisted UI preference store (theme, font size, last email).
pub mod prefs;
