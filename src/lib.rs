//! # Atrium - Campus Portal Server
//!
//! A faculty and course portal server built in Rust: token-based
//! authentication with email/password, phone verification codes, and Google
//! sign-in; a month-grid event planner; two-party chat with live snapshot
//! feeds; and the dashboard directory pages.
//!
//! ## Overview
//!
//! Atrium can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `atrium-server` binary
//! 2. **As a library** - Import components into your own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! atrium-server = "0.2"
//! ```
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use atrium::calendar::events::{filtered_events, seed_events, Filter};
//! use atrium::calendar::grid::month_grid;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2025, 9, 7).unwrap();
//! let cells = month_grid(today);
//! let events = seed_events();
//! let visible = filtered_events(&events, &Filter::All, &Filter::All);
//! println!("{} cells, {} events", cells.len(), visible.len());
//! ```
//!
//! ### Configuration-Driven Setup
//!
//! ```rust,ignore
//! use atrium::AtriumConfigManager;
//!
//! // Load configuration from atrium.toml
//! let config_manager = AtriumConfigManager::new("atrium.toml")?;
//! let config = config_manager.config();
//! println!("listening on {}:{}", config.server.host, config.server.port);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `local-db` | Local SQLite database (default) |
//! | `turso` | Remote Turso database |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - JWT authentication, phone codes, Google sign-in
//! - [`calendar`] - Month grid, event filtering, and the planner dialogs
//! - [`chat`] - Room ids, role classification, and snapshot feeds
//! - [`db`] - Directory store (SQLite, Turso)
//! - [`pages`] - Dashboard page data and search
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration and preference persistence
//!
//! ## Architecture
//!
//! Infrastructure configuration lives in `atrium.toml` and hot-reloads on
//! change; secrets are resolved from the environment at use time, never
//! stored in the file.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// JWT authentication, middleware, phone codes, and Google sign-in.
pub mod auth;
/// Month grid, event filtering, and the planner state machine.
pub mod calendar;
/// Two-party chat rooms and live snapshot feeds.
pub mod chat;
/// Directory store (Turso/SQLite).
pub mod db;
/// Dashboard page records, search, and menus.
pub mod pages;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration and preference persistence.
pub mod utils;

// Re-export commonly used types
pub use calendar::events::{Event, EventCategory, EventColor, Filter};
pub use calendar::planner::{Dialog, EventBoard, EventDraft, SubmitOutcome};
pub use chat::feed::ChatFeeds;
pub use chat::room::{RoleLookup, RoomId};
pub use db::DirectoryClient;
pub use types::{AppError, Result, Role};
pub use utils::config::{AtriumConfig, AtriumConfigManager};

use crate::auth::google::GoogleTokenVerifier;
use crate::auth::jwt::AuthService;
use crate::auth::otp::OtpService;
use crate::pages::notifications::NotificationCenter;
use crate::utils::prefs::PreferenceStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML-based infrastructure configuration with hot-reload support
    pub config_manager: Arc<AtriumConfigManager>,
    /// Directory store (users, sessions, rooms, messages)
    pub directory: Arc<DirectoryClient>,
    /// Authentication service
    pub auth_service: Arc<AuthService>,
    /// Phone verification codes
    pub otp_service: Arc<OtpService>,
    /// Google ID token verifier; absent when Google sign-in is not configured
    pub google_verifier: Option<Arc<dyn GoogleTokenVerifier>>,
    /// Role lookup for chat room classification
    pub role_lookup: Arc<dyn RoleLookup>,
    /// Live chat snapshot feeds
    pub feeds: Arc<ChatFeeds>,
    /// Per-user planner boards, created on first touch
    pub boards: Arc<RwLock<HashMap<String, EventBoard>>>,
    /// Session notification center
    pub notifications: Arc<NotificationCenter>,
    /// Persisted UI preferences
    pub prefs: Arc<PreferenceStore>,
}
