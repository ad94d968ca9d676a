//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Authentication handlers (register, login, Google, phone codes).
pub mod auth;
/// Calendar grid and event planner handlers.
pub mod calendar;
/// Two-party chat handlers, including the live snapshot stream.
pub mod chat;
/// Dashboard page handlers (faculty, categories, contacts, notifications, reports).
pub mod pages;
/// Persisted preference handlers.
pub mod settings;
