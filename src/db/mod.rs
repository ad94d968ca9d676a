//! Directory store.
//!
//! A libsql-backed document/relational store holding user profiles and
//! roles, refresh sessions, chat rooms, and chat messages. Runs against a
//! local database file by default, `:memory:` in tests, or a remote Turso
//! instance when the `turso` feature and env configuration are present.

/// The libsql directory client.
pub mod directory;

pub use directory::{DirectoryClient, DirectoryRoleLookup, Room, User};
