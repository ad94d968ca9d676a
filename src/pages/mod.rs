//! Dashboard page data.
//!
//! Each page of the portal owns a small typed dataset and the pure
//! filtering/search logic its list view needs. The datasets are seeded in
//! memory; nothing here talks to the directory store.
//!
//! Record types are strict: unknown fields and missing required fields are
//! rejected when a record is deserialized, not discovered at render time.

/// Course category listing.
pub mod categories;
/// Contact directory.
pub mod contacts;
/// Faculty list with search and department filter.
pub mod faculty;
/// Generic enumerated-action menu (options/share menus).
pub mod menu;
/// Notification center with unread tracking.
pub mod notifications;
/// Summary report figures.
pub mod reports;

pub use menu::{ActionMenu, MenuItem};
