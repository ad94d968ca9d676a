//! Calendar and event planning.
//!
//! This module owns the month-view calendar: deriving the day grid for a
//! displayed month, filtering and sorting the event collection, and the
//! add/details dialog lifecycle around event creation and deletion.
//!
//! # Module Structure
//!
//! - [`calendar::grid`](crate::calendar::grid) - Month grid derivation and the month cursor
//! - [`calendar::events`](crate::calendar::events) - Event records, category colors, filters
//! - [`calendar::planner`](crate::calendar::planner) - Dialog state machine and CRUD lifecycle
//!
//! All date handling is calendar-date only (`NaiveDate`); there is no
//! time-of-day or timezone component anywhere in this module, so two events
//! compare equal exactly when their `YYYY-MM-DD` forms do.

/// Event records, categories, and pure filtering/lookup functions.
pub mod events;
/// Month grid derivation and the displayed-month cursor.
pub mod grid;
/// The event board: dialog state machine and create/delete lifecycle.
pub mod planner;

pub use events::{Event, EventCategory, EventColor, Filter};
pub use grid::{month_grid, CalendarCursor};
pub use planner::{Dialog, EventBoard, EventDraft, SubmitOutcome};
