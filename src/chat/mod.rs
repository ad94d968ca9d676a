//! Two-party chat.
//!
//! A conversation is keyed by a composite room identifier (two participant
//! ids joined with `--`). The first message sent into a room classifies the
//! participants' roles, derives the room kind (support vs direct), and
//! creates the room record; every message after that is a plain append with
//! a server-assigned timestamp.
//!
//! Subscribers receive the full latest snapshot of a room's messages,
//! ordered by server timestamp ascending, on every append. There is no
//! client-side re-sorting and no incremental delta protocol.
//!
//! # Known limitation
//!
//! Room creation is a check-then-act sequence with no transaction: two
//! simultaneous first messages from both participants can race to create
//! the room. The storage layer uses insert-or-ignore so the race is
//! harmless (first writer wins), but it is deliberately not locked away.

/// Live per-room snapshot feeds.
pub mod feed;
/// Room identifiers, role classification, and room-kind derivation.
pub mod room;

pub use feed::ChatFeeds;
pub use room::{classify_participants, room_kind, RoleLookup, RoomId, StaticRoleTable};
