use crate::types::{AppError, Result, Role, RoomKind};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;

/// Separator joining the two participant ids of a room.
const ROOM_SEPARATOR: &str = "--";

/// Composite identifier of a two-party conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId {
    first: String,
    second: String,
}

impl RoomId {
    /// Build a room id from two participant ids, preserving their order.
    pub fn new(first: &str, second: &str) -> Result<Self> {
        if first.is_empty() || second.is_empty() || first.contains(ROOM_SEPARATOR) || second.contains(ROOM_SEPARATOR) {
            return Err(AppError::InvalidInput(format!(
                "Invalid chat participant ids: '{}', '{}'",
                first, second
            )));
        }
        Ok(Self {
            first: first.to_string(),
            second: second.to_string(),
        })
    }

    /// Parse a raw room identifier.
    ///
    /// An identifier that does not split into exactly two non-empty
    /// participant ids is an explicit error; the caller aborts the send.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split(ROOM_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(b), None) if !a.is_empty() && !b.is_empty() => Self::new(a, b),
            _ => Err(AppError::InvalidInput(format!(
                "Malformed room id '{}': expected exactly two participant ids joined by '{}'",
                raw, ROOM_SEPARATOR
            ))),
        }
    }

    pub fn participants(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.first == user_id || self.second == user_id
    }

    /// The participant that is not `user_id`, if `user_id` is a member.
    pub fn counterpart(&self, user_id: &str) -> Option<&str> {
        if self.first == user_id {
            Some(&self.second)
        } else if self.second == user_id {
            Some(&self.first)
        } else {
            None
        }
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.first, ROOM_SEPARATOR, self.second)
    }
}

/// Role lookup used when a room is first created.
///
/// Injectable so tests can substitute deterministic role data instead of
/// the directory-backed implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleLookup: Send + Sync {
    /// Known role of `user_id`, or `None` when the directory has no entry.
    async fn role_of(&self, user_id: &str) -> Result<Option<Role>>;
}

/// Fixed id -> role table, used as a directory-independent fallback and as
/// a deterministic lookup in tests and demos.
#[derive(Debug, Default, Clone)]
pub struct StaticRoleTable {
    roles: HashMap<String, Role>,
}

impl StaticRoleTable {
    pub fn new(entries: impl IntoIterator<Item = (String, Role)>) -> Self {
        Self {
            roles: entries.into_iter().collect(),
        }
    }
}

#[async_trait]
impl RoleLookup for StaticRoleTable {
    async fn role_of(&self, user_id: &str) -> Result<Option<Role>> {
        Ok(self.roles.get(user_id).copied())
    }
}

/// Derive the room kind from the two participants' roles.
///
/// Support when a student talks to admin/faculty, direct otherwise.
pub fn room_kind(first: Role, second: Role) -> RoomKind {
    let support = (first == Role::Student && second.is_staff())
        || (second == Role::Student && first.is_staff());
    if support {
        RoomKind::Support
    } else {
        RoomKind::Direct
    }
}

/// Classify both participants of a room.
///
/// Each participant is resolved through `lookup`; when the directory has
/// no entry the requester falls back to their own known role and any other
/// unknown id defaults to student.
pub async fn classify_participants(
    lookup: &dyn RoleLookup,
    room: &RoomId,
    requester_id: &str,
    requester_role: Role,
) -> Result<(Role, Role)> {
    let resolve = |user_id: &str, found: Option<Role>| match found {
        Some(role) => role,
        None if user_id == requester_id => requester_role,
        None => Role::Student,
    };

    let (first, second) = room.participants();
    let first_role = resolve(first, lookup.role_of(first).await?);
    let second_role = resolve(second, lookup.role_of(second).await?);
    Ok((first_role, second_role))
}
