use crate::chat::RoleLookup;
use crate::types::{AppError, ChatMessage, Result, Role, RoomKind};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection, Database};
use std::sync::Arc;

/// Client for the portal's directory store.
pub struct DirectoryClient {
    /// Kept so the database handle outlives the connection cloned below.
    #[allow(dead_code)]
    db: Database,
    /// Single shared connection. Opening a connection per operation would
    /// give every call its own empty database when the path is `:memory:`,
    /// so the constructor opens one connection and every operation clones it.
    conn: Connection,
}

/// A user profile row.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    /// Absent for accounts provisioned through Google sign-in.
    pub password_hash: Option<String>,
    pub name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub google_sub: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A refresh session row. One row per outstanding refresh token.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub expires_at: i64,
}

/// A chat room row.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: String,
    pub kind: RoomKind,
    pub created_by: String,
    pub created_at: i64,
}

impl DirectoryClient {
    /// Open (or create) a local database file.
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open local database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;
        let client = Self { db, conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    /// In-memory database for tests.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    /// Connect to a remote Turso database.
    #[cfg(feature = "turso")]
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;
        let client = Self { db, conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    pub fn connection(&self) -> Result<Connection> {
        Ok(self.conn.clone())
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT,
                name TEXT NOT NULL,
                role TEXT NOT NULL,
                phone TEXT,
                google_sub TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Sessions table (refresh token hashes)
        conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                token_hash TEXT NOT NULL,
                expires_at INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create sessions table: {}", e)))?;

        // Password reset tokens
        conn.execute(
            "CREATE TABLE IF NOT EXISTS password_resets (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                token_hash TEXT NOT NULL,
                expires_at INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create password_resets table: {}", e)))?;

        // Chat rooms
        conn.execute(
            "CREATE TABLE IF NOT EXISTS rooms (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                created_by TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create rooms table: {}", e)))?;

        // Chat messages
        conn.execute(
            "CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                room_id TEXT NOT NULL,
                sender_id TEXT NOT NULL,
                text TEXT NOT NULL,
                sent_at INTEGER NOT NULL,
                FOREIGN KEY (room_id) REFERENCES rooms(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create messages table: {}", e)))?;

        Ok(())
    }

    // ============= User operations =============

    pub async fn create_user(
        &self,
        id: &str,
        email: &str,
        password_hash: Option<&str>,
        name: &str,
        role: Role,
    ) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO users (id, email, password_hash, name, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (id, email, password_hash, name, role.as_str(), now, now),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;

        Ok(())
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_user("email = ?", email).await
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.query_user("id = ?", id).await
    }

    pub async fn get_user_by_google_sub(&self, google_sub: &str) -> Result<Option<User>> {
        self.query_user("google_sub = ?", google_sub).await
    }

    async fn query_user(&self, predicate: &str, value: &str) -> Result<Option<User>> {
        let conn = self.connection()?;

        let sql = format!(
            "SELECT id, email, password_hash, name, role, phone, google_sub, created_at, updated_at
             FROM users WHERE {}",
            predicate
        );
        let mut rows = conn
            .query(&sql, [value])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            let role_str: String = row.get(4).map_err(|e| AppError::Database(e.to_string()))?;
            Ok(Some(User {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                email: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                password_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
                name: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
                role: Role::parse(&role_str)
                    .ok_or_else(|| AppError::Database(format!("Unknown role '{}'", role_str)))?,
                phone: row.get(5).map_err(|e| AppError::Database(e.to_string()))?,
                google_sub: row.get(6).map_err(|e| AppError::Database(e.to_string()))?,
                created_at: row.get(7).map_err(|e| AppError::Database(e.to_string()))?,
                updated_at: row.get(8).map_err(|e| AppError::Database(e.to_string()))?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Merge-style profile update: only the provided fields change.
    pub async fn merge_profile(
        &self,
        user_id: &str,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "UPDATE users SET
                name = COALESCE(?, name),
                phone = COALESCE(?, phone),
                updated_at = ?
             WHERE id = ?",
            (name, phone, now, user_id),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to update profile: {}", e)))?;

        Ok(())
    }

    /// Record a verified phone number for the account (credential link).
    pub async fn link_phone(&self, user_id: &str, phone: &str) -> Result<()> {
        self.merge_profile(user_id, None, Some(phone)).await
    }

    /// Attach a Google account id to an existing user (credential link).
    pub async fn link_google(&self, user_id: &str, google_sub: &str) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "UPDATE users SET google_sub = ?, updated_at = ? WHERE id = ?",
            (google_sub, now, user_id),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to link Google account: {}", e)))?;

        Ok(())
    }

    // ============= Session operations =============

    pub async fn create_session(
        &self,
        id: &str,
        user_id: &str,
        token_hash: &str,
        expires_at: i64,
    ) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (id, user_id, token_hash, expires_at, now),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create session: {}", e)))?;

        Ok(())
    }

    /// Look up a session by the sha256 hash of its refresh token.
    pub async fn get_session_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, user_id, token_hash, expires_at FROM sessions WHERE token_hash = ?",
                [token_hash],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query session: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Ok(Some(Session {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                user_id: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                token_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
                expires_at: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Remove a session, revoking its refresh token.
    pub async fn delete_session(&self, id: &str) -> Result<()> {
        let conn = self.connection()?;

        conn.execute("DELETE FROM sessions WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete session: {}", e)))?;

        Ok(())
    }

    pub async fn create_password_reset(
        &self,
        id: &str,
        user_id: &str,
        token_hash: &str,
        expires_at: i64,
    ) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO password_resets (id, user_id, token_hash, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (id, user_id, token_hash, expires_at, now),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create password reset: {}", e)))?;

        Ok(())
    }

    // ============= Chat operations =============

    /// Create the room if it does not exist yet.
    ///
    /// Insert-or-ignore: when two first messages race, the first writer
    /// wins and the second send proceeds against the existing room. The
    /// check-then-act window at the caller is deliberate (see chat module
    /// docs); this just keeps the loser from failing.
    pub async fn create_room_if_absent(
        &self,
        room_id: &str,
        kind: RoomKind,
        created_by: &str,
    ) -> Result<bool> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO rooms (id, kind, created_by, created_at)
                 VALUES (?, ?, ?, ?)",
                (room_id, kind.as_str(), created_by, now),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create room: {}", e)))?;

        Ok(inserted > 0)
    }

    pub async fn get_room(&self, room_id: &str) -> Result<Option<Room>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, kind, created_by, created_at FROM rooms WHERE id = ?",
                [room_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query room: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            let kind_str: String = row.get(1).map_err(|e| AppError::Database(e.to_string()))?;
            Ok(Some(Room {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                kind: RoomKind::parse(&kind_str)
                    .ok_or_else(|| AppError::Database(format!("Unknown room kind '{}'", kind_str)))?,
                created_by: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
                created_at: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Append a message with a server-assigned timestamp and return it.
    pub async fn append_message(
        &self,
        id: &str,
        room_id: &str,
        sender_id: &str,
        text: &str,
    ) -> Result<ChatMessage> {
        let conn = self.connection()?;
        let sent_at = Utc::now().timestamp_millis();

        conn.execute(
            "INSERT INTO messages (id, room_id, sender_id, text, sent_at)
             VALUES (?, ?, ?, ?, ?)",
            (id, room_id, sender_id, text, sent_at),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to append message: {}", e)))?;

        Ok(ChatMessage {
            id: id.to_string(),
            room_id: room_id.to_string(),
            sender_id: sender_id.to_string(),
            text: text.to_string(),
            sent_at,
        })
    }

    /// Full message list for a room, server timestamp ascending.
    ///
    /// This ordering is the one subscribers render; ties break by insert
    /// order so repeated snapshots never reshuffle.
    pub async fn get_room_messages(&self, room_id: &str) -> Result<Vec<ChatMessage>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, room_id, sender_id, text, sent_at FROM messages
                 WHERE room_id = ? ORDER BY sent_at ASC, rowid ASC",
                [room_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query messages: {}", e)))?;

        let mut messages = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            messages.push(ChatMessage {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                room_id: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                sender_id: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
                text: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
                sent_at: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
            });
        }

        Ok(messages)
    }
}

/// Role lookup backed by the directory store, with the chat module's
/// fallback rules layered on top by the caller.
pub struct DirectoryRoleLookup {
    directory: Arc<DirectoryClient>,
}

impl DirectoryRoleLookup {
    pub fn new(directory: Arc<DirectoryClient>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl RoleLookup for DirectoryRoleLookup {
    async fn role_of(&self, user_id: &str) -> Result<Option<Role>> {
        Ok(self
            .directory
            .get_user_by_id(user_id)
            .await?
            .map(|user| user.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_user_round_trip() {
        let db = DirectoryClient::new_memory().await.expect("db");
        db.create_user("u-1", "anita@campus.edu", Some("$argon2$hash"), "Anita Sharma", Role::Faculty)
            .await
            .expect("create");

        let user = db
            .get_user_by_email("anita@campus.edu")
            .await
            .expect("query")
            .expect("found");
        assert_eq!(user.id, "u-1");
        assert_eq!(user.role, Role::Faculty);
        assert!(user.phone.is_none());

        assert!(db.get_user_by_email("nobody@campus.edu").await.expect("query").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = DirectoryClient::new_memory().await.expect("db");
        db.create_user("u-1", "a@campus.edu", None, "A", Role::Student)
            .await
            .expect("create");
        assert!(db
            .create_user("u-2", "a@campus.edu", None, "B", Role::Student)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_merge_profile_touches_only_given_fields() {
        let db = DirectoryClient::new_memory().await.expect("db");
        db.create_user("u-1", "a@campus.edu", None, "Original Name", Role::Student)
            .await
            .expect("create");

        db.link_phone("u-1", "+15550100").await.expect("link phone");
        let user = db.get_user_by_id("u-1").await.expect("query").expect("found");
        assert_eq!(user.name, "Original Name");
        assert_eq!(user.phone.as_deref(), Some("+15550100"));

        db.merge_profile("u-1", Some("New Name"), None).await.expect("merge");
        let user = db.get_user_by_id("u-1").await.expect("query").expect("found");
        assert_eq!(user.name, "New Name");
        assert_eq!(user.phone.as_deref(), Some("+15550100"));
    }

    #[tokio::test]
    async fn test_session_lookup_and_revocation() {
        let db = DirectoryClient::new_memory().await.expect("db");
        db.create_user("u-1", "a@campus.edu", None, "A", Role::Student)
            .await
            .expect("create user");

        let expires = Utc::now().timestamp() + 3600;
        db.create_session("s-1", "u-1", "hash-abc", expires)
            .await
            .expect("create session");

        let session = db
            .get_session_by_token_hash("hash-abc")
            .await
            .expect("query")
            .expect("found");
        assert_eq!(session.id, "s-1");
        assert_eq!(session.user_id, "u-1");
        assert_eq!(session.expires_at, expires);

        assert!(db
            .get_session_by_token_hash("hash-unknown")
            .await
            .expect("query")
            .is_none());

        db.delete_session("s-1").await.expect("delete");
        assert!(db
            .get_session_by_token_hash("hash-abc")
            .await
            .expect("query")
            .is_none());
    }

    #[tokio::test]
    async fn test_room_create_if_absent_is_idempotent() {
        let db = DirectoryClient::new_memory().await.expect("db");

        let created = db
            .create_room_if_absent("alice--bob", RoomKind::Support, "alice")
            .await
            .expect("create");
        assert!(created);

        // Second creation (the losing side of the race) is a no-op.
        let created_again = db
            .create_room_if_absent("alice--bob", RoomKind::Direct, "bob")
            .await
            .expect("create again");
        assert!(!created_again);

        // First writer wins, including the kind.
        let room = db.get_room("alice--bob").await.expect("query").expect("found");
        assert_eq!(room.kind, RoomKind::Support);
        assert_eq!(room.created_by, "alice");
    }

    #[tokio::test]
    async fn test_messages_ordered_by_server_timestamp() {
        let db = DirectoryClient::new_memory().await.expect("db");
        db.create_room_if_absent("alice--bob", RoomKind::Direct, "alice")
            .await
            .expect("room");

        for i in 0..5 {
            db.append_message(&format!("m-{}", i), "alice--bob", "alice", "hello")
                .await
                .expect("append");
        }

        let messages = db.get_room_messages("alice--bob").await.expect("list");
        assert_eq!(messages.len(), 5);
        let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m-0", "m-1", "m-2", "m-3", "m-4"]);
        assert!(messages.windows(2).all(|w| w[0].sent_at <= w[1].sent_at));
    }

    #[tokio::test]
    async fn test_directory_role_lookup() {
        let db = Arc::new(DirectoryClient::new_memory().await.expect("db"));
        db.create_user("u-1", "a@campus.edu", None, "A", Role::Admin)
            .await
            .expect("create");

        let lookup = DirectoryRoleLookup::new(Arc::clone(&db));
        use crate::chat::RoleLookup as _;
        assert_eq!(lookup.role_of("u-1").await.expect("lookup"), Some(Role::Admin));
        assert_eq!(lookup.role_of("ghost").await.expect("lookup"), None);
    }
}
