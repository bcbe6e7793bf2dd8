// src/database.rs
// SQLite persistence for accounts, chat history, and case reminders.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Login role chosen on the opening screen. Stored in the `users` and
/// `history` tables as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Lawyer,
    Civilian,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Lawyer => "lawyer",
            Role::Civilian => "civilian",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "lawyer" => Some(Role::Lawyer),
            "civilian" => Some(Role::Civilian),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Role::Lawyer => "Lawyer",
            Role::Civilian => "Civilian",
        }
    }
}

/// One transcript entry, either side of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub is_user: bool,
    pub content: String,
}

/// Sidebar entry for a stored conversation: id plus an excerpt of the
/// first user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTitle {
    pub conversation_id: String,
    pub title: String,
}

/// A saved case deadline reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: i64,
    pub case_number: String,
    pub client_email: String,
    pub lawyer_email: String,
    pub deadline_date: String,
    pub message: String,
    pub created_at: String,
}

/// Result of a registration attempt. Duplicate usernames are an expected
/// outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    UsernameTaken,
}

/// Stored role and email for a username/password match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRecord {
    pub role: String,
    pub email: String,
}

/// Unsalted SHA-256 hex digest of the password, as stored in `users`.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

// Manual Debug implementation since Mutex<Connection> doesn't implement Debug
impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("conn", &"Arc<Mutex<Connection>>")
            .finish()
    }
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Database {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE,
                password TEXT,
                role TEXT,
                email TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT,
                role TEXT,
                conversation_id TEXT,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP,
                is_user_message BOOLEAN,
                message TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS reminders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                case_number TEXT,
                client_email TEXT,
                lawyer_email TEXT,
                deadline_date TEXT,
                message TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        Ok(())
    }

    /// Inserts a new account with the hashed password. The UNIQUE
    /// constraint on username turns duplicates into `UsernameTaken`.
    pub fn register_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        email: Option<&str>,
    ) -> Result<RegisterOutcome> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT INTO users (username, password, role, email) VALUES (?1, ?2, ?3, ?4)",
            params![username, hash_password(password), role.as_str(), email],
        );

        match inserted {
            Ok(_) => Ok(RegisterOutcome::Created),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Ok(RegisterOutcome::UsernameTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Looks up the stored role and email for the credentials. Returns
    /// `None` when no row matches; role checking is the caller's job.
    pub fn login_user(&self, username: &str, password: &str) -> Result<Option<LoginRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT role, email FROM users WHERE username = ?1 AND password = ?2")?;

        let mut rows = stmt.query_map(params![username, hash_password(password)], |row| {
            Ok(LoginRecord {
                role: row.get(0)?,
                email: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            })
        })?;

        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    pub fn save_chat_message(
        &self,
        username: &str,
        role: Role,
        conversation_id: &str,
        is_user_message: bool,
        message: &str,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO history (username, role, conversation_id, is_user_message, message)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                username,
                role.as_str(),
                conversation_id,
                is_user_message,
                message
            ],
        )?;

        Ok(())
    }

    /// Returns one entry per conversation, titled with an excerpt of the
    /// earliest user message, newest conversation first. Row ids break
    /// ties between messages stored within the same second.
    pub fn conversation_titles(&self, username: &str) -> Result<Vec<ConversationTitle>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT h.conversation_id, h.message
             FROM history h
             INNER JOIN (
                 SELECT conversation_id, MIN(id) AS first_id, MIN(timestamp) AS first_ts
                 FROM history
                 WHERE username = ?1 AND is_user_message = 1
                 GROUP BY conversation_id
             ) firsts ON h.id = firsts.first_id
             ORDER BY firsts.first_ts DESC, firsts.first_id DESC",
        )?;

        let rows = stmt.query_map(params![username], |row| {
            let conversation_id: String = row.get(0)?;
            let message: String = row.get(1)?;
            Ok(ConversationTitle {
                conversation_id,
                title: title_excerpt(&message),
            })
        })?;

        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn messages_by_conversation(&self, conversation_id: &str) -> Result<Vec<ChatTurn>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT is_user_message, message FROM history
             WHERE conversation_id = ?1
             ORDER BY timestamp ASC, id ASC",
        )?;

        let rows = stmt.query_map(params![conversation_id], |row| {
            Ok(ChatTurn {
                is_user: row.get(0)?,
                content: row.get(1)?,
            })
        })?;

        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Stores a reminder and returns its row id. `deadline_date` is
    /// already formatted as YYYY-MM-DD.
    pub fn save_reminder(
        &self,
        case_number: &str,
        client_email: &str,
        lawyer_email: &str,
        deadline_date: &str,
        message: &str,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO reminders (case_number, client_email, lawyer_email, deadline_date, message)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![case_number, client_email, lawyer_email, deadline_date, message],
        )?;

        Ok(conn.last_insert_rowid())
    }

    pub fn all_reminders(&self) -> Result<Vec<Reminder>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, case_number, client_email, lawyer_email, deadline_date, message, created_at
             FROM reminders
             ORDER BY deadline_date ASC, id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Reminder {
                id: row.get(0)?,
                case_number: row.get(1)?,
                client_email: row.get(2)?,
                lawyer_email: row.get(3)?,
                deadline_date: row.get(4)?,
                message: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                created_at: row.get(6)?,
            })
        })?;

        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Deletes one reminder. Returns false when the id did not exist.
    pub fn delete_reminder(&self, reminder_id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM reminders WHERE id = ?1",
            params![reminder_id],
        )?;

        Ok(deleted > 0)
    }
}

/// First 45 characters of the message with a trailing ellipsis when
/// truncated. Blank messages fall back to a placeholder title.
fn title_excerpt(message: &str) -> String {
    if message.is_empty() {
        return "User message".to_string();
    }
    if message.chars().count() > 45 {
        let head: String = message.chars().take(45).collect();
        format!("{}...", head)
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("users.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn password_hash_matches_sha256_hex() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn register_then_login_round_trip() {
        let (_dir, db) = temp_db();
        let outcome = db
            .register_user("asha", "secret", Role::Lawyer, Some("asha@example.com"))
            .unwrap();
        assert_eq!(outcome, RegisterOutcome::Created);

        let record = db.login_user("asha", "secret").unwrap().unwrap();
        assert_eq!(record.role, "lawyer");
        assert_eq!(record.email, "asha@example.com");

        assert!(db.login_user("asha", "wrong").unwrap().is_none());
        assert!(db.login_user("nobody", "secret").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_reported_not_fatal() {
        let (_dir, db) = temp_db();
        db.register_user("ravi", "one", Role::Civilian, None).unwrap();
        let outcome = db
            .register_user("ravi", "two", Role::Lawyer, None)
            .unwrap();
        assert_eq!(outcome, RegisterOutcome::UsernameTaken);
    }

    #[test]
    fn missing_email_logs_in_with_empty_string() {
        let (_dir, db) = temp_db();
        db.register_user("ravi", "pw", Role::Civilian, None).unwrap();
        let record = db.login_user("ravi", "pw").unwrap().unwrap();
        assert_eq!(record.email, "");
    }

    #[test]
    fn title_excerpt_truncates_at_45_chars() {
        let long = "a".repeat(60);
        let excerpt = title_excerpt(&long);
        assert_eq!(excerpt.chars().count(), 48);
        assert!(excerpt.ends_with("..."));

        assert_eq!(title_excerpt("short question"), "short question");
        assert_eq!(title_excerpt(""), "User message");
    }
}
