/// Database module for managing user credentials

pub mod password;
mod types;

pub use types::DbUser;

use rusqlite::{Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

const SCHEMA_SQL: &str = include_str!("../../sql/init_users.sql");

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Database lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, DbError>;

pub struct UserDbManager {
    db: Mutex<Connection>,
}

impl UserDbManager {
    /// Opens (or creates) the database at `db_path` and initializes the schema
    pub fn open(db_path: &Path) -> Result<Self> {
        Self::with_connection(Connection::open(db_path)?)
    }

    /// Creates a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Looks up a user by username
    pub fn find_user(&self, username: &str) -> Result<Option<DbUser>> {
        let db = self.db.lock().map_err(|_| DbError::Poisoned)?;
        let user = db
            .query_row(
                "SELECT id, username, password, subject FROM users WHERE username = ?",
                [username],
                |row| {
                    Ok(DbUser {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                        subject: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(user)
    }

    /// Inserts a new user, returning its row ID.
    ///
    /// `password_hash` must already be hashed; see [`password::hash`].
    pub fn create_user(&self, username: &str, password_hash: &str, subject: &str) -> Result<i64> {
        let db = self.db.lock().map_err(|_| DbError::Poisoned)?;
        let inserted = db.execute(
            "INSERT INTO users (username, password, subject, created_at)
             VALUES (?1, ?2, ?3, datetime('now'))",
            (username, password_hash, subject),
        );

        match inserted {
            Ok(_) => Ok(db.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(DbError::UsernameTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Checks a plaintext password against the stored hash for `username`.
    ///
    /// Returns the user only when both exist and match.
    pub fn verify_credentials(&self, username: &str, plain: &str) -> Result<Option<DbUser>> {
        Ok(self
            .find_user(username)?
            .filter(|user| password::verify(plain, &user.password_hash)))
    }
}
