use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::error::KoeError;
use crate::models::{CreditRecord, Session, User, WatchedTitle};

const SCHEMA_V1: &str = include_str!("../../../migrations/001_initial.sql");

const WATCHED_COLUMNS: &str = "id, user_id, anime_id, title, rating, description,
     cover_image_url, notes, credits, added_at";

/// SQLite-backed storage for accounts, sessions and watched lists.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, KoeError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, KoeError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    // ── Users ───────────────────────────────────────────────────

    /// Create an account. Usernames are unique ignoring case.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<User, KoeError> {
        let now = Utc::now();
        let inserted = self.conn.execute(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
            params![username, password_hash, now.to_rfc3339()],
        );
        match inserted {
            Ok(_) => Ok(User {
                id: self.conn.last_insert_rowid(),
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                created_at: now,
            }),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(KoeError::UsernameTaken(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>, KoeError> {
        self.conn
            .query_row(
                "SELECT id, username, password_hash, created_at FROM users WHERE id = ?1",
                params![id],
                |row| Ok(row_to_user(row)),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>, KoeError> {
        self.conn
            .query_row(
                "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
                params![username],
                |row| Ok(row_to_user(row)),
            )
            .optional()
            .map_err(Into::into)
    }

    // ── Sessions ────────────────────────────────────────────────

    pub fn create_session(&self, session: &Session) -> Result<(), KoeError> {
        self.conn.execute(
            "INSERT INTO sessions (token, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session.token,
                session.user_id,
                session.created_at.to_rfc3339(),
                session.expires_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_session(&self, token: &str) -> Result<Option<Session>, KoeError> {
        self.conn
            .query_row(
                "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?1",
                params![token],
                |row| {
                    let created: String = row.get(2)?;
                    let expires: String = row.get(3)?;
                    Ok(Session {
                        token: row.get(0)?,
                        user_id: row.get(1)?,
                        created_at: parse_datetime(&created),
                        expires_at: parse_datetime(&expires),
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Resolve a session token to its user, ignoring expired sessions.
    pub fn get_session_user(&self, token: &str, now: DateTime<Utc>) -> Result<Option<User>, KoeError> {
        match self.get_session(token)? {
            Some(session) if !session.is_expired(now) => self.get_user(session.user_id),
            _ => Ok(None),
        }
    }

    pub fn delete_session(&self, token: &str) -> Result<bool, KoeError> {
        let n = self
            .conn
            .execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(n > 0)
    }

    /// Drop every session that expired before `now`. Returns how many were removed.
    pub fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize, KoeError> {
        let mut stmt = self.conn.prepare("SELECT token, expires_at FROM sessions")?;
        let expired: Vec<String> = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .filter_map(|r| r.ok())
            .filter(|(_, expires)| parse_datetime(expires) <= now)
            .map(|(token, _)| token)
            .collect();

        for token in &expired {
            self.conn
                .execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        }
        Ok(expired.len())
    }

    // ── Watched titles ──────────────────────────────────────────

    /// Insert a watched title, or refresh an existing one for the same anime.
    ///
    /// A refresh replaces the catalog fields and credits but keeps the row's
    /// position, its `added_at`, and its notes unless new notes are given.
    /// Returns the stored row.
    pub fn upsert_watched_title(&self, watched: &WatchedTitle) -> Result<WatchedTitle, KoeError> {
        self.conn.execute(
            "INSERT INTO watched_title (user_id, anime_id, title, rating, description,
             cover_image_url, notes, credits, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(user_id, anime_id) DO UPDATE SET
               title = excluded.title,
               rating = excluded.rating,
               description = excluded.description,
               cover_image_url = excluded.cover_image_url,
               notes = CASE WHEN excluded.notes = '' THEN watched_title.notes
                            ELSE excluded.notes END,
               credits = excluded.credits",
            params![
                watched.user_id,
                watched.anime_id as i64,
                watched.title,
                watched.rating,
                watched.description,
                watched.cover_image_url,
                watched.notes,
                watched.credits.to_storage(),
                watched.added_at.to_rfc3339(),
            ],
        )?;

        self.get_watched_title(watched.user_id, watched.anime_id)?
            .ok_or(KoeError::Storage(rusqlite::Error::QueryReturnedNoRows))
    }

    /// All watched titles for a user, in insertion order.
    pub fn get_watched_titles(&self, user_id: i64) -> Result<Vec<WatchedTitle>, KoeError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WATCHED_COLUMNS} FROM watched_title WHERE user_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![user_id], |row| Ok(row_to_watched(row)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    pub fn get_watched_title(
        &self,
        user_id: i64,
        anime_id: u64,
    ) -> Result<Option<WatchedTitle>, KoeError> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {WATCHED_COLUMNS} FROM watched_title
                     WHERE user_id = ?1 AND anime_id = ?2"
                ),
                params![user_id, anime_id as i64],
                |row| Ok(row_to_watched(row)),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Replace a watched title's notes. Returns false if the title isn't on the list.
    pub fn update_watched_notes(
        &self,
        user_id: i64,
        anime_id: u64,
        notes: &str,
    ) -> Result<bool, KoeError> {
        let n = self.conn.execute(
            "UPDATE watched_title SET notes = ?1 WHERE user_id = ?2 AND anime_id = ?3",
            params![notes, user_id, anime_id as i64],
        )?;
        Ok(n > 0)
    }

    /// Remove a title from the list. Returns false if it wasn't there.
    pub fn delete_watched_title(&self, user_id: i64, anime_id: u64) -> Result<bool, KoeError> {
        let n = self.conn.execute(
            "DELETE FROM watched_title WHERE user_id = ?1 AND anime_id = ?2",
            params![user_id, anime_id as i64],
        )?;
        Ok(n > 0)
    }
}

fn run_migrations(conn: &Connection) -> Result<(), KoeError> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap_or(0);

    if version < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", 1)?;
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────

/// Parse a datetime string from SQLite (either RFC 3339 or SQLite's `datetime('now')` format).
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return naive.and_utc();
    }
    DateTime::default()
}

fn row_to_user(row: &rusqlite::Row<'_>) -> User {
    let created_str: String = row.get(3).unwrap_or_default();
    User {
        id: row.get(0).unwrap_or(0),
        username: row.get(1).unwrap_or_default(),
        password_hash: row.get(2).unwrap_or_default(),
        created_at: parse_datetime(&created_str),
    }
}

fn row_to_watched(row: &rusqlite::Row<'_>) -> WatchedTitle {
    let credits_str: String = row.get(8).unwrap_or_default();
    let added_str: String = row.get(9).unwrap_or_default();

    WatchedTitle {
        id: row.get(0).unwrap_or(0),
        user_id: row.get(1).unwrap_or(0),
        anime_id: row.get::<_, i64>(2).unwrap_or(0) as u64,
        title: row.get(3).unwrap_or_default(),
        rating: row.get(4).unwrap_or(None),
        description: row.get(5).unwrap_or_default(),
        cover_image_url: row.get(6).unwrap_or(None),
        notes: row.get(7).unwrap_or_default(),
        credits: CreditRecord::from_storage(&credits_str),
        added_at: parse_datetime(&added_str),
    }
}
