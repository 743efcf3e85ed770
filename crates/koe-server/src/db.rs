//! Async database actor.
//!
//! Owns the `Storage` on a dedicated thread and exposes async methods
//! that communicate via channels, so the SQLite connection never crosses
//! threads and request handlers never block on it.

use std::path::Path;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};

use koe_core::error::KoeError;
use koe_core::models::{Session, User, WatchedTitle};
use koe_core::storage::Storage;

/// Cloneable handle to the DB actor thread.
#[derive(Clone)]
pub struct DbHandle {
    tx: mpsc::UnboundedSender<DbCommand>,
}

/// Commands sent to the actor thread.
enum DbCommand {
    CreateUser {
        username: String,
        password_hash: String,
        reply: oneshot::Sender<Result<User, KoeError>>,
    },
    GetUserByUsername {
        username: String,
        reply: oneshot::Sender<Result<Option<User>, KoeError>>,
    },
    CreateSession {
        session: Session,
        reply: oneshot::Sender<Result<(), KoeError>>,
    },
    GetSessionUser {
        token: String,
        now: DateTime<Utc>,
        reply: oneshot::Sender<Result<Option<User>, KoeError>>,
    },
    DeleteSession {
        token: String,
        reply: oneshot::Sender<Result<bool, KoeError>>,
    },
    PurgeExpiredSessions {
        now: DateTime<Utc>,
        reply: oneshot::Sender<Result<usize, KoeError>>,
    },
    UpsertWatchedTitle {
        watched: Box<WatchedTitle>,
        reply: oneshot::Sender<Result<WatchedTitle, KoeError>>,
    },
    GetWatchedTitles {
        user_id: i64,
        reply: oneshot::Sender<Result<Vec<WatchedTitle>, KoeError>>,
    },
    GetWatchedTitle {
        user_id: i64,
        anime_id: u64,
        reply: oneshot::Sender<Result<Option<WatchedTitle>, KoeError>>,
    },
    UpdateWatchedNotes {
        user_id: i64,
        anime_id: u64,
        notes: String,
        reply: oneshot::Sender<Result<bool, KoeError>>,
    },
    DeleteWatchedTitle {
        user_id: i64,
        anime_id: u64,
        reply: oneshot::Sender<Result<bool, KoeError>>,
    },
}

impl DbHandle {
    /// Open the database file and start the actor.
    pub fn open(path: &Path) -> Result<Self, KoeError> {
        let storage = Storage::open(path).inspect_err(|e| {
            tracing::error!(path = %path.display(), "Failed to open database: {e}")
        })?;
        Self::spawn(storage)
    }

    /// Start the actor on an in-memory database.
    pub fn open_memory() -> Result<Self, KoeError> {
        Self::spawn(Storage::open_memory()?)
    }

    fn spawn(storage: Storage) -> Result<Self, KoeError> {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("db-actor".into())
            .spawn(move || actor_loop(storage, rx))
            .inspect_err(|e| tracing::error!("Failed to spawn DB thread: {e}"))?;

        Ok(Self { tx })
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, KoeError>>) -> DbCommand,
    ) -> Result<T, KoeError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(build(reply));
        rx.await.unwrap_or(Err(KoeError::ActorClosed))
    }

    pub async fn create_user(
        &self,
        username: String,
        password_hash: String,
    ) -> Result<User, KoeError> {
        self.request(|reply| DbCommand::CreateUser {
            username,
            password_hash,
            reply,
        })
        .await
    }

    pub async fn get_user_by_username(&self, username: String) -> Result<Option<User>, KoeError> {
        self.request(|reply| DbCommand::GetUserByUsername { username, reply })
            .await
    }

    pub async fn create_session(&self, session: Session) -> Result<(), KoeError> {
        self.request(|reply| DbCommand::CreateSession { session, reply })
            .await
    }

    pub async fn get_session_user(&self, token: String) -> Result<Option<User>, KoeError> {
        self.request(|reply| DbCommand::GetSessionUser {
            token,
            now: Utc::now(),
            reply,
        })
        .await
    }

    pub async fn delete_session(&self, token: String) -> Result<bool, KoeError> {
        self.request(|reply| DbCommand::DeleteSession { token, reply })
            .await
    }

    pub async fn purge_expired_sessions(&self) -> Result<usize, KoeError> {
        self.request(|reply| DbCommand::PurgeExpiredSessions {
            now: Utc::now(),
            reply,
        })
        .await
    }

    pub async fn upsert_watched_title(
        &self,
        watched: WatchedTitle,
    ) -> Result<WatchedTitle, KoeError> {
        self.request(|reply| DbCommand::UpsertWatchedTitle {
            watched: Box::new(watched),
            reply,
        })
        .await
    }

    pub async fn get_watched_titles(&self, user_id: i64) -> Result<Vec<WatchedTitle>, KoeError> {
        self.request(|reply| DbCommand::GetWatchedTitles { user_id, reply })
            .await
    }

    pub async fn get_watched_title(
        &self,
        user_id: i64,
        anime_id: u64,
    ) -> Result<Option<WatchedTitle>, KoeError> {
        self.request(|reply| DbCommand::GetWatchedTitle {
            user_id,
            anime_id,
            reply,
        })
        .await
    }

    pub async fn update_watched_notes(
        &self,
        user_id: i64,
        anime_id: u64,
        notes: String,
    ) -> Result<bool, KoeError> {
        self.request(|reply| DbCommand::UpdateWatchedNotes {
            user_id,
            anime_id,
            notes,
            reply,
        })
        .await
    }

    pub async fn delete_watched_title(&self, user_id: i64, anime_id: u64) -> Result<bool, KoeError> {
        self.request(|reply| DbCommand::DeleteWatchedTitle {
            user_id,
            anime_id,
            reply,
        })
        .await
    }
}

fn actor_loop(storage: Storage, mut rx: mpsc::UnboundedReceiver<DbCommand>) {
    while let Some(cmd) = rx.blocking_recv() {
        match cmd {
            DbCommand::CreateUser {
                username,
                password_hash,
                reply,
            } => {
                let _ = reply.send(storage.create_user(&username, &password_hash));
            }
            DbCommand::GetUserByUsername { username, reply } => {
                let _ = reply.send(storage.get_user_by_username(&username));
            }
            DbCommand::CreateSession { session, reply } => {
                let _ = reply.send(storage.create_session(&session));
            }
            DbCommand::GetSessionUser { token, now, reply } => {
                let _ = reply.send(storage.get_session_user(&token, now));
            }
            DbCommand::DeleteSession { token, reply } => {
                let _ = reply.send(storage.delete_session(&token));
            }
            DbCommand::PurgeExpiredSessions { now, reply } => {
                let _ = reply.send(storage.purge_expired_sessions(now));
            }
            DbCommand::UpsertWatchedTitle { watched, reply } => {
                let _ = reply.send(storage.upsert_watched_title(&watched));
            }
            DbCommand::GetWatchedTitles { user_id, reply } => {
                let _ = reply.send(storage.get_watched_titles(user_id));
            }
            DbCommand::GetWatchedTitle {
                user_id,
                anime_id,
                reply,
            } => {
                let _ = reply.send(storage.get_watched_title(user_id, anime_id));
            }
            DbCommand::UpdateWatchedNotes {
                user_id,
                anime_id,
                notes,
                reply,
            } => {
                let _ = reply.send(storage.update_watched_notes(user_id, anime_id, &notes));
            }
            DbCommand::DeleteWatchedTitle {
                user_id,
                anime_id,
                reply,
            } => {
                let _ = reply.send(storage.delete_watched_title(user_id, anime_id));
            }
        }
    }
    tracing::debug!("DB actor stopped");
}
