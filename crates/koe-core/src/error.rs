use thiserror::Error;

#[derive(Debug, Error)]
pub enum KoeError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("username already taken: {0}")]
    UsernameTaken(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("database actor closed")]
    ActorClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
