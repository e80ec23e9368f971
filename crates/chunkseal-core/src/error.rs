use thiserror::Error;

pub type ChunkSealResult<T> = Result<T, ChunkSealError>;

#[derive(Debug, Error)]
pub enum ChunkSealError {
    #[error("config error: {0}")]
    Config(String),

    #[error("key error: {0}")]
    Key(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
