pub mod config;
pub mod error;

pub use config::{ChunkSealConfig, CipherConfig, LogConfig};
pub use error::{ChunkSealError, ChunkSealResult};
