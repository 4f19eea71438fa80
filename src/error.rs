//! Error types for the werewolf engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Player not found: {0}")]
    PlayerNotFound(u32),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("Corrupt game state: {0}")]
    CorruptState(String),

    #[error("Actor failure: {0}")]
    ActorFailure(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
