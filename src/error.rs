//! Error type for the edges of the program
//!
//! The simulation itself cannot fail; these cover configuration, the SDL2
//! host and the control socket.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkyburstError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SDL2 reports failures as plain strings
    #[error("SDL error: {0}")]
    Sdl(String),

    #[error("invalid command: {0:?}")]
    InvalidCommand(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SkyburstError>;
