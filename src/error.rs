/// Error types for the arcade.

use std::path::PathBuf;

use thiserror::Error;

use crate::entities::EffectKind;

/// Everything that can go wrong while configuring or running a game.
#[derive(Error, Debug)]
pub enum ArcadeError {
    /// Terminal I/O failed.
    #[error("terminal i/o: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be read.
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::config::ArcadeConfig`].
    #[error("cannot parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config parsed but holds values the games cannot run with.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    #[error("unknown game: {0} (expected `dodge` or `snake`)")]
    UnknownGame(String),

    /// A trigger arrived while another effect session was still running.
    #[error("effect session already active ({0})")]
    EffectActive(EffectKind),

    /// Every grid cell is covered by the snake.
    #[error("no free cell left on the board")]
    NoFreeCell,
}

pub type Result<T> = std::result::Result<T, ArcadeError>;
