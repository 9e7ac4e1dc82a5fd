//! Error types for the Yahtzee engine

use crate::core::Category;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum YahtzeeError {
    #[error("Invalid roll: {0}")]
    InvalidRoll(String),

    #[error("Invalid keep set: {0}")]
    InvalidKeepSet(String),

    #[error("Maximum of {0} rolls per turn exceeded")]
    MaxRollsExceeded(u8),

    #[error("Turn is already complete")]
    TurnAlreadyComplete,

    #[error("No dice have been rolled this turn")]
    NoRollYet,

    #[error("Category {0} is already scored")]
    CategoryAlreadyScored(Category),

    #[error("Value {0} not present in current roll")]
    ValueNotPresent(u8),

    #[error("Invalid turn state: {0}")]
    InvalidTurnState(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid script: {0}")]
    InvalidScript(String),

    #[error("Invalid game configuration: {0}")]
    InvalidConfig(String),

    #[error("Game did not finish within {0} rounds")]
    RoundLimitExceeded(u32),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for YahtzeeError {
    fn from(err: serde_json::Error) -> Self {
        YahtzeeError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, YahtzeeError>;
