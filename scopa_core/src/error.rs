use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::PlayerId;

/// Reasons the engine refuses a play. A refused play leaves the match untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PlayError {
    #[error("player {player} tried to play but it is player {turn}'s turn")]
    WrongTurn { player: PlayerId, turn: PlayerId },
    #[error("card index {index} is out of range for a hand of {hand_size}")]
    InvalidCardIndex { index: usize, hand_size: usize },
    #[error("capture index {index} is out of range for {options} capture options")]
    InvalidCaptureIndex { index: usize, options: usize },
    #[error("capture position {position} is outside a table of {table_size} cards")]
    CaptureConsistencyFault { position: usize, table_size: usize },
}

impl PlayError {
    /// Recoverable errors ask the same player for another choice.
    /// Anything else means the match state can no longer be trusted.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PlayError::CaptureConsistencyFault { .. })
    }
}
