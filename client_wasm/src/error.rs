use proto::JoinRejection;
use thiserror::Error;

use crate::fsm::{FsmState, GameAction};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to decode server message: {0}")]
    Decode(postcard::Error),

    #[error("failed to encode message: {0}")]
    Encode(postcard::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] game_core::ConfigError),

    #[error("room code must be {} letters or digits", proto::ROOM_CODE_LEN)]
    InvalidCode,

    #[error("cannot {action:?} while {from:?}")]
    Transition { from: FsmState, action: GameAction },

    #[error("join rejected: {0}")]
    JoinRejected(JoinRejection),

    #[error("room creation rejected: {0}")]
    CreateRejected(String),
}
