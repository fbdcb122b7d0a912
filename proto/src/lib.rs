//! Wire protocol between the pong clients and the room relay
//!
//! Uses postcard for compact binary frames over the WebSocket.

use game_core::{MatchConfig, MatchResult, Snapshot};
use postcard::{from_bytes, to_allocvec};
use serde::{Deserialize, Serialize};

/// Length of a room code
pub const ROOM_CODE_LEN: usize = 6;

/// Characters a room code is drawn from
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Normalize user-typed room code; `None` if it cannot be one
pub fn normalize_code(raw: &str) -> Option<String> {
    let code = raw.trim().to_ascii_uppercase();
    let valid = code.len() == ROOM_CODE_LEN
        && code.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b));
    valid.then_some(code)
}

// ============================================================================
// C2S Messages (Client to Server)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum C2S {
    /// Open a room and become its host
    CreateRoom {
        host_name: String,
        room_name: String,
        password: Option<String>,
        config: MatchConfig,
    },

    /// Join an open room as the client
    JoinRoom {
        code: String,
        password: Option<String>,
    },

    /// Request the open-room directory
    ListRooms,

    /// Host only: authoritative state for this tick
    StatePush { code: String, snapshot: Snapshot },

    /// Client only: target y of the client's paddle
    Input { code: String, target_y: f32 },

    /// Host only: the match just ended
    MatchOver { code: String, result: MatchResult },

    /// Ping for latency measurement
    Ping { t_ms: u32 },
}

// ============================================================================
// S2C Messages (Server to Client)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum S2C {
    /// Room opened; share `code` with the other player
    RoomCreated { code: String, config: MatchConfig },

    /// Room not opened, e.g. the configuration failed validation
    CreateRejected { reason: String },

    /// Join accepted, with the host's configuration
    Joined { code: String, config: MatchConfig },

    JoinRejected { reason: JoinRejection },

    RoomList { rooms: Vec<RoomSummary> },

    /// Both seats taken; configuration is final and play starts
    RoomReady { config: MatchConfig },

    /// The other participant left; the room no longer exists
    RoomClosed,

    /// Host state, relayed to the client. Last received wins.
    State(Snapshot),

    /// Client input, relayed to the host
    PeerInput { target_y: f32 },

    /// Host's match result, relayed to the client
    MatchOver { result: MatchResult },

    /// Pong response to ping
    Pong { t_ms: u32 },
}

/// Why a join attempt was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum JoinRejection {
    #[error("room not found")]
    NotFound,
    #[error("wrong password")]
    WrongPassword,
    #[error("room is full")]
    RoomFull,
}

/// One row of the open-room directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub code: String,
    pub host_name: String,
    pub room_name: String,
    pub has_password: bool,
    pub players: u8,
}

// ============================================================================
// Serialization Helpers
// ============================================================================

impl C2S {
    /// Serialize C2S message to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    /// Deserialize C2S message from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }

    /// Room this message is addressed to, if any
    pub fn room_code(&self) -> Option<&str> {
        match self {
            C2S::JoinRoom { code, .. }
            | C2S::StatePush { code, .. }
            | C2S::Input { code, .. }
            | C2S::MatchOver { code, .. } => Some(code),
            C2S::CreateRoom { .. } | C2S::ListRooms | C2S::Ping { .. } => None,
        }
    }
}

impl S2C {
    /// Serialize S2C message to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    /// Deserialize S2C message from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Score, Side, WinCondition};

    #[test]
    fn test_state_push_serialization() {
        let snapshot = Snapshot {
            ball_x: 0.25,
            ball_y: 0.75,
            ball_vx: -0.01,
            ball_vy: 0.003,
            paddle_left_y: 0.4,
            paddle_right_y: 0.6,
            score_left: 3,
            score_right: 5,
        };
        let msg = C2S::StatePush {
            code: "AB12CD".into(),
            snapshot,
        };
        let bytes = msg.to_bytes().expect("Serialization should succeed");
        let decoded = C2S::from_bytes(&bytes).expect("Deserialization should succeed");
        assert_eq!(decoded, msg);
        assert_eq!(decoded.room_code(), Some("AB12CD"));
    }

    #[test]
    fn test_create_room_carries_config() {
        let config = MatchConfig {
            win_condition: WinCondition::Time { seconds: 90 },
            paddle_size_multiplier: 1.5,
            ..MatchConfig::default()
        };
        let msg = C2S::CreateRoom {
            host_name: "ana".into(),
            room_name: "friday".into(),
            password: Some("pw".into()),
            config,
        };
        let decoded = C2S::from_bytes(&msg.to_bytes().expect("serialize")).expect("deserialize");
        assert_eq!(decoded, msg);
        assert_eq!(decoded.room_code(), None);
    }

    #[test]
    fn test_s2c_serialization() {
        let msg = S2C::MatchOver {
            result: MatchResult {
                winner: Side::Right,
                score: Score { left: 4, right: 10 },
                max_rally: 12,
                forced: false,
            },
        };
        let bytes = msg.to_bytes().expect("Serialization should succeed");
        let decoded = S2C::from_bytes(&bytes).expect("Deserialization should succeed");
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_join_rejection_messages() {
        assert_eq!(JoinRejection::RoomFull.to_string(), "room is full");
        assert_eq!(JoinRejection::NotFound.to_string(), "room not found");
    }

    #[test]
    fn test_truncated_frame_is_an_error() {
        let bytes = S2C::RoomList { rooms: Vec::new() }.to_bytes().expect("serialize");
        assert!(S2C::from_bytes(&bytes[..0]).is_err());
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" ab12cd "), Some("AB12CD".to_string()));
        assert_eq!(normalize_code("AB12C"), None);
        assert_eq!(normalize_code("AB-2CD"), None);
    }
}
