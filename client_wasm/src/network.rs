//! Wire encoding for the session outbox

use proto::{C2S, S2C};

use crate::error::ClientError;

/// Decode one server frame
pub fn decode(bytes: &[u8]) -> Result<S2C, ClientError> {
    S2C::from_bytes(bytes).map_err(ClientError::Decode)
}

/// Encode one client frame
pub fn encode(msg: &C2S) -> Result<Vec<u8>, ClientError> {
    msg.to_bytes().map_err(ClientError::Encode)
}

/// Create join message bytes
pub fn create_join_message(code: &str, password: Option<&str>) -> Result<Vec<u8>, ClientError> {
    let code = proto::normalize_code(code).ok_or(ClientError::InvalidCode)?;
    encode(&C2S::JoinRoom {
        code,
        password: password.filter(|p| !p.is_empty()).map(String::from),
    })
}

/// Create input message bytes
pub fn create_input_message(code: &str, target_y: f32) -> Result<Vec<u8>, ClientError> {
    encode(&C2S::Input {
        code: code.to_string(),
        target_y,
    })
}

/// Create ping message bytes
pub fn create_ping_message(t_ms: u32) -> Result<Vec<u8>, ClientError> {
    encode(&C2S::Ping { t_ms })
}
