use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::messages::{
    ChatMessageMsg, MessageType, OutcomeKind, OutcomeMsg, RestartGameMsg, RoomMessage,
};

/// Maximum message payload size in bytes.
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024; // 64 KiB

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("empty message")]
    EmptyMessage,
    #[error("unknown message type: 0x{0:02x}")]
    UnknownMessageType(u8),
    #[error("payload too large: {0} bytes (max {max})", max = MAX_MESSAGE_SIZE)]
    PayloadTooLarge(usize),
    #[error("serialize error: {0}")]
    SerializeError(String),
    #[error("deserialize error: {0}")]
    DeserializeError(String),
}

/// Encode a serializable payload with a 1-byte type prefix.
pub fn encode_message<T: Serialize>(
    msg_type: MessageType,
    payload: &T,
) -> Result<Vec<u8>, ProtocolError> {
    let payload_bytes =
        rmp_serde::to_vec(payload).map_err(|e| ProtocolError::SerializeError(e.to_string()))?;
    let total = 1 + payload_bytes.len();
    if total > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::PayloadTooLarge(total));
    }
    let mut buf = Vec::with_capacity(total);
    buf.push(msg_type as u8);
    buf.extend_from_slice(&payload_bytes);
    Ok(buf)
}

/// Encode a `RoomMessage` to wire format.
pub fn encode_room_message(msg: &RoomMessage) -> Result<Vec<u8>, ProtocolError> {
    match msg {
        RoomMessage::Outcome { kind, msg } => encode_message(kind.message_type(), msg),
        RoomMessage::RestartGame(m) => encode_message(MessageType::RestartGame, m),
        RoomMessage::ChatMessage(m) => encode_message(MessageType::ChatMessage, m),
    }
}

/// Extract the message type byte from raw wire data.
pub fn decode_message_type(data: &[u8]) -> Result<MessageType, ProtocolError> {
    let first = *data.first().ok_or(ProtocolError::EmptyMessage)?;
    MessageType::from_byte(first).ok_or(ProtocolError::UnknownMessageType(first))
}

/// Decode a MessagePack payload (bytes after the type prefix).
pub fn decode_payload<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, ProtocolError> {
    if data.is_empty() {
        return Err(ProtocolError::EmptyMessage);
    }
    rmp_serde::from_slice(&data[1..]).map_err(|e| ProtocolError::DeserializeError(e.to_string()))
}

/// Decode raw wire data into a `RoomMessage`.
pub fn decode_room_message(data: &[u8]) -> Result<RoomMessage, ProtocolError> {
    match decode_message_type(data)? {
        MessageType::GameWin => Ok(RoomMessage::Outcome {
            kind: OutcomeKind::Win,
            msg: decode_payload::<OutcomeMsg>(data)?,
        }),
        MessageType::GameLose => Ok(RoomMessage::Outcome {
            kind: OutcomeKind::Lose,
            msg: decode_payload::<OutcomeMsg>(data)?,
        }),
        MessageType::RestartGame => Ok(RoomMessage::RestartGame(
            decode_payload::<RestartGameMsg>(data)?,
        )),
        MessageType::ChatMessage => Ok(RoomMessage::ChatMessage(
            decode_payload::<ChatMessageMsg>(data)?,
        )),
    }
}
