use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// Network message type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageType {
    // Round outcome (authority or detecting peer -> others)
    GameWin = 0x01,
    GameLose = 0x02,

    // Authority -> all
    RestartGame = 0x10,

    // Any -> all
    ChatMessage = 0x20,
}

impl MessageType {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(Self::GameWin),
            0x02 => Some(Self::GameLose),
            0x10 => Some(Self::RestartGame),
            0x20 => Some(Self::ChatMessage),
            _ => None,
        }
    }
}

/// Which side a round outcome favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    Win,
    Lose,
}

impl OutcomeKind {
    pub fn message_type(self) -> MessageType {
        match self {
            Self::Win => MessageType::GameWin,
            Self::Lose => MessageType::GameLose,
        }
    }
}

/// Round outcome carrying the sender's authoritative score for that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeMsg {
    pub score: u32,
    /// Self-reported. Trust is decided from the transport sender.
    pub sender: PlayerId,
}

/// Authority tells every participant to begin a new round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestartGameMsg {
    /// Self-reported. Trust is decided from the transport sender.
    pub sender: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageMsg {
    pub sender: PlayerId,
    pub content: String,
}

/// Every message exchanged between room participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomMessage {
    Outcome { kind: OutcomeKind, msg: OutcomeMsg },
    RestartGame(RestartGameMsg),
    ChatMessage(ChatMessageMsg),
}

impl RoomMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Outcome { kind, .. } => kind.message_type(),
            Self::RestartGame(_) => MessageType::RestartGame,
            Self::ChatMessage(_) => MessageType::ChatMessage,
        }
    }
}
