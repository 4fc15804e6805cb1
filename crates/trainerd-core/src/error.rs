//! Error types for the trainer console core.

use thiserror::Error;
use trainerd_types::{ConnectionId, ProtocolError, SlotId};

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Session not found: {0}")]
    SessionNotFound(ConnectionId),

    #[error("No session in {0}")]
    SlotNotFound(SlotId),

    #[error("Session already exists: {0}")]
    SessionAlreadyExists(ConnectionId),

    #[error("Detail view already open for {0}")]
    AlreadySelected(SlotId),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Invalid {field}: {input:?}")]
    InvalidOperatorInput { field: &'static str, input: String },

    #[error("Hint category out of range: {0}")]
    HintCategoryOutOfRange(usize),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Channel send error")]
    ChannelSendError,
}
