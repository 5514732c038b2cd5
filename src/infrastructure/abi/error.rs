//! Error types for ABI parsing and decoding

use alloy_primitives::B256;
use thiserror::Error;

/// ABI text could not be turned into an interface
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON ABI: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON ABI must be an array of fragments")]
    NotAnArray,

    #[error("unsupported fragment: {0}")]
    UnsupportedFragment(String),

    #[error("invalid fragment `{fragment}`: {message}")]
    Syntax { fragment: String, message: String },
}

/// Event log decoding failures
#[derive(Debug, Error)]
pub enum EventError {
    #[error("log has no topics")]
    NoTopics,

    #[error("event signature mismatch: expected {expected}, got {actual}")]
    SignatureMismatch { expected: B256, actual: B256 },

    #[error("expected {expected} topics, got {actual}")]
    TopicCountMismatch { expected: usize, actual: usize },

    #[error("failed to decode log data: {0}")]
    Decode(#[from] alloy_dyn_abi::Error),

    #[error("no matching event for topic {topic}")]
    UnknownEvent { topic: B256 },

    #[error("no matching event for topic {topic}: {source}")]
    NoMatchingEvent {
        topic: B256,
        #[source]
        source: Box<EventError>,
    },
}

/// Decoded values do not fit the parameter list they came from
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("parameter `{name}` is declared `{ty}` but the decoded value is not a tuple")]
    ShapeMismatch { name: String, ty: String },

    #[error("{params} parameters but {values} decoded values")]
    LengthMismatch { params: usize, values: usize },
}
