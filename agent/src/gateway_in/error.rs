use std::time::Duration;
use thiserror::Error;

use super::domain::ChannelKind;

/// Failures of the RPC transport. All of them end the stream.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Send error: {0}")]
    Send(String),
    #[error("Receive error: {0}")]
    Receive(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Transport closed")]
    Closed,
}

/// A single channel message that could not be decoded.
/// The message is dropped and the stream continues.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid channel envelope: {0}")]
    Envelope(serde_json::Error),
    #[error("Channel message without payload on {channel}")]
    MissingMessage { channel: String },
    #[error("Invalid {kind} payload: {source}")]
    Payload {
        kind: ChannelKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("No parser for {0} channel")]
    NoParser(ChannelKind),
}

/// Errors surfaced to the owner of `RealtimeClient::subscribe`
#[derive(Error, Debug)]
pub enum RealtimeError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Failed to subscribe to {channel}: {source}")]
    Subscribe {
        channel: String,
        #[source]
        source: TransportError,
    },
    #[error("No message received for {interval:?}")]
    Stale { interval: Duration },
    #[error("Client is already streaming")]
    AlreadyStreaming,
    /// A closed client never streams again; build a new one
    #[error("Client is closed")]
    Closed,
}

impl RealtimeError {
    /// Whether the stream ended because the feed went quiet
    pub fn is_stale(&self) -> bool {
        matches!(self, RealtimeError::Stale { .. })
    }
}
