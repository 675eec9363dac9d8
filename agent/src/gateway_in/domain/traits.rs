use async_trait::async_trait;
use serde_json::Value;
use trading_core::{
    BoardUpdateEvent, CancelChildOrderRequest, ChildOrderAcceptance, ChildOrderRequest, Execution,
    ExecutionEvent, Ticker, TimestampError,
};

use super::channel::ChannelKind;
use super::events::{RpcMessage, StreamData};
use crate::gateway_in::error::{DecodeError, TransportError};
use crate::gateway_in::infrastructure::RestError;

/// Bidirectional JSON-RPC transport
/// One receive loop at a time; `send` and `close` may be called concurrently with it.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn send(&self, method: &str, params: Value) -> Result<(), TransportError>;

    /// Block until the next message arrives
    async fn recv(&self) -> Result<RpcMessage, TransportError>;

    /// Close the connection. Closing twice is a no-op, and a pending `recv`
    /// returns `TransportError::Closed`.
    async fn close(&self) -> Result<(), TransportError>;
}

/// Trait for writing board updates
/// Implements Dependency Inversion - the dispatcher depends on this abstraction
pub trait BoardWriter: Send + Sync {
    /// Apply a snapshot or diff. Zero sizes remove levels.
    fn apply(&self, update: &BoardUpdateEvent);
}

/// Trait for appending execution batches
pub trait ExecutionWriter: Send + Sync {
    /// Append a batch atomically. Returns the appended executions, or the
    /// first timestamp error, in which case nothing was appended.
    fn append(&self, events: &[ExecutionEvent]) -> Result<Vec<Execution>, TimestampError>;
}

/// Trait for parsing channel payloads
/// Implements Open/Closed - add new parsers without modifying existing code
pub trait StreamParser: Send + Sync {
    /// Check if this parser can handle the given channel kind
    fn can_parse(&self, kind: ChannelKind) -> bool;

    fn parse(&self, kind: ChannelKind, message: &Value) -> Result<StreamData, DecodeError>;
}

/// Trait for fetching ticker snapshots
#[async_trait]
pub trait TickerFetcher: Send + Sync {
    async fn get_ticker(&self, product_code: &str) -> Result<Ticker, RestError>;
}

/// Trait for placing and cancelling child orders
#[async_trait]
pub trait OrderSender: Send + Sync {
    async fn send_child_order(
        &self,
        request: &ChildOrderRequest,
    ) -> Result<ChildOrderAcceptance, RestError>;

    async fn cancel_child_order(
        &self,
        request: &CancelChildOrderRequest,
    ) -> Result<(), RestError>;

    async fn cancel_all_child_orders(&self) -> Result<(), RestError>;
}
