use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use trading_core::{BoardUpdateEvent, Execution, ExecutionEvent, TimestampError};

use super::ChannelKind;

/// JSON-RPC method carrying channel notifications
pub const CHANNEL_MESSAGE_METHOD: &str = "channelMessage";

/// JSON-RPC method used to subscribe to a channel
pub const SUBSCRIBE_METHOD: &str = "subscribe";

/// One message received from the RPC transport.
///
/// Notifications carry `method` and `params`; responses to our own requests
/// carry an `id` and an empty method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcMessage {
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<Value>,
}

impl RpcMessage {
    pub fn notification(method: impl Into<String>, params: Value) -> Self {
        RpcMessage {
            method: method.into(),
            params,
            id: None,
        }
    }

    pub fn response(id: Value, result: Value) -> Self {
        RpcMessage {
            method: String::new(),
            params: result,
            id: Some(id),
        }
    }

    pub fn is_channel_message(&self) -> bool {
        self.method == CHANNEL_MESSAGE_METHOD
    }
}

/// Channel envelope, used both as subscribe params and as notification params
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

impl ChannelMessage {
    pub fn subscribe(channel: impl Into<String>) -> Self {
        ChannelMessage {
            channel: channel.into(),
            message: None,
        }
    }
}

/// Decoded channel payload, before it is applied to a store
#[derive(Debug, Clone, PartialEq)]
pub enum StreamData {
    Board {
        kind: ChannelKind,
        update: BoardUpdateEvent,
    },
    Executions(Vec<ExecutionEvent>),
}

/// Market events fanned out to observers and broadcast subscribers
#[derive(Debug, Clone)]
pub enum MarketEvent {
    Board(Arc<BoardUpdateEvent>),
    Executions(Arc<Vec<Execution>>),
    /// An execution batch dropped whole because a timestamp did not parse
    RejectedExecutions { count: usize, error: TimestampError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscribe_params_omit_message() {
        let params = serde_json::to_value(ChannelMessage::subscribe("lightning_board_FX_BTC_JPY"))
            .unwrap();
        assert_eq!(params, json!({"channel": "lightning_board_FX_BTC_JPY"}));
    }

    #[test]
    fn test_envelope_message_optional() {
        let envelope: ChannelMessage =
            serde_json::from_value(json!({"channel": "lightning_board_FX_BTC_JPY"})).unwrap();
        assert!(envelope.message.is_none());

        let envelope: ChannelMessage = serde_json::from_value(json!({
            "channel": "lightning_board_FX_BTC_JPY",
            "message": {"mid_price": 1, "bids": [], "asks": []}
        }))
        .unwrap();
        assert_eq!(envelope.message.unwrap()["mid_price"], 1);
    }

    #[test]
    fn test_rpc_message_kinds() {
        let msg = RpcMessage::notification(CHANNEL_MESSAGE_METHOD, json!({}));
        assert!(msg.is_channel_message());

        let resp = RpcMessage::response(json!(1), json!(true));
        assert!(!resp.is_channel_message());
        assert_eq!(resp.id, Some(json!(1)));
    }
}
