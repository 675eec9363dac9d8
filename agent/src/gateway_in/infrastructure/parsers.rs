use serde::Deserialize;
use serde_json::Value;
use trading_core::{BoardUpdateEvent, ExecutionEvent};

use crate::gateway_in::domain::{ChannelKind, ChannelMessage, StreamData, StreamParser};
use crate::gateway_in::error::DecodeError;

/// Decode the `{channel, message}` envelope of a `channelMessage` notification
pub fn parse_envelope(params: &Value) -> Result<ChannelMessage, DecodeError> {
    ChannelMessage::deserialize(params).map_err(DecodeError::Envelope)
}

/// Parser for board snapshots and diffs
/// Both board channels share the `{mid_price, bids, asks}` shape
pub struct BoardParser;

impl StreamParser for BoardParser {
    fn can_parse(&self, kind: ChannelKind) -> bool {
        kind.is_board()
    }

    fn parse(&self, kind: ChannelKind, message: &Value) -> Result<StreamData, DecodeError> {
        let update = BoardUpdateEvent::deserialize(message)
            .map_err(|source| DecodeError::Payload { kind, source })?;
        Ok(StreamData::Board { kind, update })
    }
}

/// Parser for execution lists
pub struct ExecutionParser;

impl StreamParser for ExecutionParser {
    fn can_parse(&self, kind: ChannelKind) -> bool {
        kind == ChannelKind::Executions
    }

    fn parse(&self, kind: ChannelKind, message: &Value) -> Result<StreamData, DecodeError> {
        let events = Vec::<ExecutionEvent>::deserialize(message)
            .map_err(|source| DecodeError::Payload { kind, source })?;
        Ok(StreamData::Executions(events))
    }
}
