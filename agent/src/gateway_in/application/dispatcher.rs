use std::sync::Arc;
use thiserror::Error;
use trading_core::TimestampError;

use crate::gateway_in::domain::{
    BoardWriter, ChannelKind, ExecutionWriter, RpcMessage, StreamData, StreamParser,
    Subscriptions,
};
use crate::gateway_in::error::DecodeError;
use crate::gateway_in::infrastructure::{BoardParser, ExecutionParser, parse_envelope};

use super::observers::ObserverRegistry;

/// Outcome of routing one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Not a channel message, or a channel we did not subscribe to
    Ignored,
    Board(ChannelKind),
    /// Number of executions appended
    Executions(usize),
}

/// A message that was dropped. None of these end the stream.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Rejected batch of {count} executions: {source}")]
    Executions {
        count: usize,
        #[source]
        source: TimestampError,
    },
}

/// Routes channel messages to the board and execution stores, then to observers.
///
/// Stores are mutated before observers are notified, so an observer reading
/// the client sees the state that includes the update it is called with.
pub struct StreamDispatcher {
    subscriptions: Subscriptions,
    parsers: Vec<Box<dyn StreamParser>>,
    board: Arc<dyn BoardWriter>,
    executions: Arc<dyn ExecutionWriter>,
    observers: Arc<ObserverRegistry>,
}

impl StreamDispatcher {
    pub fn new(
        subscriptions: Subscriptions,
        board: Arc<dyn BoardWriter>,
        executions: Arc<dyn ExecutionWriter>,
        observers: Arc<ObserverRegistry>,
    ) -> Self {
        StreamDispatcher {
            subscriptions,
            parsers: vec![Box::new(BoardParser), Box::new(ExecutionParser)],
            board,
            executions,
            observers,
        }
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    pub fn dispatch(&self, message: &RpcMessage) -> Result<Dispatched, DispatchError> {
        if !message.is_channel_message() {
            tracing::trace!(method = %message.method, "Ignoring non-channel message");
            return Ok(Dispatched::Ignored);
        }

        let envelope = parse_envelope(&message.params)?;
        let Some(kind) = self.subscriptions.kind_of(&envelope.channel) else {
            tracing::debug!(channel = %envelope.channel, "Ignoring unsubscribed channel");
            return Ok(Dispatched::Ignored);
        };

        let payload = envelope.message.ok_or_else(|| DecodeError::MissingMessage {
            channel: envelope.channel.clone(),
        })?;

        let parser = self
            .parsers
            .iter()
            .find(|p| p.can_parse(kind))
            .ok_or(DecodeError::NoParser(kind))?;

        match parser.parse(kind, &payload)? {
            StreamData::Board { kind, update } => {
                self.board.apply(&update);
                tracing::debug!(
                    channel = %kind,
                    levels = update.level_count(),
                    mid_price = %update.mid_price,
                    "Applied board update"
                );
                self.observers.notify_board(update);
                Ok(Dispatched::Board(kind))
            }
            StreamData::Executions(events) => {
                let appended = match self.executions.append(&events) {
                    Ok(appended) => appended,
                    Err(source) => {
                        self.observers.notify_rejected(events.len(), source.clone());
                        return Err(DispatchError::Executions {
                            count: events.len(),
                            source,
                        });
                    }
                };
                let count = appended.len();
                tracing::debug!(count, "Appended executions");
                if count > 0 {
                    self.observers.notify_executions(appended);
                }
                Ok(Dispatched::Executions(count))
            }
        }
    }
}
