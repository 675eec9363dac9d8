use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use trading_core::{BoardUpdateEvent, Clock, Execution, PriceLevel, SystemClock};

use crate::executions::ExecutionHistory;
use crate::gateway_in::domain::{
    ChannelMessage, MarketEvent, RpcTransport, SUBSCRIBE_METHOD, StreamState, Subscriptions,
};
use crate::gateway_in::error::{RealtimeError, TransportError};
use crate::order_book::{BoardSnapshot, BoardStore};

use super::config::RealtimeConfig;
use super::dispatcher::{DispatchError, Dispatched, StreamDispatcher};
use super::observers::{ObserverId, ObserverRegistry};
use super::watchdog::Watchdog;

/// Realtime market-data client for one product.
///
/// `subscribe` drives the receive loop on the caller's task while any other
/// task reads the board and execution history or registers observers.
pub struct RealtimeClient {
    config: RealtimeConfig,
    transport: Arc<dyn RpcTransport>,
    board: BoardStore,
    executions: ExecutionHistory,
    observers: Arc<ObserverRegistry>,
    dispatcher: StreamDispatcher,
    state: Mutex<StreamState>,
    shutdown: CancellationToken,
}

impl RealtimeClient {
    pub fn new(config: RealtimeConfig, transport: Arc<dyn RpcTransport>) -> Self {
        Self::with_clock(config, transport, Arc::new(SystemClock::new()))
    }

    /// Create a client whose execution window is measured against `clock`
    pub fn with_clock(
        config: RealtimeConfig,
        transport: Arc<dyn RpcTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let board = BoardStore::new();
        let executions =
            ExecutionHistory::with_clock(config.max_executions, config.exchange_time, clock);
        let observers = Arc::new(ObserverRegistry::new(config.event_buffer));
        let dispatcher = StreamDispatcher::new(
            Subscriptions::for_product(config.product_code.clone()),
            Arc::new(board.clone()),
            Arc::new(executions.clone()),
            Arc::clone(&observers),
        );

        RealtimeClient {
            config,
            transport,
            board,
            executions,
            observers,
            dispatcher,
            state: Mutex::new(StreamState::Idle),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    pub fn state(&self) -> StreamState {
        *self.state.lock()
    }

    fn set_state(&self, state: StreamState) {
        let mut current = self.state.lock();
        if *current != state {
            tracing::debug!(from = ?*current, to = ?state, "Stream state changed");
            *current = state;
        }
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    /// Copy of the board: mid price, asks ascending, bids descending
    pub fn board(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.board.best_bid()
    }

    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.board.best_ask()
    }

    pub fn spread(&self) -> Option<Decimal> {
        self.board.spread()
    }

    /// Executions newer than `now - since`, oldest first
    pub fn executions(&self, since: Duration) -> Vec<Execution> {
        self.executions.since(since)
    }

    pub fn execution_count(&self) -> usize {
        self.executions.len()
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    pub fn on_board<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&BoardUpdateEvent) + Send + Sync + 'static,
    {
        self.observers.on_board(observer)
    }

    pub fn on_execution<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&[Execution]) + Send + Sync + 'static,
    {
        self.observers.on_execution(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Broadcast stream of every decoded market event
    pub fn events(&self) -> broadcast::Receiver<MarketEvent> {
        self.observers.events()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Subscribe to the product's channels and process messages until the
    /// stream ends.
    ///
    /// Returns `Ok` when `cancel` fires or `close` is called, `Stale` when
    /// the watchdog interval passes without a message, and `Transport` when
    /// the connection fails. The transport is closed in every case.
    pub async fn subscribe(&self, cancel: CancellationToken) -> Result<(), RealtimeError> {
        {
            let mut state = self.state.lock();
            match *state {
                StreamState::Idle => *state = StreamState::Bootstrapping,
                StreamState::Bootstrapping | StreamState::Streaming => {
                    return Err(RealtimeError::AlreadyStreaming);
                }
                StreamState::Closed => return Err(RealtimeError::Closed),
            }
        }

        if let Err(e) = self.bootstrap().await {
            tracing::error!(error = %e, "Subscription bootstrap failed");
            self.teardown().await;
            return Err(e);
        }

        self.set_state(StreamState::Streaming);
        tracing::info!(product = %self.config.product_code, "Streaming market data");

        let session = cancel.child_token();
        let watchdog = Watchdog::new(self.config.watchdog_interval);

        let stream = async {
            let result = self.receive_loop(&session, &watchdog).await;
            session.cancel();
            result
        };
        let guard = async {
            let result = watchdog.run(&session).await;
            if result.is_err() {
                session.cancel();
                self.close_transport().await;
            }
            result
        };

        let (stream_result, watchdog_result) = tokio::join!(stream, guard);
        self.teardown().await;

        match (watchdog_result, stream_result) {
            (Err(expired), _) => {
                tracing::error!(interval = ?expired.interval, "Market data stream went stale");
                Err(RealtimeError::Stale {
                    interval: expired.interval,
                })
            }
            (Ok(()), Err(e)) => {
                tracing::error!(error = %e, "Market data stream failed");
                Err(e.into())
            }
            (Ok(()), Ok(())) => {
                tracing::info!("Market data stream stopped");
                Ok(())
            }
        }
    }

    /// Stop streaming and close the transport. Safe to call more than once.
    pub async fn close(&self) -> Result<(), TransportError> {
        self.shutdown.cancel();
        self.set_state(StreamState::Closed);
        self.transport.close().await
    }

    async fn bootstrap(&self) -> Result<(), RealtimeError> {
        for channel in self.dispatcher.subscriptions().channels() {
            let name = channel.name();
            let params = serde_json::to_value(ChannelMessage::subscribe(name.clone())).map_err(
                |e| RealtimeError::Subscribe {
                    channel: name.clone(),
                    source: e.into(),
                },
            )?;

            self.transport
                .send(SUBSCRIBE_METHOD, params)
                .await
                .map_err(|source| RealtimeError::Subscribe {
                    channel: name.clone(),
                    source,
                })?;
            tracing::debug!(channel = %name, "Subscribe request sent");
        }
        Ok(())
    }

    async fn receive_loop(
        &self,
        session: &CancellationToken,
        watchdog: &Watchdog,
    ) -> Result<(), TransportError> {
        loop {
            let received = tokio::select! {
                biased;
                _ = session.cancelled() => return Ok(()),
                _ = self.shutdown.cancelled() => return Ok(()),
                received = self.transport.recv() => received,
            };

            let message = match received {
                Ok(message) => message,
                // Closed underneath us by the watchdog or by close()
                Err(_) if session.is_cancelled() || self.shutdown.is_cancelled() => {
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            watchdog.reset();

            match self.dispatcher.dispatch(&message) {
                Ok(Dispatched::Ignored) => {}
                Ok(dispatched) => tracing::trace!(?dispatched, "Message dispatched"),
                Err(DispatchError::Executions { count, source }) => {
                    tracing::error!(count, error = %source, "Rejected execution batch")
                }
                Err(e) => tracing::warn!(error = %e, "Dropped channel message"),
            }
        }
    }

    async fn teardown(&self) {
        self.set_state(StreamState::Closed);
        self.close_transport().await;
    }

    async fn close_transport(&self) {
        if let Err(e) = self.transport.close().await {
            tracing::warn!(error = %e, "Failed to close transport");
        }
    }
}
