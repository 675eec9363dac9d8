use std::time::Duration;
use trading_core::{ExchangeTime, ProductCode};

use crate::executions::DEFAULT_MAX_EXECUTIONS;

/// Configuration for the realtime client
/// Application-level configuration
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// Product whose channels are subscribed
    pub product_code: ProductCode,
    /// Maximum silence before the stream is considered dead
    pub watchdog_interval: Duration,
    /// Capacity of the execution history
    pub max_executions: usize,
    /// Offset execution timestamps are carried in
    pub exchange_time: ExchangeTime,
    /// Capacity of the market event broadcast channel
    pub event_buffer: usize,
}

impl RealtimeConfig {
    pub fn new(product_code: impl Into<ProductCode>) -> Self {
        RealtimeConfig {
            product_code: product_code.into(),
            watchdog_interval: Duration::from_secs(60),
            max_executions: DEFAULT_MAX_EXECUTIONS,
            exchange_time: ExchangeTime::default(),
            event_buffer: 1024,
        }
    }

    pub fn with_product_code(mut self, product_code: impl Into<ProductCode>) -> Self {
        self.product_code = product_code.into();
        self
    }

    pub fn with_watchdog_interval(mut self, interval: Duration) -> Self {
        self.watchdog_interval = interval;
        self
    }

    pub fn with_max_executions(mut self, max: usize) -> Self {
        self.max_executions = max;
        self
    }

    pub fn with_exchange_time(mut self, exchange_time: ExchangeTime) -> Self {
        self.exchange_time = exchange_time;
        self
    }

    pub fn with_utc_offset_secs(
        mut self,
        offset_secs: i32,
    ) -> Result<Self, trading_core::TimestampError> {
        self.exchange_time = ExchangeTime::new(offset_secs)?;
        Ok(self)
    }

    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        RealtimeConfig::new(ProductCode::default())
    }
}

/// Configuration for the gateway connection
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub rest_url: String,
    pub ws_url: String,
    /// Origin header for the WebSocket handshake
    pub origin: String,
}

impl GatewayConfig {
    pub fn new(rest_url: String, ws_url: String, origin: String) -> Self {
        GatewayConfig {
            rest_url,
            ws_url,
            origin,
        }
    }
}
