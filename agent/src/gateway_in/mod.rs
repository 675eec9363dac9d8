//! Gateway module for the bitFlyer Lightning realtime API.
//!
//! Follows Clean Architecture with four layers:
//! - **Config**: JSON-based configuration (endpoints, product, realtime settings)
//! - **Domain**: Channels, wire events, stream state and the collaborator traits
//! - **Application**: Use cases and orchestration (RealtimeClient, StreamDispatcher)
//! - **Infrastructure**: External dependencies (WebSocket JSON-RPC, REST clients)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Config Layer                            │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │  lightning_config.json                                   │   │
//! │  │  - Endpoints, product code                               │   │
//! │  │  - Watchdog interval, execution cap, UTC offset          │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                            │                                    │
//! │                            ▼                                    │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                    Application                           │   │
//! │  │  - RealtimeClient (bootstrap, receive loop, lifecycle)   │   │
//! │  │  - StreamDispatcher (routing to stores and observers)    │   │
//! │  │  - Watchdog, ObserverRegistry                            │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                            │                                    │
//! │                            ▼                                    │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                      Domain                              │   │
//! │  │  - Channel, ChannelKind, Subscriptions                   │   │
//! │  │  - RpcTransport, BoardWriter, ExecutionWriter traits     │   │
//! │  │  - RpcMessage, StreamData, MarketEvent, StreamState      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                            │                                    │
//! │                            ▼                                    │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                   Infrastructure                         │   │
//! │  │  - WsRpcTransport (implements RpcTransport)              │   │
//! │  │  - RestClient (implements TickerFetcher)                 │   │
//! │  │  - PrivateClient (implements OrderSender)                │   │
//! │  │  - BoardParser, ExecutionParser                          │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example Configuration
//!
//! ```json
//! {
//!   "endpoints": {
//!     "rest_url": "https://api.bitflyer.com",
//!     "ws_url": "wss://ws.lightstream.bitflyer.com/json-rpc",
//!     "origin": "https://ws.lightstream.bitflyer.com/json-rpc"
//!   },
//!   "product_code": "FX_BTC_JPY",
//!   "realtime": { "watchdog_interval_ms": 60000, "max_executions": 100000 }
//! }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

use std::sync::Arc;

// Re-export commonly used types for convenience

// Config layer
pub use config::{
    AgentConfigFile, ConfigError, CredentialsConfig, EndpointConfig, RealtimeSettings,
    load_config, load_config_from_str, load_default_config,
};

// Domain layer
pub use domain::{
    BoardWriter, Channel, ChannelKind, ChannelMessage, ExecutionWriter, MarketEvent, OrderSender,
    RpcMessage, RpcTransport, StreamData, StreamParser, StreamState, Subscriptions,
    TickerFetcher,
};

// Errors
pub use error::{DecodeError, RealtimeError, TransportError};

// Application layer
pub use application::{
    DispatchError, Dispatched, GatewayConfig, ObserverId, ObserverRegistry, RealtimeClient,
    RealtimeConfig, StreamDispatcher, Watchdog,
};

// Infrastructure layer
pub use infrastructure::{
    BoardParser, Credentials, ExecutionParser, PrivateClient, RestClient, RestError,
    WsRpcTransport,
};

use trading_core::ProductCode;

/// Gateway facade - wires the REST and WebSocket collaborators for one set
/// of endpoints
pub struct Gateway {
    config: GatewayConfig,
    rest_client: RestClient,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        let rest_client = RestClient::new(config.rest_url.clone());

        Gateway {
            config,
            rest_client,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest_client
    }

    /// Create a signed client for order management on `product_code`
    pub fn private(&self, credentials: Credentials, product_code: ProductCode) -> PrivateClient {
        PrivateClient::new(self.config.rest_url.clone(), credentials, product_code)
    }

    /// Open the WebSocket JSON-RPC transport
    pub async fn connect_transport(&self) -> Result<WsRpcTransport, TransportError> {
        WsRpcTransport::connect(&self.config.ws_url, &self.config.origin).await
    }

    /// Connect and build a realtime client. Call `subscribe` on it to start streaming.
    pub async fn connect_realtime(
        &self,
        config: RealtimeConfig,
    ) -> Result<RealtimeClient, TransportError> {
        let transport = self.connect_transport().await?;
        Ok(RealtimeClient::new(config, Arc::new(transport)))
    }
}
