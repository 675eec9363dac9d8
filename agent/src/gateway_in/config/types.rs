use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use trading_core::{EXCHANGE_UTC_OFFSET_SECS, ExchangeTime, ProductCode, TimestampError};

use crate::executions::DEFAULT_MAX_EXECUTIONS;
use crate::gateway_in::application::{GatewayConfig, RealtimeConfig};
use crate::gateway_in::infrastructure::Credentials;

pub const API_KEY_ENV: &str = "LIGHTNING_API_KEY";
pub const API_SECRET_ENV: &str = "LIGHTNING_API_SECRET";

/// Root configuration for the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfigFile {
    #[serde(default)]
    pub endpoints: EndpointConfig,
    /// Product whose channels are subscribed
    #[serde(default)]
    pub product_code: ProductCode,
    #[serde(default)]
    pub realtime: RealtimeSettings,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

/// REST and WebSocket endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_rest_url")]
    pub rest_url: String,
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Origin header sent on the WebSocket handshake
    #[serde(default = "default_origin")]
    pub origin: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        EndpointConfig {
            rest_url: default_rest_url(),
            ws_url: default_ws_url(),
            origin: default_origin(),
        }
    }
}

/// Realtime client settings (JSON representation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeSettings {
    #[serde(default = "default_watchdog_interval")]
    pub watchdog_interval_ms: u64,
    #[serde(default = "default_max_executions")]
    pub max_executions: usize,
    #[serde(default = "default_utc_offset")]
    pub utc_offset_secs: i32,
    /// Capacity of the broadcast channel of market events
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        RealtimeSettings {
            watchdog_interval_ms: default_watchdog_interval(),
            max_executions: default_max_executions(),
            utc_offset_secs: default_utc_offset(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl RealtimeSettings {
    pub fn watchdog_interval(&self) -> Duration {
        Duration::from_millis(self.watchdog_interval_ms)
    }

    /// Convert to application-layer RealtimeConfig
    pub fn to_realtime_config(
        &self,
        product_code: ProductCode,
    ) -> Result<RealtimeConfig, TimestampError> {
        Ok(RealtimeConfig::new(product_code)
            .with_watchdog_interval(self.watchdog_interval())
            .with_max_executions(self.max_executions)
            .with_exchange_time(ExchangeTime::new(self.utc_offset_secs)?)
            .with_event_buffer(self.event_buffer))
    }
}

/// API credentials. Empty values mean public endpoints only.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &mask(&self.api_key))
            .field("api_secret", &mask(&self.api_secret))
            .finish()
    }
}

impl CredentialsConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }

    /// Override with `LIGHTNING_API_KEY` / `LIGHTNING_API_SECRET` when set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            self.api_key = key;
        }
        if let Ok(secret) = std::env::var(API_SECRET_ENV) {
            self.api_secret = secret;
        }
        self
    }

    pub fn to_credentials(&self) -> Option<Credentials> {
        self.is_configured()
            .then(|| Credentials::new(self.api_key.clone(), self.api_secret.clone()))
    }
}

impl AgentConfigFile {
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(
            self.endpoints.rest_url.clone(),
            self.endpoints.ws_url.clone(),
            self.endpoints.origin.clone(),
        )
    }

    pub fn realtime_config(&self) -> Result<RealtimeConfig, TimestampError> {
        self.realtime.to_realtime_config(self.product_code.clone())
    }
}

fn mask(value: &str) -> &'static str {
    if value.is_empty() { "<unset>" } else { "<redacted>" }
}

// Default value functions for serde
fn default_rest_url() -> String {
    "https://api.bitflyer.com".to_string()
}

fn default_ws_url() -> String {
    "wss://ws.lightstream.bitflyer.com/json-rpc".to_string()
}

fn default_origin() -> String {
    "https://ws.lightstream.bitflyer.com/json-rpc".to_string()
}

fn default_watchdog_interval() -> u64 {
    60_000
}

fn default_max_executions() -> usize {
    DEFAULT_MAX_EXECUTIONS
}

fn default_utc_offset() -> i32 {
    EXCHANGE_UTC_OFFSET_SECS
}

fn default_event_buffer() -> usize {
    1024
}
