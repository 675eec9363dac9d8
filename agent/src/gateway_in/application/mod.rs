mod config;
mod dispatcher;
mod observers;
mod realtime_client;
mod watchdog;

pub use config::{GatewayConfig, RealtimeConfig};
pub use dispatcher::{DispatchError, Dispatched, StreamDispatcher};
pub use observers::{ObserverId, ObserverRegistry};
pub use realtime_client::RealtimeClient;
pub use watchdog::{Watchdog, WatchdogExpired};
