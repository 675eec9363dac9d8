pub mod clock;
pub mod entities;
pub mod events;
pub mod value_objects;

// Re-export value objects at crate root for convenience
pub use value_objects::{
    ChildOrderType, EXCHANGE_UTC_OFFSET_SECS, ExchangeTime, ProductCode, Side, TimeInForce,
    Timestamp, TimestampError,
};

// Re-export entities at crate root
pub use entities::{
    CancelChildOrderRequest, ChildOrder, ChildOrderAcceptance, ChildOrderRequest, Execution,
    Position, PriceLevel, Ticker,
};

// Re-export events at crate root
pub use events::{BoardUpdateEvent, ExecutionEvent, TickerEvent};

// Re-export clocks at crate root
pub use clock::{Clock, ManualClock, SystemClock};
