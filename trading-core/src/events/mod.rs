mod board_events;
mod execution_events;
mod ticker_events;

pub use board_events::BoardUpdateEvent;
pub use execution_events::ExecutionEvent;
pub use ticker_events::TickerEvent;
