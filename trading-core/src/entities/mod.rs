mod execution;
mod order;
mod price_level;
mod ticker;

pub use execution::Execution;
pub use order::{
    CancelChildOrderRequest, ChildOrder, ChildOrderAcceptance, ChildOrderRequest, Position,
};
pub use price_level::PriceLevel;
pub use ticker::Ticker;
