mod exchange_time;
mod order_type;
mod product_code;
mod side;
mod time_in_force;

pub use exchange_time::{EXCHANGE_UTC_OFFSET_SECS, ExchangeTime, TimestampError};
pub use order_type::ChildOrderType;
pub use product_code::ProductCode;
pub use side::{Side, deserialize_optional_side};
pub use time_in_force::TimeInForce;

pub type Timestamp = chrono::DateTime<chrono::Utc>;
