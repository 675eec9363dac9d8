mod channel;
mod events;
mod stream_state;
mod traits;

pub use channel::{Channel, ChannelKind, Subscriptions};
pub use events::{
    CHANNEL_MESSAGE_METHOD, ChannelMessage, MarketEvent, RpcMessage, SUBSCRIBE_METHOD, StreamData,
};
pub use stream_state::StreamState;
pub use traits::{
    BoardWriter, ExecutionWriter, OrderSender, RpcTransport, StreamParser, TickerFetcher,
};
