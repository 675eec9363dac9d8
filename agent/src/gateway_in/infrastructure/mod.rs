mod parsers;
mod private_client;
mod rest_client;
mod ws_client;

pub use parsers::{BoardParser, ExecutionParser, parse_envelope};
pub use private_client::{Credentials, PrivateClient};
pub use rest_client::{RestClient, RestError};
pub use ws_client::WsRpcTransport;
