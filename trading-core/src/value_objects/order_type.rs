use serde::{Deserialize, Serialize};

/// Child order types accepted by the order endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChildOrderType {
    /// Execute at specified price or better
    Limit,
    /// Execute at current market price
    Market,
}
