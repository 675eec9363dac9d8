use std::fmt;
use trading_core::ProductCode;

/// Kind of a Lightning realtime channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Incremental board diffs
    Board,
    /// Full board snapshots
    BoardSnapshot,
    Executions,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 3] = [
        ChannelKind::Board,
        ChannelKind::BoardSnapshot,
        ChannelKind::Executions,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            ChannelKind::Board => "lightning_board_",
            ChannelKind::BoardSnapshot => "lightning_board_snapshot_",
            ChannelKind::Executions => "lightning_executions_",
        }
    }

    /// Both board channels carry the same payload and share one handler
    pub fn is_board(&self) -> bool {
        matches!(self, ChannelKind::Board | ChannelKind::BoardSnapshot)
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelKind::Board => "board",
            ChannelKind::BoardSnapshot => "board_snapshot",
            ChannelKind::Executions => "executions",
        };
        write!(f, "{}", name)
    }
}

/// A channel scoped to one product, e.g. `lightning_board_FX_BTC_JPY`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Channel {
    pub kind: ChannelKind,
    pub product: ProductCode,
}

impl Channel {
    pub fn new(kind: ChannelKind, product: ProductCode) -> Self {
        Channel { kind, product }
    }

    pub fn name(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.product)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.product)
    }
}

/// The fixed channel set a client subscribes to for one product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriptions {
    product: ProductCode,
    channels: Vec<Channel>,
}

impl Subscriptions {
    pub fn for_product(product: ProductCode) -> Self {
        let channels = ChannelKind::ALL
            .into_iter()
            .map(|kind| Channel::new(kind, product.clone()))
            .collect();
        Subscriptions { product, channels }
    }

    pub fn product(&self) -> &ProductCode {
        &self.product
    }

    /// Channels in subscribe order: board diffs, board snapshots, executions
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Resolve a wire channel name to one of the subscribed kinds.
    /// Channels for other products or unknown channels yield `None`.
    pub fn kind_of(&self, name: &str) -> Option<ChannelKind> {
        self.channels
            .iter()
            .find(|c| name.strip_prefix(c.kind.prefix()) == Some(c.product.as_str()))
            .map(|c| c.kind)
    }
}
