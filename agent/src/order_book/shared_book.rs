use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use trading_core::{BoardUpdateEvent, PriceLevel};

use crate::gateway_in::BoardWriter;

/// Board copy handed to readers. Never aliases the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardSnapshot {
    pub mid_price: Decimal,
    /// Best (lowest) first
    pub asks: Vec<PriceLevel>,
    /// Best (highest) first
    pub bids: Vec<PriceLevel>,
}

impl BoardSnapshot {
    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.bids.first().copied()
    }

    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.asks.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

/// Live order book for one product
/// Thread-safe, can be cloned and shared across threads
#[derive(Clone, Default)]
pub struct BoardStore {
    state: Arc<RwLock<BoardState>>,
}

#[derive(Default)]
struct BoardState {
    mid_price: Decimal,
    bids: BTreeMap<Decimal, Decimal>,
    asks: BTreeMap<Decimal, Decimal>,
    updates: u64,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a snapshot or diff.
    ///
    /// A zero size removes the price, any other size inserts or overwrites it.
    /// The mid price is overwritten unconditionally. Levels are not swept, a
    /// price only disappears when the feed removes it.
    pub fn apply(&self, update: &BoardUpdateEvent) {
        let mut state = self.state.write();
        state.mid_price = update.mid_price;
        apply_side(&mut state.bids, &update.bids);
        apply_side(&mut state.asks, &update.asks);
        state.updates += 1;
    }

    /// Copy both sides out under the read lock. Already price-sorted.
    pub fn snapshot(&self) -> BoardSnapshot {
        let state = self.state.read();
        BoardSnapshot {
            mid_price: state.mid_price,
            asks: state.asks.iter().map(to_level).collect(),
            bids: state.bids.iter().rev().map(to_level).collect(),
        }
    }

    pub fn mid_price(&self) -> Decimal {
        self.state.read().mid_price
    }

    /// Get the best bid (highest buy price)
    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.state.read().bids.iter().next_back().map(to_level)
    }

    /// Get the best ask (lowest sell price)
    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.state.read().asks.iter().next().map(to_level)
    }

    /// Get the spread (best ask - best bid)
    pub fn spread(&self) -> Option<Decimal> {
        let state = self.state.read();
        let best_bid = state.bids.keys().next_back()?;
        let best_ask = state.asks.keys().next()?;
        Some(*best_ask - *best_bid)
    }

    /// Number of (bid, ask) levels
    pub fn depth(&self) -> (usize, usize) {
        let state = self.state.read();
        (state.bids.len(), state.asks.len())
    }

    /// Check if any update has been applied
    pub fn is_initialized(&self) -> bool {
        self.state.read().updates > 0
    }

    pub fn update_count(&self) -> u64 {
        self.state.read().updates
    }
}

/// Implement BoardWriter trait (Dependency Inversion)
impl BoardWriter for BoardStore {
    fn apply(&self, update: &BoardUpdateEvent) {
        BoardStore::apply(self, update)
    }
}

fn apply_side(side: &mut BTreeMap<Decimal, Decimal>, levels: &[PriceLevel]) {
    for level in levels {
        if level.is_removal() {
            side.remove(&level.price);
        } else if level.size.is_sign_negative() {
            tracing::warn!(
                price = %level.price,
                size = %level.size,
                "Skipping negative size level"
            );
        } else {
            side.insert(level.price, level.size);
        }
    }
}

fn to_level((price, size): (&Decimal, &Decimal)) -> PriceLevel {
    PriceLevel::new(*price, *size)
}
