//! Bounded, time-ordered execution history.

mod history;

pub use history::ExecutionHistory;

/// Default capacity of the execution history
pub const DEFAULT_MAX_EXECUTIONS: usize = 100_000;
