use chrono::{DateTime, FixedOffset};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use trading_core::{
    Clock, ExchangeTime, Execution, ExecutionEvent, SystemClock, Timestamp, TimestampError,
};

use crate::gateway_in::ExecutionWriter;

/// Append-only execution log capped at `max_executions` entries.
///
/// Entries keep arrival order, which the feed guarantees is also timestamp
/// order, so window queries can binary-search on the timestamp.
/// Thread-safe, can be cloned and shared across threads.
#[derive(Clone)]
pub struct ExecutionHistory {
    entries: Arc<RwLock<VecDeque<Execution>>>,
    max_executions: usize,
    exchange_time: ExchangeTime,
    clock: Arc<dyn Clock>,
}

impl ExecutionHistory {
    pub fn new(max_executions: usize) -> Self {
        Self::with_clock(
            max_executions,
            ExchangeTime::default(),
            Arc::new(SystemClock::new()),
        )
    }

    pub fn with_clock(
        max_executions: usize,
        exchange_time: ExchangeTime,
        clock: Arc<dyn Clock>,
    ) -> Self {
        ExecutionHistory {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            max_executions,
            exchange_time,
            clock,
        }
    }

    pub fn max_executions(&self) -> usize {
        self.max_executions
    }

    /// Append a batch.
    ///
    /// Every timestamp is parsed before the lock is taken; if any fails the
    /// whole batch is rejected and nothing is appended. After the batch the
    /// oldest entries are dropped down to `max_executions`.
    pub fn append(&self, events: &[ExecutionEvent]) -> Result<Vec<Execution>, TimestampError> {
        let batch = events
            .iter()
            .cloned()
            .map(|event| Execution::from_event(event, &self.exchange_time))
            .collect::<Result<Vec<_>, _>>()?;

        let mut entries = self.entries.write();
        entries.extend(batch.iter().cloned());
        if entries.len() > self.max_executions {
            let excess = entries.len() - self.max_executions;
            entries.drain(..excess);
        }
        Ok(batch)
    }

    /// Executions with `timestamp > now - since`, oldest first
    pub fn since(&self, since: Duration) -> Vec<Execution> {
        self.since_at(self.clock.now(), since)
    }

    /// Executions with `timestamp > now - since`, measured from `now`
    pub fn since_at(&self, now: Timestamp, since: Duration) -> Vec<Execution> {
        let cutoff = chrono::Duration::from_std(since)
            .ok()
            .and_then(|since| now.checked_sub_signed(since));

        let entries = self.entries.read();
        let start = match cutoff {
            Some(cutoff) => {
                let cutoff: DateTime<FixedOffset> = self.exchange_time.localize(cutoff);
                entries.partition_point(|e| e.timestamp <= cutoff)
            }
            // Window reaches past representable time
            None => 0,
        };
        entries.range(start..).cloned().collect()
    }

    pub fn latest(&self) -> Option<Execution> {
        self.entries.read().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copy of the whole history, oldest first
    pub fn all(&self) -> Vec<Execution> {
        self.entries.read().iter().cloned().collect()
    }
}

impl ExecutionWriter for ExecutionHistory {
    fn append(&self, events: &[ExecutionEvent]) -> Result<Vec<Execution>, TimestampError> {
        ExecutionHistory::append(self, events)
    }
}
