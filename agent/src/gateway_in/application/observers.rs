use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use trading_core::{BoardUpdateEvent, Execution, TimestampError};

use crate::gateway_in::domain::MarketEvent;

type BoardObserver = Arc<dyn Fn(&BoardUpdateEvent) + Send + Sync>;
type ExecutionObserver = Arc<dyn Fn(&[Execution]) + Send + Sync>;

/// Handle returned by observer registration, used to remove the observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Registry of board and execution observers plus a broadcast stream of
/// every decoded event.
///
/// Observers are called outside the registry lock, in registration order,
/// on the task driving the receive loop. They should return quickly.
pub struct ObserverRegistry {
    next_id: AtomicU64,
    board: RwLock<Vec<(ObserverId, BoardObserver)>>,
    executions: RwLock<Vec<(ObserverId, ExecutionObserver)>>,
    events: broadcast::Sender<MarketEvent>,
}

impl ObserverRegistry {
    pub fn new(event_buffer: usize) -> Self {
        let (events, _) = broadcast::channel(event_buffer.max(1));
        ObserverRegistry {
            next_id: AtomicU64::new(1),
            board: RwLock::new(Vec::new()),
            executions: RwLock::new(Vec::new()),
            events,
        }
    }

    fn next_id(&self) -> ObserverId {
        ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub fn on_board<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&BoardUpdateEvent) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.board.write().push((id, Arc::new(observer)));
        id
    }

    pub fn on_execution<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&[Execution]) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.executions.write().push((id, Arc::new(observer)));
        id
    }

    /// Remove an observer. Returns false if the id is unknown.
    pub fn remove(&self, id: ObserverId) -> bool {
        let mut board = self.board.write();
        if let Some(pos) = board.iter().position(|(oid, _)| *oid == id) {
            board.remove(pos);
            return true;
        }
        drop(board);

        let mut executions = self.executions.write();
        if let Some(pos) = executions.iter().position(|(oid, _)| *oid == id) {
            executions.remove(pos);
            return true;
        }
        false
    }

    /// Subscribe to the broadcast stream of market events.
    /// Lagging receivers lose the oldest events.
    pub fn events(&self) -> broadcast::Receiver<MarketEvent> {
        self.events.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.board.read().len() + self.executions.read().len()
    }

    pub fn notify_board(&self, update: BoardUpdateEvent) {
        let observers: Vec<BoardObserver> =
            self.board.read().iter().map(|(_, o)| Arc::clone(o)).collect();
        for observer in &observers {
            observer(&update);
        }
        // No receivers is not an error
        let _ = self.events.send(MarketEvent::Board(Arc::new(update)));
    }

    pub fn notify_executions(&self, executions: Vec<Execution>) {
        let observers: Vec<ExecutionObserver> = self
            .executions
            .read()
            .iter()
            .map(|(_, o)| Arc::clone(o))
            .collect();
        for observer in &observers {
            observer(&executions);
        }
        let _ = self.events.send(MarketEvent::Executions(Arc::new(executions)));
    }

    /// Broadcast only; execution observers never see a rejected batch
    pub fn notify_rejected(&self, count: usize, error: TimestampError) {
        let _ = self
            .events
            .send(MarketEvent::RejectedExecutions { count, error });
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::atomic::AtomicUsize;
    use trading_core::PriceLevel;

    fn update() -> BoardUpdateEvent {
        BoardUpdateEvent::new(
            dec!(100),
            vec![PriceLevel::new(dec!(99), dec!(1))],
            vec![PriceLevel::new(dec!(101), dec!(2))],
        )
    }

    #[test]
    fn test_multiple_board_observers() {
        let registry = ObserverRegistry::default();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let f = Arc::clone(&first);
        registry.on_board(move |_| {
            f.fetch_add(1, Ordering::SeqCst);
        });
        let s = Arc::clone(&second);
        registry.on_board(move |u| {
            assert_eq!(u.mid_price, dec!(100));
            s.fetch_add(1, Ordering::SeqCst);
        });

        registry.notify_board(update());
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_observer() {
        let registry = ObserverRegistry::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&calls);
        let id = registry.on_execution(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(registry.observer_count(), 1);

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        registry.notify_executions(Vec::new());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_observer_can_register_from_callback() {
        // Observers run outside the lock, so re-entrant registration must not deadlock
        let registry = Arc::new(ObserverRegistry::default());
        let inner = Arc::clone(&registry);
        registry.on_board(move |_| {
            inner.on_execution(|_| {});
        });

        registry.notify_board(update());
        assert_eq!(registry.observer_count(), 2);
    }

    #[test]
    fn test_broadcast_receives_events() {
        let registry = ObserverRegistry::default();
        let mut rx = registry.events();

        registry.notify_board(update());
        match rx.try_recv().unwrap() {
            MarketEvent::Board(u) => assert_eq!(u.bids.len(), 1),
            other => panic!("Expected board event, got {:?}", other),
        }
    }

    #[test]
    fn test_rejected_batch_is_broadcast_only() {
        let registry = ObserverRegistry::default();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        registry.on_execution(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let mut rx = registry.events();

        registry.notify_rejected(3, TimestampError::TooShort("bad".to_string()));
        match rx.try_recv().unwrap() {
            MarketEvent::RejectedExecutions { count, error } => {
                assert_eq!(count, 3);
                assert_eq!(error, TimestampError::TooShort("bad".to_string()));
            }
            other => panic!("Expected rejected batch, got {:?}", other),
        }
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }
}
