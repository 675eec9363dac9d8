/// Lifecycle of a realtime client's subscription.
///
/// `Idle → Bootstrapping → Streaming → Closed`; there is no reconnect state,
/// a closed client stays closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamState {
    /// Constructed, `subscribe` not called yet
    Idle,
    /// Sending subscribe requests
    Bootstrapping,
    /// Receive loop running
    Streaming,
    /// Torn down by close, cancellation, staleness or a transport error
    Closed,
}

impl StreamState {
    pub fn is_streaming(&self) -> bool {
        matches!(self, StreamState::Streaming)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, StreamState::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_state_transitions() {
        assert!(StreamState::Streaming.is_streaming());
        assert!(StreamState::Closed.is_closed());
        assert!(!StreamState::Idle.is_closed());
    }
}
