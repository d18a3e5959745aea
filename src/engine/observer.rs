//! Observer hook for server-side events.
//!
//! ERROR and RECEIPT frames need no reply, so the dispatcher returns an
//! empty string for them. Callers that want to know the handler ran (test
//! harnesses, metrics, UI) install an [`EngineObserver`] instead of looking
//! at the reply.

use std::sync::Mutex;

/// Event reported to the observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// An ERROR frame was handled.
    Error {
        /// Value of the `message` header, empty if absent.
        message: String,
        /// Frame body as text.
        body: String,
    },
    /// A RECEIPT frame was handled.
    Receipt {
        /// Value of the `receipt-id` header, empty if absent.
        receipt_id: String,
        /// Frame body as text.
        body: String,
    },
}

/// Sink for [`EngineEvent`]s.
pub trait EngineObserver: Send + Sync {
    /// Called after the default ERROR or RECEIPT handler has logged the event.
    fn on_event(&self, event: &EngineEvent);
}

impl<F> EngineObserver for F
where
    F: Fn(&EngineEvent) + Send + Sync,
{
    fn on_event(&self, event: &EngineEvent) {
        self(event)
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl EngineObserver for NoopObserver {
    fn on_event(&self, _event: &EngineEvent) {}
}

/// Observer that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far, oldest first.
    pub fn events(&self) -> Vec<EngineEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EngineObserver for RecordingObserver {
    fn on_event(&self, event: &EngineEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
