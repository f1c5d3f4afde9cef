//! Buffered page events
//!
//! Console messages and uncaught script errors arrive asynchronously while a
//! page loads. They are pushed into a bounded ring buffer and drained by the
//! detector that subscribed.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Console message level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleKind {
    Error,
    Warning,
    Other,
}

impl ConsoleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleKind::Error => "error",
            ConsoleKind::Warning => "warning",
            ConsoleKind::Other => "other",
        }
    }
}

impl fmt::Display for ConsoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An event observed on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// A `console.*` call
    Console { kind: ConsoleKind, text: String },
    /// An exception that no script caught
    UncaughtError { text: String },
}

#[derive(Debug)]
struct EventBuffer {
    events: VecDeque<PageEvent>,
    capacity: usize,
    dropped: usize,
}

/// Cloneable handle onto a bounded event buffer
///
/// The producer side (the automation handle) calls [`push`](Self::push); the
/// consumer side calls [`drain`](Self::drain). When the buffer is full the
/// oldest event is discarded and counted.
#[derive(Debug, Clone)]
pub struct EventSubscription {
    inner: Arc<Mutex<EventBuffer>>,
}

/// Events taken out of a subscription in one drain
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DrainedEvents {
    pub events: Vec<PageEvent>,
    /// Events discarded since the previous drain because the buffer was full
    pub dropped: usize,
}

impl EventSubscription {
    /// Creates an empty buffer holding at most `capacity` events (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(EventBuffer {
                events: VecDeque::with_capacity(capacity),
                capacity,
                dropped: 0,
            })),
        }
    }

    pub fn push(&self, event: PageEvent) {
        let mut buffer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if buffer.events.len() >= buffer.capacity {
            buffer.events.pop_front();
            buffer.dropped += 1;
        }
        buffer.events.push_back(event);
    }

    /// Takes every buffered event and resets the dropped counter
    pub fn drain(&self) -> DrainedEvents {
        let mut buffer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let dropped = std::mem::take(&mut buffer.dropped);
        DrainedEvents {
            events: buffer.events.drain(..).collect(),
            dropped,
        }
    }

    /// Discards buffered events without reporting them
    pub fn clear(&self) {
        let mut buffer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        buffer.events.clear();
        buffer.dropped = 0;
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .events
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
