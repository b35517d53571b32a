//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! The session publishes one [`WorkbenchEvent`] per applied action so that
//! observers (a UI, a log sink, tests) can follow state changes without
//! holding a reference to the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use vidbench_core::actions::Action;
use vidbench_core::types::EntityId;

// ---------------------------------------------------------------------------
// WorkbenchEvent
// ---------------------------------------------------------------------------

/// A state change that was applied to the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbenchEvent {
    /// Action kind, e.g. `"finalize_project"`.
    pub event_type: String,

    /// Project the action names directly, if any.
    pub project_id: Option<EntityId>,

    /// The serialized action.
    pub payload: serde_json::Value,

    /// When the action was applied (UTC).
    pub timestamp: DateTime<Utc>,
}

impl WorkbenchEvent {
    pub fn from_action(action: &Action) -> Self {
        Self {
            event_type: action.kind().to_string(),
            project_id: action.project_id().map(String::from),
            payload: serde_json::to_value(action).unwrap_or_default(),
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use vidbench_session::events::EventBus;
///
/// let bus = EventBus::default();
/// let _rx = bus.subscribe();
/// assert_eq!(bus.subscriber_count(), 1);
/// ```
pub struct EventBus {
    sender: broadcast::Sender<WorkbenchEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// Slow receivers observe `RecvError::Lagged` once the buffer is full.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: WorkbenchEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkbenchEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
