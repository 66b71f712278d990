//! Task lifecycle event channel
//!
//! Transitions are published into a bounded mpsc channel in the order they
//! commit. A full channel blocks the publisher, so backpressure is visible
//! at the transition site instead of an unbounded queue growing silently.

use tokio::sync::mpsc;
use tracing::debug;

use crate::protocol::task::TaskState;

/// A task lifecycle event
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    /// A task committed a state transition
    StateChanged {
        /// The task that changed
        task_id: String,

        /// Previous state, `None` for creation
        from: Option<TaskState>,

        /// New state
        to: TaskState,
    },
}

/// Sending half of the task event channel
#[derive(Debug, Clone)]
pub struct TaskEventBus {
    tx: mpsc::Sender<TaskEvent>,
}

impl TaskEventBus {
    /// Create a bus and its receiving half with the given capacity
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<TaskEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Publish an event, waiting if the channel is full.
    ///
    /// A dropped receiver is not an error; events are then discarded.
    pub async fn publish(&self, event: TaskEvent) {
        if self.tx.send(event).await.is_err() {
            debug!("task event receiver dropped, discarding event");
        }
    }
}
