//! Task lifecycle orchestration
//!
//! [`TaskManager`] owns every state transition. All mutations run
//! read-modify-write under one internal async mutex, so two racing
//! transitions (a cancel against a complete, say) serialize: the first
//! commits, the second sees a terminal task and fails its legality check.
//! The store remains the single source of truth; the manager holds no task
//! state of its own.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::protocol::{
    artifact::Artifact,
    error::{A2AError, A2AResult},
    message::Message,
    task::{Task, TaskState},
};
use crate::store::TaskStore;

pub mod events;
pub mod job;

pub use events::{TaskEvent, TaskEventBus};
pub use job::{JobContext, JobError, JobOutput};

struct ManagerInner {
    store: Arc<dyn TaskStore>,
    /// Serializes all read-modify-write transitions
    mutation: Mutex<()>,
    events: Option<TaskEventBus>,
}

/// Orchestrates task state according to the lifecycle rules
#[derive(Clone)]
pub struct TaskManager {
    inner: Arc<ManagerInner>,
}

impl TaskManager {
    /// Create a manager over the given store
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                store,
                mutation: Mutex::new(()),
                events: None,
            }),
        }
    }

    /// Create a manager that publishes lifecycle events
    pub fn with_events(store: Arc<dyn TaskStore>, events: TaskEventBus) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                store,
                mutation: Mutex::new(()),
                events: Some(events),
            }),
        }
    }

    /// Create a new task in the submitted state
    pub async fn create_task(
        &self,
        message: Message,
        context_id: Option<String>,
        metadata: Option<Value>,
    ) -> A2AResult<Task> {
        let _guard = self.inner.mutation.lock().await;

        let id = Uuid::now_v7().to_string();
        let mut task = Task::new(&id, message);
        task.context_id = context_id;
        task.metadata = metadata;

        self.inner.store.put(task.clone()).await?;
        info!(task_id = %id, "task created");
        self.emit(&id, None, TaskState::Submitted).await;
        Ok(task)
    }

    /// Fetch a task, erroring when the id is unknown
    pub async fn get_task(&self, task_id: &str) -> A2AResult<Task> {
        self.inner
            .store
            .get(task_id)
            .await?
            .ok_or_else(|| A2AError::TaskNotFound {
                task_id: task_id.to_string(),
            })
    }

    /// Move a submitted task to working
    pub async fn start_task(&self, task_id: &str, message: Option<Message>) -> A2AResult<Task> {
        self.transition(task_id, TaskState::Working, message).await
    }

    /// Record a progress note on a working task without changing state
    pub async fn update_task_status(&self, task_id: &str, message: Message) -> A2AResult<Task> {
        let _guard = self.inner.mutation.lock().await;

        let mut task = self.fetch(task_id).await?;
        if task.status.state != TaskState::Working {
            return Err(A2AError::InvalidTransition {
                from: task.status.state.to_string(),
                to: TaskState::Working.to_string(),
            });
        }
        task.record_progress(message);
        self.inner.store.put(task.clone()).await?;
        Ok(task)
    }

    /// Complete a working task, attaching its outputs
    pub async fn complete_task(
        &self,
        task_id: &str,
        message: Option<Message>,
        artifacts: Vec<Artifact>,
    ) -> A2AResult<Task> {
        let _guard = self.inner.mutation.lock().await;

        let mut task = self.fetch(task_id).await?;
        let from = task.status.state;
        task.transition(TaskState::Completed, message)?;
        for artifact in artifacts {
            task.push_artifact(artifact);
        }
        self.inner.store.put(task.clone()).await?;
        info!(task_id, "task completed");
        self.emit(task_id, Some(from), TaskState::Completed).await;
        Ok(task)
    }

    /// Fail a non-terminal task, recording the error text
    pub async fn fail_task(&self, task_id: &str, error: impl Into<String>) -> A2AResult<Task> {
        let reason = error.into();
        let message = Message::agent(&reason).with_task_id(task_id);
        debug!(task_id, %reason, "failing task");
        self.transition(task_id, TaskState::Failed, Some(message))
            .await
    }

    /// Cancel a non-terminal task.
    ///
    /// Canceling twice reports [`A2AError::TaskAlreadyCanceled`]; canceling a
    /// completed or failed task reports [`A2AError::TaskNotCancelable`].
    /// Neither mutates the task.
    pub async fn cancel_task(&self, task_id: &str, reason: Option<String>) -> A2AResult<Task> {
        let _guard = self.inner.mutation.lock().await;

        let mut task = self.fetch(task_id).await?;
        match task.status.state {
            TaskState::Canceled => {
                return Err(A2AError::TaskAlreadyCanceled {
                    task_id: task_id.to_string(),
                })
            }
            state if state.is_terminal() => {
                return Err(A2AError::TaskNotCancelable {
                    task_id: task_id.to_string(),
                    state: state.to_string(),
                })
            }
            _ => {}
        }

        let from = task.status.state;
        let message = reason
            .map(|r| Message::agent(format!("Canceled: {}", r)).with_task_id(task_id));
        task.transition(TaskState::Canceled, message)?;
        self.inner.store.put(task.clone()).await?;
        info!(task_id, "task canceled");
        self.emit(task_id, Some(from), TaskState::Canceled).await;
        Ok(task)
    }

    /// Generic locked transition used by start and fail paths
    async fn transition(
        &self,
        task_id: &str,
        next: TaskState,
        message: Option<Message>,
    ) -> A2AResult<Task> {
        let _guard = self.inner.mutation.lock().await;

        let mut task = self.fetch(task_id).await?;
        let from = task.status.state;
        task.transition(next, message)?;
        self.inner.store.put(task.clone()).await?;
        self.emit(task_id, Some(from), next).await;
        Ok(task)
    }

    async fn fetch(&self, task_id: &str) -> A2AResult<Task> {
        self.inner
            .store
            .get(task_id)
            .await?
            .ok_or_else(|| A2AError::TaskNotFound {
                task_id: task_id.to_string(),
            })
    }

    async fn emit(&self, task_id: &str, from: Option<TaskState>, to: TaskState) {
        if let Some(events) = &self.inner.events {
            events
                .publish(TaskEvent::StateChanged {
                    task_id: task_id.to_string(),
                    from,
                    to,
                })
                .await;
        }
    }
}

impl std::fmt::Debug for TaskManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskManager")
            .field("events", &self.inner.events.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use crate::store::InMemoryTaskStore;

    use super::*;

    mock! {
        Store {}

        #[async_trait::async_trait]
        impl TaskStore for Store {
            async fn get(&self, task_id: &str) -> A2AResult<Option<Task>>;
            async fn put(&self, task: Task) -> A2AResult<()>;
            async fn delete(&self, task_id: &str) -> A2AResult<()>;
        }
    }

    fn manager() -> TaskManager {
        TaskManager::new(Arc::new(InMemoryTaskStore::new()))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let manager = manager();
        let task = manager
            .create_task(Message::user("do it"), Some("ctx-1".into()), None)
            .await
            .unwrap();

        assert_eq!(task.status.state, TaskState::Submitted);
        assert_eq!(task.context_id, Some("ctx-1".to_string()));

        let fetched = manager.get_task(&task.id).await.unwrap();
        assert_eq!(fetched.id, task.id);
    }

    #[tokio::test]
    async fn test_get_unknown_task() {
        let manager = manager();
        let err = manager.get_task("nope").await.unwrap_err();
        assert_eq!(err.code(), -32001);
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let manager = manager();
        let task = manager
            .create_task(Message::user("work"), None, None)
            .await
            .unwrap();

        let task = manager.start_task(&task.id, None).await.unwrap();
        assert_eq!(task.status.state, TaskState::Working);

        let task = manager
            .update_task_status(&task.id, Message::agent("halfway"))
            .await
            .unwrap();
        assert_eq!(task.status.state, TaskState::Working);
        assert_eq!(task.history.len(), 3);

        let artifact = Artifact::inline_json("out", &serde_json::json!({"ok": true})).unwrap();
        let task = manager
            .complete_task(&task.id, Some(Message::agent("done")), vec![artifact])
            .await
            .unwrap();
        assert_eq!(task.status.state, TaskState::Completed);
        assert_eq!(task.artifacts.len(), 1);
        assert_eq!(task.history.last().unwrap(), &task.status);
    }

    #[tokio::test]
    async fn test_complete_requires_working() {
        let manager = manager();
        let task = manager
            .create_task(Message::user("x"), None, None)
            .await
            .unwrap();

        let err = manager
            .complete_task(&task.id, None, vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, A2AError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_fail_from_submitted() {
        let manager = manager();
        let task = manager
            .create_task(Message::user("x"), None, None)
            .await
            .unwrap();

        let task = manager.fail_task(&task.id, "no capacity").await.unwrap();
        assert_eq!(task.status.state, TaskState::Failed);
        let last = task.history.last().unwrap();
        assert!(last.message.as_ref().unwrap().text().contains("no capacity"));
    }

    #[tokio::test]
    async fn test_cancel_semantics() {
        let manager = manager();
        let task = manager
            .create_task(Message::user("x"), None, None)
            .await
            .unwrap();

        let task = manager
            .cancel_task(&task.id, Some("changed my mind".into()))
            .await
            .unwrap();
        assert_eq!(task.status.state, TaskState::Canceled);

        let err = manager.cancel_task(&task.id, None).await.unwrap_err();
        assert_eq!(err.code(), -32002);
    }

    #[tokio::test]
    async fn test_cancel_completed_not_cancelable() {
        let manager = manager();
        let task = manager
            .create_task(Message::user("x"), None, None)
            .await
            .unwrap();
        manager.start_task(&task.id, None).await.unwrap();
        manager.complete_task(&task.id, None, vec![]).await.unwrap();

        let err = manager.cancel_task(&task.id, None).await.unwrap_err();
        assert_eq!(err.code(), -32003);

        // The failed attempt must not have touched the task.
        let task = manager.get_task(&task.id).await.unwrap();
        assert_eq!(task.status.state, TaskState::Completed);
    }

    #[tokio::test]
    async fn test_cancel_complete_race_yields_one_terminal() {
        let manager = manager();
        let task = manager
            .create_task(Message::user("x"), None, None)
            .await
            .unwrap();
        manager.start_task(&task.id, None).await.unwrap();

        let m1 = manager.clone();
        let m2 = manager.clone();
        let id1 = task.id.clone();
        let id2 = task.id.clone();
        let complete = tokio::spawn(async move { m1.complete_task(&id1, None, vec![]).await });
        let cancel = tokio::spawn(async move { m2.cancel_task(&id2, None).await });

        let results = [complete.await.unwrap(), cancel.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);

        let final_task = manager.get_task(&task.id).await.unwrap();
        assert!(final_task.is_terminal());
    }

    #[tokio::test]
    async fn test_events_published_in_order() {
        let (bus, mut rx) = TaskEventBus::channel(16);
        let manager = TaskManager::with_events(Arc::new(InMemoryTaskStore::new()), bus);

        let task = manager
            .create_task(Message::user("x"), None, None)
            .await
            .unwrap();
        manager.start_task(&task.id, None).await.unwrap();
        manager.complete_task(&task.id, None, vec![]).await.unwrap();

        let states: Vec<TaskState> = [
            rx.recv().await.unwrap(),
            rx.recv().await.unwrap(),
            rx.recv().await.unwrap(),
        ]
        .into_iter()
        .map(|e| match e {
            TaskEvent::StateChanged { to, .. } => to,
        })
        .collect();

        assert_eq!(
            states,
            vec![TaskState::Submitted, TaskState::Working, TaskState::Completed]
        );
    }

    #[tokio::test]
    async fn test_store_write_failure_surfaces() {
        let mut store = MockStore::new();
        store
            .expect_put()
            .returning(|_| Err(A2AError::Internal("store unavailable".into())));

        let manager = TaskManager::new(Arc::new(store));
        let err = manager
            .create_task(Message::user("x"), None, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), -32603);
    }

    #[tokio::test]
    async fn test_store_read_failure_surfaces() {
        let mut store = MockStore::new();
        store
            .expect_get()
            .returning(|_| Err(A2AError::Internal("store unavailable".into())));

        let manager = TaskManager::new(Arc::new(store));
        let err = manager.get_task("t-1").await.unwrap_err();
        assert_eq!(err.code(), -32603);
    }

    #[tokio::test]
    async fn test_history_is_monotonic() {
        let manager = manager();
        let task = manager
            .create_task(Message::user("x"), None, None)
            .await
            .unwrap();
        let after_start = manager.start_task(&task.id, None).await.unwrap();
        assert!(after_start.history.len() > task.history.len());
        assert_eq!(after_start.history[0].state, TaskState::Submitted);
    }
}
