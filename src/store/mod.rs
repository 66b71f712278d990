//! Task persistence seam
//!
//! Hosts inject a store at construction time; the runtime ships an in-memory
//! implementation and treats the store as the single source of truth for
//! task state.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::protocol::{error::A2AResult, task::Task};

/// Storage backend for tasks
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Fetch a task by id
    async fn get(&self, task_id: &str) -> A2AResult<Option<Task>>;

    /// Insert or replace a task
    async fn put(&self, task: Task) -> A2AResult<()>;

    /// Remove a task, ignoring unknown ids
    async fn delete(&self, task_id: &str) -> A2AResult<()>;
}

/// In-memory task store backed by a `RwLock<HashMap>`
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl InMemoryTaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Whether the store holds no tasks
    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn get(&self, task_id: &str) -> A2AResult<Option<Task>> {
        Ok(self.tasks.read().await.get(task_id).cloned())
    }

    async fn put(&self, task: Task) -> A2AResult<()> {
        self.tasks.write().await.insert(task.id.clone(), task);
        Ok(())
    }

    async fn delete(&self, task_id: &str) -> A2AResult<()> {
        self.tasks.write().await.remove(task_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::protocol::message::Message;

    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = InMemoryTaskStore::new();
        let task = Task::new("t-1", Message::user("hi"));

        store.put(task.clone()).await.unwrap();
        let fetched = store.get("t-1").await.unwrap().unwrap();
        assert_eq!(fetched.id, "t-1");

        store.delete("t-1").await.unwrap();
        assert!(store.get("t-1").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let store = InMemoryTaskStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces() {
        let store = InMemoryTaskStore::new();
        let mut task = Task::new("t-1", Message::user("hi"));
        store.put(task.clone()).await.unwrap();

        task.transition(crate::protocol::task::TaskState::Working, None)
            .unwrap();
        store.put(task).await.unwrap();

        let fetched = store.get("t-1").await.unwrap().unwrap();
        assert_eq!(fetched.history.len(), 2);
        assert_eq!(store.len().await, 1);
    }
}
