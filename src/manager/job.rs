//! Cancellable background jobs
//!
//! Handlers never run long work inline. They transition the task to working
//! and hand the rest to [`TaskManager::spawn_job`], which drives the task to
//! its terminal state from the job's outcome. Cancellation is cooperative:
//! a job calls [`JobContext::checkpoint`] at natural pauses and stops when
//! the task has already been moved to a terminal state underneath it.

use std::future::Future;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::protocol::{artifact::Artifact, message::Message};

use super::TaskManager;

/// Why a job stopped without producing output
#[derive(Debug, Error)]
pub enum JobError {
    /// The work itself failed; the task moves to failed
    #[error("{0}")]
    Failed(String),

    /// The task was canceled or failed externally; the job stops silently
    #[error("job interrupted")]
    Interrupted,
}

impl JobError {
    /// Convenience constructor for failure with a formatted reason
    pub fn failed(reason: impl Into<String>) -> Self {
        JobError::Failed(reason.into())
    }
}

/// Successful output of a job
#[derive(Debug, Default)]
pub struct JobOutput {
    /// Final message recorded on the completed task
    pub message: Option<Message>,

    /// Artifacts attached to the completed task
    pub artifacts: Vec<Artifact>,
}

impl JobOutput {
    /// Output with a closing agent message
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            message: Some(Message::agent(text)),
            artifacts: Vec::new(),
        }
    }

    /// Attach an artifact
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }
}

/// Handle a running job uses to observe and report on its task
#[derive(Clone)]
pub struct JobContext {
    task_id: String,
    manager: TaskManager,
    token: CancellationToken,
}

impl JobContext {
    /// The id of the task this job is driving
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Token cancelled when the host shuts down
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cooperative cancellation point.
    ///
    /// Re-reads the task and returns [`JobError::Interrupted`] when it has
    /// already reached a terminal state or the host token is cancelled. Call
    /// between units of work; a job that never checkpoints runs to its end
    /// and finds out at completion time.
    pub async fn checkpoint(&self) -> Result<(), JobError> {
        if self.token.is_cancelled() {
            return Err(JobError::Interrupted);
        }
        match self.manager.get_task(&self.task_id).await {
            Ok(task) if task.is_terminal() => Err(JobError::Interrupted),
            Ok(_) => Ok(()),
            // A vanished task cannot be completed either; stop quietly.
            Err(_) => Err(JobError::Interrupted),
        }
    }

    /// Record a progress note on the task
    pub async fn progress(&self, text: impl Into<String>) -> Result<(), JobError> {
        let message = Message::agent(text).with_task_id(&self.task_id);
        self.manager
            .update_task_status(&self.task_id, message)
            .await
            .map(|_| ())
            .map_err(|_| JobError::Interrupted)
    }
}

impl TaskManager {
    /// Run a job for a task on a background tokio task.
    ///
    /// The job's outcome drives the task: `Ok` completes it, `Failed` fails
    /// it, `Interrupted` leaves it alone (something else already moved it).
    /// A completion that loses a race against an external cancel is logged
    /// and dropped rather than surfaced; the task keeps its first terminal
    /// state.
    pub fn spawn_job<F, Fut>(&self, task_id: impl Into<String>, job: F) -> JoinHandle<()>
    where
        F: FnOnce(JobContext) -> Fut + Send + 'static,
        Fut: Future<Output = Result<JobOutput, JobError>> + Send + 'static,
    {
        self.spawn_job_with_token(task_id, CancellationToken::new(), job)
    }

    /// Like [`spawn_job`](Self::spawn_job) with a caller-owned token for
    /// host shutdown.
    pub fn spawn_job_with_token<F, Fut>(
        &self,
        task_id: impl Into<String>,
        token: CancellationToken,
        job: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(JobContext) -> Fut + Send + 'static,
        Fut: Future<Output = Result<JobOutput, JobError>> + Send + 'static,
    {
        let task_id = task_id.into();
        let ctx = JobContext {
            task_id: task_id.clone(),
            manager: self.clone(),
            token,
        };
        let manager = self.clone();

        tokio::spawn(async move {
            match job(ctx).await {
                Ok(output) => {
                    if let Err(e) = manager
                        .complete_task(&task_id, output.message, output.artifacts)
                        .await
                    {
                        warn!(task_id, error = %e, "job finished but task could not complete");
                    }
                }
                Err(JobError::Failed(reason)) => {
                    if let Err(e) = manager.fail_task(&task_id, &reason).await {
                        error!(task_id, error = %e, "job failed and task could not be failed");
                    }
                }
                Err(JobError::Interrupted) => {
                    debug!(task_id, "job interrupted, leaving task state untouched");
                }
            }
        })
    }
}
