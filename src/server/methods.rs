//! Protocol method handlers
//!
//! Wires the dispatcher to the task manager. Handlers stay short: validate
//! params, transition, hand long work to a background job, respond with the
//! task snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::manager::{JobContext, JobError, JobOutput, TaskManager};
use crate::protocol::{
    error::A2AError,
    message::Message,
    task::{CancelTaskParams, GetTaskParams, SendMessageParams},
};
use crate::rpc::RpcDispatcher;

/// The seam where agent business logic plugs into the runtime.
///
/// One processor is registered per server; `message/send` drives it on a
/// background job after the task has moved to working.
#[async_trait]
pub trait MessageProcessor: Send + Sync {
    /// Process one incoming message, producing the task's output.
    ///
    /// Call [`JobContext::checkpoint`] between units of work to honor
    /// cancellation.
    async fn process(&self, ctx: JobContext, message: Message) -> Result<JobOutput, JobError>;
}

/// An echo processor, useful for wiring tests and demos
pub struct EchoProcessor;

#[async_trait]
impl MessageProcessor for EchoProcessor {
    async fn process(&self, ctx: JobContext, message: Message) -> Result<JobOutput, JobError> {
        ctx.checkpoint().await?;
        Ok(JobOutput::text(format!("echo: {}", message.text())))
    }
}

/// Register `message/send`, `tasks/get` and `tasks/cancel` on a dispatcher
pub fn register_protocol_methods(
    dispatcher: &mut RpcDispatcher,
    manager: TaskManager,
    processor: Arc<dyn MessageProcessor>,
) {
    {
        let manager = manager.clone();
        let processor = processor.clone();
        dispatcher.register("message/send", move |params| {
            let manager = manager.clone();
            let processor = processor.clone();
            async move { handle_send_message(manager, processor, params).await }.boxed()
        });
    }

    {
        let manager = manager.clone();
        dispatcher.register("tasks/get", move |params| {
            let manager = manager.clone();
            async move { handle_get_task(manager, params).await }.boxed()
        });
    }

    dispatcher.register("tasks/cancel", move |params| {
        let manager = manager.clone();
        async move { handle_cancel_task(manager, params).await }.boxed()
    });
}

fn parse_params<T: DeserializeOwned>(params: Value, method: &str) -> Result<T, A2AError> {
    serde_json::from_value(params)
        .map_err(|e| A2AError::InvalidParams(format!("{} params: {}", method, e)))
}

/// `message/send`: create a task and start processing, or fetch the task a
/// `taskId` names (continuation of an existing exchange, never a restart).
async fn handle_send_message(
    manager: TaskManager,
    processor: Arc<dyn MessageProcessor>,
    params: Value,
) -> Result<Value, A2AError> {
    let params: SendMessageParams = parse_params(params, "message/send")?;

    if params.message.parts.is_empty() {
        return Err(A2AError::InvalidParams(
            "message/send params: message must have at least one part".to_string(),
        ));
    }

    if let Some(task_id) = params.task_id {
        let task = manager.get_task(&task_id).await?;
        return Ok(serde_json::to_value(task)?);
    }

    let context_id = params.message.context_id.clone();
    let message = params.message;
    let task = manager
        .create_task(message.clone(), context_id, None)
        .await?;
    let task = manager.start_task(&task.id, None).await?;

    manager.spawn_job(&task.id, move |ctx| {
        let processor = processor.clone();
        async move { processor.process(ctx, message).await }
    });

    Ok(serde_json::to_value(task)?)
}

/// `tasks/get`: return the task snapshot, history and artifacts included
async fn handle_get_task(manager: TaskManager, params: Value) -> Result<Value, A2AError> {
    let params: GetTaskParams = parse_params(params, "tasks/get")?;
    let task = manager.get_task(&params.task_id).await?;
    Ok(serde_json::to_value(task)?)
}

/// `tasks/cancel`: cancel a non-terminal task
async fn handle_cancel_task(manager: TaskManager, params: Value) -> Result<Value, A2AError> {
    let params: CancelTaskParams = parse_params(params, "tasks/cancel")?;
    let task = manager.cancel_task(&params.task_id, params.reason).await?;
    Ok(serde_json::to_value(task)?)
}
