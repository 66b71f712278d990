//! Proxy for a remote agent
//!
//! Implements the local capability contract over a remote agent: `init`
//! checks reachability, `handle_request` forwards a JSON payload and blocks
//! until the remote task settles, `shutdown` releases local resources. The
//! remote task is observed purely by polling `tasks/get`.

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower_layer::Layer;
use tower_service::Service;
use tracing::{debug, info};

use crate::{
    client::{
        config::ProxyConfig,
        request::{ProxyRequest, RequestContext},
        service::JsonRpcService,
    },
    layer::validation::{ValidationLayer, ValidationService},
    protocol::{
        error::A2AError,
        message::{Message, Part, Role},
        operation::A2AOperation,
        task::{Task, TaskState},
    },
    transport::{HttpTransport, Transport, TransportRequest},
};

/// A proxy that exposes a remote A2A agent as a local capability
pub struct A2AProxy<T: Transport = HttpTransport> {
    transport: T,
    service: ValidationService<JsonRpcService<T>>,
    config: ProxyConfig,
    shutdown: CancellationToken,
}

impl A2AProxy<HttpTransport> {
    /// Create a proxy speaking HTTP+JSON to the configured agent
    pub fn new(config: ProxyConfig) -> Self {
        let transport = HttpTransport::new(config.agent_url.clone());
        Self::with_transport(transport, config)
    }
}

impl<T> A2AProxy<T>
where
    T: Transport,
{
    /// Create a proxy over a caller-provided transport
    pub fn with_transport(transport: T, config: ProxyConfig) -> Self {
        let service = ValidationLayer::new().layer(JsonRpcService::new(transport.clone()));
        Self {
            transport,
            service,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Verify the agent is reachable, failing fast when it is not
    pub async fn init(&mut self) -> Result<(), A2AError> {
        let response = self
            .transport
            .execute(TransportRequest::new("/health", "GET"))
            .await?;

        if !response.is_success() {
            return Err(A2AError::Transport(format!(
                "agent at {} is unreachable: health check returned HTTP {}",
                self.transport.base_url(),
                response.status
            )));
        }

        info!(agent = %self.transport.base_url(), "proxy connected");
        Ok(())
    }

    /// Forward a request payload and block until the remote task settles.
    ///
    /// The payload travels as a `data` part on a fresh user message. The
    /// remote task is polled once per interval until it reaches a terminal
    /// state or the poll ceiling is hit.
    pub async fn handle_request(&mut self, payload: Value) -> Result<Value, A2AError> {
        let token = self.shutdown.child_token();
        self.handle_request_with_token(payload, token).await
    }

    /// Like [`handle_request`](Self::handle_request), with a caller-owned
    /// token that aborts the poll loop without touching the remote task.
    pub async fn handle_request_with_token(
        &mut self,
        payload: Value,
        token: CancellationToken,
    ) -> Result<Value, A2AError> {
        let message = Message::builder()
            .role(Role::User)
            .part(Part::text("Process the attached request payload"))
            .part(Part::json_data(payload))
            .build();

        let value = self
            .call(A2AOperation::SendMessage {
                message,
                task_id: None,
            })
            .await?;
        let mut task: Task = serde_json::from_value(value)?;
        debug!(task_id = %task.id, state = %task.status.state, "request accepted");

        let mut attempts = 0u32;
        while !task.is_terminal() {
            if attempts >= self.config.max_poll_attempts {
                return Err(A2AError::Timeout(format!(
                    "task {} still {} after {} polls",
                    task.id, task.status.state, self.config.max_poll_attempts
                )));
            }

            tokio::select! {
                _ = token.cancelled() => {
                    debug!(task_id = %task.id, "poll loop aborted by caller");
                    return Err(A2AError::Timeout(format!(
                        "polling for task {} aborted",
                        task.id
                    )));
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }

            attempts += 1;
            let value = self
                .call(A2AOperation::GetTask {
                    task_id: task.id.clone(),
                })
                .await?;
            task = serde_json::from_value(value)?;
        }

        resolve_terminal(task)
    }

    /// Cancel a remote task
    pub async fn cancel(
        &mut self,
        task_id: &str,
        reason: Option<String>,
    ) -> Result<Task, A2AError> {
        let value = self
            .call(A2AOperation::CancelTask {
                task_id: task_id.to_string(),
                reason,
            })
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Release local resources.
    ///
    /// Aborts poll loops spawned from [`handle_request`](Self::handle_request);
    /// tasks already running on the remote agent are left to finish.
    pub fn shutdown(&mut self) {
        self.shutdown.cancel();
        info!(agent = %self.transport.base_url(), "proxy shut down");
    }

    async fn call(&mut self, operation: A2AOperation) -> Result<Value, A2AError> {
        let mut context = RequestContext::new().with_timeout(self.config.timeout);
        if let Some(auth) = &self.config.auth {
            context = context.with_auth(auth.clone());
        }
        self.service.call(ProxyRequest::new(operation, context)).await
    }
}

/// Turn a settled task into the proxy's result
fn resolve_terminal(task: Task) -> Result<Value, A2AError> {
    match task.status.state {
        TaskState::Completed => match task.artifacts.first() {
            Some(artifact) => artifact.decode_json(),
            None => Ok(json!({ "status": "completed", "taskId": task.id })),
        },
        state => Err(A2AError::RemoteTask {
            task_id: task.id.clone(),
            state: state.to_string(),
            message: task
                .status
                .message
                .as_ref()
                .map(|m| m.text())
                .unwrap_or_default(),
        }),
    }
}
