//! A2A HTTP server powered by axum
//!
//! Serves:
//! - `POST /`                             JSON-RPC 2.0 endpoint
//! - `GET  /health`                       health and method listing
//! - `GET  /.well-known/agent-card.json`  Agent Card discovery
//!
//! CORS (including the `OPTIONS /` preflight) is handled by a
//! `tower_http::cors` layer on the whole router.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::manager::TaskManager;
use crate::protocol::agent::AgentCard;
use crate::rpc::{JsonRpcResponse, RpcDispatcher};
use crate::store::{InMemoryTaskStore, TaskStore};

pub mod methods;

pub use methods::MessageProcessor;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind, default `127.0.0.1`
    pub bind: String,

    /// Port to listen on, default `4310`
    pub port: u16,

    /// Attach debug detail to JSON-RPC error responses, default off
    pub verbose_errors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 4310,
            verbose_errors: false,
        }
    }
}

/// Shared state handed to every route handler
#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<RpcDispatcher>,
    card: Arc<AgentCard>,
}

/// An A2A agent server: dispatcher, task manager and HTTP surface
pub struct A2AServer {
    config: ServerConfig,
    state: AppState,
    manager: TaskManager,
}

impl A2AServer {
    /// Assemble a server for one agent.
    ///
    /// Registers the three protocol methods against a fresh dispatcher and
    /// an in-memory task store.
    pub fn new(
        config: ServerConfig,
        card: AgentCard,
        processor: Arc<dyn MessageProcessor>,
    ) -> Self {
        Self::with_store(config, card, processor, Arc::new(InMemoryTaskStore::new()))
    }

    /// Assemble a server over a caller-provided task store
    pub fn with_store(
        config: ServerConfig,
        card: AgentCard,
        processor: Arc<dyn MessageProcessor>,
        store: Arc<dyn TaskStore>,
    ) -> Self {
        let manager = TaskManager::new(store);

        let mut dispatcher = RpcDispatcher::new();
        if config.verbose_errors {
            dispatcher = dispatcher.with_verbose_errors();
        }
        methods::register_protocol_methods(&mut dispatcher, manager.clone(), processor);

        let state = AppState {
            dispatcher: Arc::new(dispatcher),
            card: Arc::new(card),
        };

        Self {
            config,
            state,
            manager,
        }
    }

    /// The task manager backing this server
    pub fn manager(&self) -> &TaskManager {
        &self.manager
    }

    /// Build the axum router, also used directly by tests
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind and serve until the process exits
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.bind, self.config.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

        let app = self.router();

        info!("A2A agent '{}' listening on http://{}", self.state.card.name, addr);
        info!("  JSON-RPC:   http://{}/", addr);
        info!("  Agent card: http://{}/.well-known/agent-card.json", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// Build the axum router for an agent
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", post(handle_jsonrpc))
        .route("/health", get(health_check))
        .route("/.well-known/agent-card.json", get(get_agent_card))
        .layer(cors)
        .with_state(state)
}

/// POST / JSON-RPC 2.0 endpoint.
///
/// The body is taken raw so that malformed JSON still produces a JSON-RPC
/// parse error at HTTP 200 instead of an axum extractor rejection.
async fn handle_jsonrpc(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<JsonRpcResponse>) {
    let response = state.dispatcher.dispatch(&body).await;
    (StatusCode::OK, Json(response))
}

/// GET /health health check and method listing
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "transport": "json-rpc-2.0",
        "methods": state.dispatcher.method_names(),
    }))
}

/// GET /.well-known/agent-card.json Agent Card discovery
async fn get_agent_card(State(state): State<AppState>) -> Json<AgentCard> {
    Json(state.card.as_ref().clone())
}
