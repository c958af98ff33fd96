//! Mock Procore API server.
//!
//! One axum app answers both the OAuth token endpoint and the REST API, so a
//! single base URL can be used for `oauth_url` and `api_url`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::Fixtures;
use super::handlers;
use super::state::MockState;
use crate::ClientConfig;

type SharedState = Arc<RwLock<MockState>>;

/// A running mock Procore server bound to a random local port.
pub struct MockServer {
    addr: SocketAddr,
    url: String,
    task: JoinHandle<()>,
    state: SharedState,
}

impl MockServer {
    /// Serve the default scenario (see [`Fixtures::default_scenario`]).
    pub async fn start() -> Self {
        Self::with_state(MockState::from_scenario(Fixtures::default_scenario())).await
    }

    /// Serve no companies, projects or direct costs.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Serve `state`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_state(state: MockState) -> Self {
        let state = state.shared();

        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .expect("mock server could not bind a local port");
        let addr = listener
            .local_addr()
            .expect("mock server listener has no local address");

        let app = routes(state.clone());
        let task = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::error!(error = %err, "mock server stopped");
            }
        });
        tracing::debug!(%addr, "mock server listening");

        Self {
            addr,
            url: format!("http://{addr}"),
            task,
            state,
        }
    }

    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Client config pointing both the OAuth and API hosts at this server.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::with_base_urls(&self.url, &self.url)
    }

    /// The live state; edits are visible to the next request.
    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    /// Number of requests the server has received for `path`.
    pub async fn request_count(&self, path: &str) -> usize {
        self.state.read().await.request_count(path)
    }

    /// Stop serving and wait for the task to finish.
    pub async fn shutdown(self) {
        self.task.abort();
        // A cancelled JoinError is the expected outcome
        let _ = self.task.await;
    }
}

fn routes(state: SharedState) -> Router {
    let direct_costs = "/rest/v1.1/projects/:project_id/direct_costs";
    let direct_cost = "/rest/v1.1/projects/:project_id/direct_costs/:direct_cost_id";

    Router::new()
        .route("/oauth/token", post(handlers::issue_token))
        .route("/rest/v1.0/companies", get(handlers::list_companies))
        .route("/rest/v1.1/projects", get(handlers::list_projects))
        .route(
            direct_costs,
            get(handlers::list_direct_costs).post(handlers::create_direct_cost),
        )
        .route(
            direct_cost,
            get(handlers::get_direct_cost).patch(handlers::attach_to_direct_cost),
        )
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}
