//! Hive JSON-RPC client
//!
//! Talks to public Hive API nodes over HTTPS using the `condenser_api`
//! methods for listing posts, reading a single post, and reading accounts.
//! A failed call moves the client on to the next node so a retry lands on a
//! different server.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;

use super::{Account, Discussion, PostQuery};

/// Public API nodes, tried in order
pub const DEFAULT_NODES: &[&str] = &[
    "https://api.hive.blog",
    "https://api.openhive.network",
    "https://hived.privex.io",
    "https://hive-api.arcange.eu",
    "https://anyx.io",
];

/// Per-request timeout for node calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when calling a Hive node
#[derive(Debug, Error)]
pub enum HiveError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node answered with neither a result nor an error
    #[error("Node returned an empty response")]
    EmptyResponse,

    /// The client was built without any nodes
    #[error("No API nodes configured")]
    NoNodes,
}

/// Upstream operations the content service depends on
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Lists the most recent posts matching `query`
    async fn get_discussions_by_created(
        &self,
        query: &PostQuery,
    ) -> Result<Vec<Discussion>, HiveError>;

    /// Reads a single post, or `None` if it does not exist
    async fn get_content(
        &self,
        author: &str,
        permlink: &str,
    ) -> Result<Option<Discussion>, HiveError>;

    /// Reads an account, or `None` if it does not exist
    async fn get_account(&self, username: &str) -> Result<Option<Account>, HiveError>;
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    method: &'a str,
    params: P,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

impl<T> RpcResponse<T> {
    fn into_result(self) -> Result<T, HiveError> {
        if let Some(error) = self.error {
            return Err(HiveError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        self.result.ok_or(HiveError::EmptyResponse)
    }
}

/// Client for the Hive JSON-RPC API with round-robin node failover
#[derive(Debug)]
pub struct HiveClient {
    client: Client,
    nodes: Vec<String>,
    current: AtomicUsize,
}

impl Default for HiveClient {
    fn default() -> Self {
        Self::new(DEFAULT_NODES.iter().map(|n| n.to_string()).collect())
    }
}

impl HiveClient {
    /// Creates a client for the given node URLs
    pub fn new(nodes: Vec<String>) -> Self {
        let client = match Client::builder().timeout(REQUEST_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => {
                warn!(
                    "Failed to build HTTP client with a {}s timeout, using defaults: {}",
                    REQUEST_TIMEOUT.as_secs(),
                    e
                );
                Client::new()
            }
        };
        Self::with_client(client, nodes)
    }

    /// Creates a client with a custom HTTP client
    pub fn with_client(client: Client, nodes: Vec<String>) -> Self {
        Self {
            client,
            nodes,
            current: AtomicUsize::new(0),
        }
    }

    /// Node the next call will be sent to
    pub fn current_node(&self) -> Option<&str> {
        if self.nodes.is_empty() {
            return None;
        }
        let index = self.current.load(Ordering::Relaxed) % self.nodes.len();
        Some(&self.nodes[index])
    }

    /// Moves on to the next node after a failure
    fn rotate(&self, failed: &str) {
        let index = self.current.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        if let Some(next) = self.nodes.get(index % self.nodes.len().max(1)) {
            warn!("Node {} failed, switching to {}", failed, next);
        }
    }

    /// Sends one JSON-RPC call to the current node
    async fn call<P, T>(&self, method: &str, params: P) -> Result<T, HiveError>
    where
        P: Serialize + Send,
        T: DeserializeOwned,
    {
        let node = self.current_node().ok_or(HiveError::NoNodes)?.to_string();
        debug!("Calling {} on {}", method, node);

        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let result = self.send(&node, &request).await;
        if result.is_err() {
            self.rotate(&node);
        }
        result
    }

    async fn send<P, T>(&self, node: &str, request: &RpcRequest<'_, P>) -> Result<T, HiveError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(node)
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        let envelope: RpcResponse<T> = response.json().await?;
        envelope.into_result()
    }
}

#[async_trait]
impl ContentSource for HiveClient {
    async fn get_discussions_by_created(
        &self,
        query: &PostQuery,
    ) -> Result<Vec<Discussion>, HiveError> {
        self.call("condenser_api.get_discussions_by_created", [query])
            .await
    }

    async fn get_content(
        &self,
        author: &str,
        permlink: &str,
    ) -> Result<Option<Discussion>, HiveError> {
        let post: Discussion = self
            .call("condenser_api.get_content", [author, permlink])
            .await?;
        Ok(post.exists().then_some(post))
    }

    async fn get_account(&self, username: &str) -> Result<Option<Account>, HiveError> {
        let accounts: Vec<Account> = self
            .call("condenser_api.get_accounts", [[username]])
            .await?;
        Ok(accounts.into_iter().next())
    }
}
