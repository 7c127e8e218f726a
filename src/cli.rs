//! Command-line interface parsing for Hivefront
//!
//! This module handles parsing of CLI arguments using clap. Every option can
//! also be set from a `HIVEFRONT_*` environment variable; the parsed
//! arguments are validated into a `ServerConfig`.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use crate::cache::DEFAULT_TTL_MS;
use crate::data::{FetchSettings, DEFAULT_NODES};
use crate::retry::{RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS};

/// Largest page size the Hive API accepts for discussion queries
const MAX_QUERY_LIMIT: u32 = 100;

/// Longest accepted cache TTL (30 days)
const MAX_CACHE_TTL_MS: u64 = 30 * 24 * 60 * 60 * 1000;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// Host and port do not form a valid socket address
    #[error("Invalid bind address '{0}'")]
    InvalidBindAddress(String),

    /// Retry count must allow at least one attempt
    #[error("Invalid retry count: {0}. At least 1 attempt is required")]
    InvalidRetries(u32),

    /// A post limit is outside what the API accepts
    #[error("Invalid {name}: {value}. Must be between 1 and 100")]
    InvalidLimit { name: &'static str, value: u32 },

    /// The community tag is empty
    #[error("Community tag must not be empty")]
    EmptyCommunity,

    /// Cache TTL is longer than 30 days
    #[error("Invalid cache TTL: {0} ms. Must be at most 30 days")]
    InvalidCacheTtl(u64),

    /// No API node was given
    #[error("At least one API node is required")]
    NoNodes,
}

/// Hivefront - Server-side rendering of Hive community posts and profiles
#[derive(Parser, Debug)]
#[command(name = "hivefront")]
#[command(about = "Serve Hive community posts, articles and profiles as HTML")]
#[command(version)]
pub struct Cli {
    /// IP address to listen on
    #[arg(long, env = "HIVEFRONT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "HIVEFRONT_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Hive API node URL; repeat to add fallbacks (defaults to public nodes)
    #[arg(long = "node", value_name = "URL", env = "HIVEFRONT_NODES", value_delimiter = ',')]
    pub nodes: Vec<String>,

    /// Community tag listed on /community/posts
    #[arg(long, env = "HIVEFRONT_COMMUNITY", default_value = "hive-167922")]
    pub community: String,

    /// Number of posts in the community feed
    #[arg(long, default_value_t = 2)]
    pub community_limit: u32,

    /// Number of posts listed on a profile
    #[arg(long, default_value_t = 5)]
    pub user_posts_limit: u32,

    /// How long fetched content stays cached, in milliseconds
    #[arg(long, env = "HIVEFRONT_CACHE_TTL_MS", default_value_t = DEFAULT_TTL_MS as u64)]
    pub cache_ttl_ms: u64,

    /// Attempts per upstream call, including the first
    #[arg(long, env = "HIVEFRONT_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    pub retries: u32,

    /// Wait between attempts, in milliseconds
    #[arg(long, env = "HIVEFRONT_RETRY_DELAY_MS", default_value_t = DEFAULT_RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,
}

/// Validated configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind
    pub bind: SocketAddr,
    /// API nodes in failover order
    pub nodes: Vec<String>,
    /// Cache TTL
    pub cache_ttl: chrono::Duration,
    /// Upstream fetch settings
    pub fetch: FetchSettings,
}

fn check_limit(name: &'static str, value: u32) -> Result<u32, CliError> {
    if (1..=MAX_QUERY_LIMIT).contains(&value) {
        Ok(value)
    } else {
        Err(CliError::InvalidLimit { name, value })
    }
}

impl ServerConfig {
    /// Creates a ServerConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(ServerConfig)` with defaults filled in
    /// * `Err(CliError)` if any value is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let addr = format!("{}:{}", cli.host, cli.port);
        let bind: SocketAddr = addr
            .parse()
            .map_err(|_| CliError::InvalidBindAddress(addr.clone()))?;

        if cli.cache_ttl_ms > MAX_CACHE_TTL_MS {
            return Err(CliError::InvalidCacheTtl(cli.cache_ttl_ms));
        }

        if cli.retries == 0 {
            return Err(CliError::InvalidRetries(cli.retries));
        }

        let community_tag = cli.community.trim().to_string();
        if community_tag.is_empty() {
            return Err(CliError::EmptyCommunity);
        }

        let nodes: Vec<String> = if cli.nodes.is_empty() {
            DEFAULT_NODES.iter().map(|n| n.to_string()).collect()
        } else {
            cli.nodes
                .iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect()
        };
        if nodes.is_empty() {
            return Err(CliError::NoNodes);
        }

        Ok(ServerConfig {
            bind,
            nodes,
            cache_ttl: chrono::Duration::milliseconds(cli.cache_ttl_ms as i64),
            fetch: FetchSettings {
                community_tag,
                community_limit: check_limit("community limit", cli.community_limit)?,
                user_posts_limit: check_limit("user posts limit", cli.user_posts_limit)?,
                retry: RetryPolicy::new(cli.retries, Duration::from_millis(cli.retry_delay_ms)),
            },
        })
    }
}
