//! Core data models for Hivefront
//!
//! This module contains the Hive records fetched from the blockchain API
//! (posts and accounts), the query used to list posts, and the payload
//! type stored in the shared cache.

pub mod hive;
pub mod service;

pub use hive::{ContentSource, HiveClient, HiveError, DEFAULT_NODES};
pub use service::{ContentService, FetchSettings};

use serde::{Deserialize, Serialize};

/// A post (or comment) as returned by `condenser_api`
///
/// Only the fields the renderer needs are kept; anything else in the
/// response is ignored. Missing fields default to empty strings, which is
/// how the API itself reports a nonexistent post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Discussion {
    /// Account that wrote the post
    pub author: String,
    /// URL slug identifying the post under its author
    pub permlink: String,
    /// Community or top-level tag the post lives under
    pub category: String,
    /// Post title
    pub title: String,
    /// Markdown body
    pub body: String,
    /// Free-form JSON metadata, serialized as a string
    pub json_metadata: String,
    /// Creation timestamp (e.g., "2024-03-01T12:00:00")
    pub created: String,
}

impl Discussion {
    /// Whether the API returned an actual post rather than an empty stub
    pub fn exists(&self) -> bool {
        !self.author.is_empty()
    }
}

/// A Hive account record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    /// Account name (without the leading `@`)
    pub name: String,
    /// Profile metadata as written by posting-authority apps
    pub posting_json_metadata: String,
    /// Legacy profile metadata
    pub json_metadata: String,
}

/// Metadata embedded in a post's `json_metadata`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PostMetadata {
    /// Short summary shown on post cards
    pub description: Option<String>,
    /// Tags attached to the post
    pub tags: Vec<String>,
    /// Image URLs referenced by the post
    pub image: Vec<String>,
}

/// Profile section of an account's metadata
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Display name
    pub name: Option<String>,
    /// Bio text
    pub about: Option<String>,
    /// Avatar URL
    pub profile_image: Option<String>,
    /// Free-form location
    pub location: Option<String>,
    /// Personal website
    pub website: Option<String>,
}

/// Parameters for listing recent posts under a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostQuery {
    /// Tag, community name, or username to list posts for
    pub tag: String,
    /// Maximum number of posts to return
    pub limit: u32,
}

impl PostQuery {
    /// Creates a query for the newest `limit` posts under `tag`
    pub fn new(tag: impl Into<String>, limit: u32) -> Self {
        Self {
            tag: tag.into(),
            limit,
        }
    }
}

/// Any record stored in the shared response cache
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A list of posts (community feed or a user's posts)
    Posts(Vec<Discussion>),
    /// A single post
    Post(Discussion),
    /// An account record
    Account(Account),
}
