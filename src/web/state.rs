//! Shared application state for route handlers

use chrono::{DateTime, Utc};

use crate::data::ContentService;

/// State passed to every route handler
#[derive(Clone)]
pub struct AppState {
    /// Cached, retrying access to Hive content
    pub content: ContentService,
    /// Server startup time
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(content: ContentService) -> Self {
        Self {
            content,
            startup_time: Utc::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.startup_time).num_seconds().max(0) as u64
    }
}
