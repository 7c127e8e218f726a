//! Cached, retrying access to Hive content
//!
//! `ContentService` is what route handlers talk to. Every operation follows
//! the same path: build a cache key, serve a valid cached payload if there is
//! one, otherwise fetch from the upstream source under the retry policy and
//! store the result. Records that do not exist are neither retried nor
//! cached.

use log::{debug, info};
use std::sync::Arc;

use super::{Account, ContentSource, Discussion, HiveError, Payload, PostQuery};
use crate::cache::{CacheKey, TtlCache};
use crate::retry::RetryPolicy;

/// Cache namespace for the community feed
pub const COMMUNITY_POSTS: &str = "community_posts";
/// Cache namespace for single posts
pub const POST: &str = "post";
/// Cache namespace for account records
pub const USER_PROFILE: &str = "user_profile";
/// Cache namespace for a user's recent posts
pub const USER_POSTS: &str = "user_posts";

/// Community whose feed is shown on `/community/posts`
pub const DEFAULT_COMMUNITY: &str = "hive-167922";

/// Tunables for upstream fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Community tag listed by `community_posts`
    pub community_tag: String,
    /// Number of posts in the community feed
    pub community_limit: u32,
    /// Number of posts listed for a user
    pub user_posts_limit: u32,
    /// Retry policy applied to every upstream call
    pub retry: RetryPolicy,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            community_tag: DEFAULT_COMMUNITY.to_string(),
            community_limit: 2,
            user_posts_limit: 5,
            retry: RetryPolicy::default(),
        }
    }
}

/// Fetches Hive content through the shared cache
#[derive(Clone)]
pub struct ContentService {
    source: Arc<dyn ContentSource>,
    cache: Arc<TtlCache<Payload>>,
    settings: FetchSettings,
}

impl ContentService {
    /// Creates a service over an upstream source and a shared cache
    pub fn new(
        source: Arc<dyn ContentSource>,
        cache: Arc<TtlCache<Payload>>,
        settings: FetchSettings,
    ) -> Self {
        Self {
            source,
            cache,
            settings,
        }
    }

    /// Returns the fetch settings in use
    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Returns the shared cache
    pub fn cache(&self) -> &Arc<TtlCache<Payload>> {
        &self.cache
    }

    /// Lists the configured community's most recent posts
    pub async fn community_posts(&self) -> Result<Vec<Discussion>, HiveError> {
        let query = PostQuery::new(
            self.settings.community_tag.as_str(),
            self.settings.community_limit,
        );
        let key = CacheKey::new(
            COMMUNITY_POSTS,
            [query.tag.clone(), query.limit.to_string()],
        );
        self.posts(key, query).await
    }

    /// Lists a user's most recent posts
    pub async fn user_posts(&self, username: &str) -> Result<Vec<Discussion>, HiveError> {
        let query = PostQuery::new(username, self.settings.user_posts_limit);
        let key = CacheKey::new(USER_POSTS, [username]);
        self.posts(key, query).await
    }

    /// Reads a single post, `None` if the author has no such permlink
    pub async fn post(
        &self,
        author: &str,
        permlink: &str,
    ) -> Result<Option<Discussion>, HiveError> {
        let key = CacheKey::new(POST, [author, permlink]);
        if let Some(Payload::Post(post)) = self.cache.get_valid(&key) {
            info!("Serving individual post from cache ({})", key);
            return Ok(Some(post));
        }

        info!("Fetching individual post {}/{}...", author, permlink);
        let source = &self.source;
        let post = self
            .settings
            .retry
            .run("get_content", move || source.get_content(author, permlink))
            .await?;

        if let Some(ref post) = post {
            self.cache.put(key, Payload::Post(post.clone()));
        } else {
            debug!("Post {}/{} not found; not caching", author, permlink);
        }
        Ok(post)
    }

    /// Reads an account, `None` if it does not exist
    pub async fn user_profile(&self, username: &str) -> Result<Option<Account>, HiveError> {
        let key = CacheKey::new(USER_PROFILE, [username]);
        if let Some(Payload::Account(account)) = self.cache.get_valid(&key) {
            info!("Serving profile from cache ({})", key);
            return Ok(Some(account));
        }

        info!("Fetching profile for {}...", username);
        let source = &self.source;
        let account = self
            .settings
            .retry
            .run("get_accounts", move || source.get_account(username))
            .await?;

        if let Some(ref account) = account {
            self.cache.put(key, Payload::Account(account.clone()));
        } else {
            debug!("Account {} not found; not caching", username);
        }
        Ok(account)
    }

    async fn posts(&self, key: CacheKey, query: PostQuery) -> Result<Vec<Discussion>, HiveError> {
        if let Some(Payload::Posts(posts)) = self.cache.get_valid(&key) {
            info!("Serving posts from cache ({})", key);
            return Ok(posts);
        }

        info!("Fetching posts for tag {}...", query.tag);
        let source = &self.source;
        let query = &query;
        let posts = self
            .settings
            .retry
            .run("get_discussions_by_created", move || {
                source.get_discussions_by_created(query)
            })
            .await?;

        info!("Fetched {} posts", posts.len());
        self.cache.put(key, Payload::Posts(posts.clone()));
        Ok(posts)
    }
}
