//! Integration tests for the HTTP routes
//!
//! Drives the router in-process against an in-memory content source, so no
//! network access is needed.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use hivefront::cache::TtlCache;
use hivefront::data::{
    Account, ContentService, ContentSource, Discussion, FetchSettings, HiveError, Payload,
    PostQuery,
};
use hivefront::retry::RetryPolicy;
use hivefront::web::{create_router, AppState};

/// Fixed content with an optional "always down" switch
struct FakeHive {
    down: bool,
    calls: AtomicUsize,
}

impl FakeHive {
    fn up() -> Self {
        Self {
            down: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn down() -> Self {
        Self {
            down: true,
            calls: AtomicUsize::new(0),
        }
    }

    fn check(&self) -> Result<(), HiveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down {
            Err(HiveError::Rpc {
                code: -32000,
                message: "node unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

fn discussion(author: &str, permlink: &str, title: &str) -> Discussion {
    Discussion {
        author: author.to_string(),
        permlink: permlink.to_string(),
        category: "hive-167922".to_string(),
        title: title.to_string(),
        body: "Body with **markdown**".to_string(),
        json_metadata: r#"{"description":"A short summary"}"#.to_string(),
        created: "2024-03-01T12:00:00".to_string(),
    }
}

#[async_trait]
impl ContentSource for FakeHive {
    async fn get_discussions_by_created(
        &self,
        query: &PostQuery,
    ) -> Result<Vec<Discussion>, HiveError> {
        self.check()?;
        let posts = vec![
            discussion("bob", "p1", "First"),
            discussion("carol", "p2", "Second"),
            discussion("dave", "p3", "Third"),
        ];
        Ok(posts.into_iter().take(query.limit as usize).collect())
    }

    async fn get_content(
        &self,
        author: &str,
        permlink: &str,
    ) -> Result<Option<Discussion>, HiveError> {
        self.check()?;
        if author == "bob" && permlink == "p1" {
            Ok(Some(discussion("bob", "p1", "First")))
        } else {
            Ok(None)
        }
    }

    async fn get_account(&self, username: &str) -> Result<Option<Account>, HiveError> {
        self.check()?;
        if username == "alice" {
            Ok(Some(Account {
                name: "alice".to_string(),
                posting_json_metadata: r#"{"profile":{"name":"Alice A.","about":"Writes about Hive"}}"#
                    .to_string(),
                json_metadata: String::new(),
            }))
        } else {
            Ok(None)
        }
    }
}

fn app(source: Arc<FakeHive>) -> Router {
    app_with_cache(source, Arc::new(TtlCache::new()))
}

fn app_with_cache(source: Arc<FakeHive>, cache: Arc<TtlCache<Payload>>) -> Router {
    let settings = FetchSettings {
        retry: RetryPolicy::new(2, Duration::from_millis(1)),
        ..Default::default()
    };
    let content = ContentService::new(source, cache, settings);
    create_router(Arc::new(AppState::new(content)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_community_posts_renders_cards() {
    let app = app(Arc::new(FakeHive::up()));

    let (status, body) = get(&app, "/community/posts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("class=\"post\"").count(), 2, "Default limit is 2");
    assert!(body.contains("First"));
    assert!(body.contains("A short summary"));
    assert!(body.contains("href=\"/hive-167922/@bob/p1\""));
}

#[tokio::test]
async fn test_community_posts_served_from_cache() {
    let source = Arc::new(FakeHive::up());
    let app = app(source.clone());

    let (_, first) = get(&app, "/community/posts").await;
    let (_, second) = get(&app, "/community/posts").await;

    assert_eq!(first, second);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_upstream_failure_returns_500_after_retries() {
    let source = Arc::new(FakeHive::down());
    let app = app(source.clone());

    let (status, body) = get(&app, "/community/posts").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error fetching posts from Hive community");
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_post_page_renders_article() {
    let app = app(Arc::new(FakeHive::up()));

    let (status, body) = get(&app, "/hive-167922/@bob/p1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>First</title>"));
    assert!(body.contains("<strong>markdown</strong>"));
}

#[tokio::test]
async fn test_missing_post_returns_404() {
    let app = app(Arc::new(FakeHive::up()));

    let (status, body) = get(&app, "/hive-167922/@bob/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Post not found");
}

#[tokio::test]
async fn test_post_path_without_at_returns_404() {
    let source = Arc::new(FakeHive::up());
    let app = app(source.clone());

    let (status, _) = get(&app, "/hive-167922/bob/p1").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(source.calls.load(Ordering::SeqCst), 0, "No upstream call");
}

#[tokio::test]
async fn test_profile_page_renders_profile_and_posts() {
    let app = app(Arc::new(FakeHive::up()));

    let (status, body) = get(&app, "/@alice").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h2>Alice A.</h2>"));
    assert!(body.contains("Writes about Hive"));
    assert!(body.contains("class=\"profile__posts\""));
}

#[tokio::test]
async fn test_unknown_profile_returns_404() {
    let app = app(Arc::new(FakeHive::up()));

    let (status, body) = get(&app, "/@ghost").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "User profile not found");
}

#[tokio::test]
async fn test_unknown_profiles_skip_posts_and_cache_nothing() {
    let source = Arc::new(FakeHive::up());
    let cache: Arc<TtlCache<Payload>> = Arc::new(TtlCache::new());
    let app = app_with_cache(source.clone(), cache.clone());

    for name in ["ghost", "ghost2", "ghost3"] {
        let (status, _) = get(&app, &format!("/@{}", name)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    assert_eq!(source.calls.load(Ordering::SeqCst), 3, "Only the account lookups");
    assert_eq!(cache.len(), 0);
}

#[tokio::test]
async fn test_known_profile_caches_account_and_posts() {
    let source = Arc::new(FakeHive::up());
    let cache: Arc<TtlCache<Payload>> = Arc::new(TtlCache::new());
    let app = app_with_cache(source.clone(), cache.clone());

    let (status, _) = get(&app, "/@alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);

    let (status, _) = get(&app, "/@alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2, "Second visit is cached");
}

#[tokio::test]
async fn test_user_posts_fragment() {
    let app = app(Arc::new(FakeHive::up()));

    let (status, body) = get(&app, "/@alice/posts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("class=\"post\"").count(), 3);
}

#[tokio::test]
async fn test_health() {
    let app = app(Arc::new(FakeHive::up()));

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("ok"));
}
