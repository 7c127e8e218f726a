//! Route handlers
//!
//! Handlers ask the content service for data and hand it to the renderer.
//! Hive URLs put an `@` in front of account names (`/@alice`,
//! `/hive-167922/@alice/my-post`); segments without it are not found.

use axum::{
    extract::{Path, Request, State},
    middleware::{self, Next},
    response::{Html, Response},
    routing::get,
    Router,
};
use log::{info, warn};
use std::sync::Arc;

use super::error::AppError;
use super::state::AppState;
use crate::render;

const POST_NOT_FOUND: &str = "Post not found";
const PROFILE_NOT_FOUND: &str = "User profile not found";

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // All dynamic first segments share one parameter name so the routes can coexist
    Router::new()
        .route("/health", get(health))
        .route("/community/posts", get(community_posts))
        .route("/:first", get(user_profile))
        .route("/:first/posts", get(user_posts))
        .route("/:first/:author/:permlink", get(post_page))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Logs every incoming request
async fn log_request(request: Request, next: Next) -> Response {
    info!("Incoming request: {} {}", request.method(), request.uri());
    next.run(request).await
}

/// Strips the leading `@` from an account segment
fn account_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('@').filter(|name| !name.is_empty())
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> String {
    format!("ok (up {}s)", state.uptime_seconds())
}

/// GET /community/posts
/// Post cards for the configured community
async fn community_posts(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let posts = state
        .content
        .community_posts()
        .await
        .map_err(|e| AppError::upstream("posts", e))?;
    Ok(Html(render::render_posts(&posts)))
}

/// GET /@{username}
/// Profile page with the user's recent posts
///
/// Posts are only fetched once the account is known to exist.
async fn user_profile(
    State(state): State<Arc<AppState>>,
    Path(first): Path<String>,
) -> Result<Html<String>, AppError> {
    let username = account_name(&first).ok_or(AppError::NotFound(PROFILE_NOT_FOUND))?;

    let account = state
        .content
        .user_profile(username)
        .await
        .map_err(|e| AppError::upstream("user profile", e))?
        .ok_or(AppError::NotFound(PROFILE_NOT_FOUND))?;

    // The profile is still useful without the post list
    let posts = state.content.user_posts(username).await.unwrap_or_else(|e| {
        warn!("Could not fetch posts for {}: {}", username, e);
        Vec::new()
    });

    Ok(Html(render::render_profile_page(&account, &posts)))
}

/// GET /@{username}/posts
/// Post cards for a user's recent posts
async fn user_posts(
    State(state): State<Arc<AppState>>,
    Path(first): Path<String>,
) -> Result<Html<String>, AppError> {
    let username = account_name(&first).ok_or(AppError::NotFound(PROFILE_NOT_FOUND))?;
    let posts = state
        .content
        .user_posts(username)
        .await
        .map_err(|e| AppError::upstream("user posts", e))?;
    Ok(Html(render::render_posts(&posts)))
}

/// GET /{category}/@{author}/{permlink}
/// Full article page
async fn post_page(
    State(state): State<Arc<AppState>>,
    Path((_category, author, permlink)): Path<(String, String, String)>,
) -> Result<Html<String>, AppError> {
    let author = account_name(&author).ok_or(AppError::NotFound(POST_NOT_FOUND))?;
    let post = state
        .content
        .post(author, &permlink)
        .await
        .map_err(|e| AppError::upstream("the individual post", e))?
        .ok_or(AppError::NotFound(POST_NOT_FOUND))?;
    Ok(Html(render::render_post_page(&post)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_name_requires_at_prefix() {
        assert_eq!(account_name("@alice"), Some("alice"));
        assert_eq!(account_name("alice"), None);
        assert_eq!(account_name("@"), None);
        assert_eq!(account_name(""), None);
    }
}
