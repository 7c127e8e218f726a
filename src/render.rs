//! HTML rendering for posts, articles, and profiles
//!
//! Turns fetched Hive records into markup. Every value interpolated into the
//! page goes through `escape_html`; post bodies are rendered from Markdown
//! with raw HTML neutralised.

use log::{debug, warn};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use serde_json::Value;

use crate::data::{Account, Discussion, PostMetadata, Profile};

/// Shown on a post card when the post has no description
pub const NO_DESCRIPTION: &str = "No description available";

/// Shown on a profile when the account has no bio
pub const NO_ABOUT: &str = "This user has not written a bio yet.";

/// Escapes the characters that are significant in HTML text and attributes
pub fn escape_html(unsafe_str: &str) -> String {
    let mut escaped = String::with_capacity(unsafe_str.len());
    for c in unsafe_str.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '/' => escaped.push_str("&#x2F;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Encodes a value as a JavaScript string literal for an inline handler
///
/// The literal is HTML-escaped as well, since it sits inside an attribute.
fn js_string(value: &str) -> String {
    escape_html(&Value::String(value.to_string()).to_string())
}

/// Parses a JSON metadata string, logging and returning `None` if malformed
fn parse_json(raw: &str, what: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        debug!("Empty {}", what);
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Error parsing {}: {}", what, e);
            None
        }
    }
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: &Value, field: &str) -> Vec<String> {
    match value.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Parses a post's `json_metadata`
///
/// Malformed metadata yields an empty `PostMetadata`. Fields of the wrong
/// type are skipped individually, so one bad field does not hide the rest.
pub fn parse_metadata(json_metadata: &str) -> PostMetadata {
    let Some(value) = parse_json(json_metadata, "json_metadata") else {
        return PostMetadata::default();
    };
    PostMetadata {
        description: string_field(&value, "description"),
        tags: string_list(&value, "tags"),
        image: string_list(&value, "image"),
    }
}

/// Reads the profile section of an account's metadata
///
/// `posting_json_metadata` takes precedence; `json_metadata` is used when the
/// posting metadata has no profile.
pub fn parse_profile(account: &Account) -> Profile {
    [&account.posting_json_metadata, &account.json_metadata]
        .into_iter()
        .filter_map(|raw| parse_json(raw, "profile metadata"))
        .find_map(|value| value.get("profile").filter(|p| p.is_object()).cloned())
        .map(|profile| Profile {
            name: string_field(&profile, "name"),
            about: string_field(&profile, "about"),
            profile_image: string_field(&profile, "profile_image"),
            location: string_field(&profile, "location"),
            website: string_field(&profile, "website"),
        })
        .unwrap_or_default()
}

fn is_safe_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    !(lower.starts_with("javascript:") || lower.starts_with("vbscript:") || lower.starts_with("data:"))
}

/// Renders a Markdown post body to HTML
///
/// Single line breaks become `<br>`, raw HTML in the source is shown as
/// text, and links or images with script-capable URLs are disarmed.
pub fn render_markdown(body: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let events = Parser::new_ext(body, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::SoftBreak => Event::HardBreak,
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if !is_safe_url(&dest_url) => Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) if !is_safe_url(&dest_url) => Event::Start(Tag::Image {
            link_type,
            dest_url: CowStr::Borrowed(""),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

/// Wraps page content in a complete HTML document
fn page(title: &str, header: &str, main: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <link rel="stylesheet" type="text/css" href="/style.css">
</head>
<body>
  <header>
    <h1>{header}</h1>
    <nav>
      <a href="/">Home</a>
      <a href="/community.html">Community</a>
    </nav>
  </header>
  <main style="display: block">
{main}
  </main>
  <footer>
    <p>&copy; 2023 Hive Community</p>
  </footer>
</body>
</html>
"#,
        title = escape_html(title),
        header = escape_html(header),
        main = main,
    )
}

/// Renders a single post card
fn render_post_card(post: &Discussion) -> String {
    let metadata = parse_metadata(&post.json_metadata);
    let description = metadata.description.as_deref().unwrap_or(NO_DESCRIPTION);
    let author = escape_html(&post.author);
    let permlink = escape_html(&post.permlink);
    let vote_args = format!("{}, {}", js_string(&post.author), js_string(&post.permlink));

    let thumbnail = metadata
        .image
        .iter()
        .find(|url| is_safe_url(url))
        .map(|url| {
            format!(
                "\n  <img src=\"{}\" alt=\"\" class=\"post__thumbnail\">",
                escape_html(url)
            )
        })
        .unwrap_or_default();

    let tags = if metadata.tags.is_empty() {
        String::new()
    } else {
        let items: String = metadata
            .tags
            .iter()
            .map(|tag| format!("<li class=\"post__tag\">#{}</li>", escape_html(tag)))
            .collect();
        format!("\n  <ul class=\"post__tags\">{}</ul>", items)
    };

    format!(
        r#"<div class="post">{thumbnail}
  <h2 class="post__title">{title}</h2>
  <p class="post__description">{description}</p>{tags}
  <a href="/@{author}" class="post__author-link"><div class="post__author">{author}</div></a>
  <a href="/{category}/@{author}/{permlink}" class="post__read-more">Read more</a>
  <div class="post__button-flex">
    <div class="post__img-wrapper" onclick="upvoteWithKeychain({vote_args})">
      <img src="./assets/like.svg" alt="Like" class="post__button post__button--like">
    </div>
    <div class="post__img-wrapper" onclick="downvoteWithKeychain({vote_args})">
      <img src="./assets/dislike.svg" alt="Dislike" class="post__button post__button--dislike">
    </div>
  </div>
</div>"#,
        title = escape_html(&post.title),
        description = escape_html(description),
        author = author,
        category = escape_html(&post.category),
        permlink = permlink,
        vote_args = vote_args,
        thumbnail = thumbnail,
        tags = tags,
    )
}

/// Renders a list of posts as concatenated post cards
pub fn render_posts(posts: &[Discussion]) -> String {
    posts.iter().map(render_post_card).collect()
}

/// Renders the full article page for a post
pub fn render_post_page(post: &Discussion) -> String {
    let author = escape_html(&post.author);
    let main = format!(
        r#"    <div class="post-details">
      <a href="/@{author}"><span>{author}</span></a>
      <div>{body}</div>
    </div>"#,
        author = author,
        body = render_markdown(&post.body),
    );
    page(&post.title, &post.title, &main)
}

/// Renders a user's profile page with their recent posts
///
/// The display name falls back to the account name and the bio to
/// `NO_ABOUT`; the avatar is omitted when the profile has none.
pub fn render_profile_page(account: &Account, posts: &[Discussion]) -> String {
    let profile = parse_profile(account);
    let name = profile.name.as_deref().unwrap_or(&account.name);
    let about = profile.about.as_deref().unwrap_or(NO_ABOUT);

    let mut main = String::new();
    main.push_str("    <div class=\"profile\">\n");
    main.push_str(&format!("      <h2>{}</h2>\n", escape_html(name)));
    main.push_str(&format!("      <p>{}</p>\n", escape_html(about)));
    if let Some(image) = profile.profile_image.as_deref().filter(|url| is_safe_url(url)) {
        main.push_str(&format!(
            "      <img src=\"{}\" alt=\"{}'s profile image\">\n",
            escape_html(image),
            escape_html(name),
        ));
    }
    if let Some(location) = profile.location.as_deref() {
        main.push_str(&format!(
            "      <p class=\"profile__location\">{}</p>\n",
            escape_html(location)
        ));
    }
    if let Some(website) = profile.website.as_deref().filter(|url| is_safe_url(url)) {
        main.push_str(&format!(
            "      <a class=\"profile__website\" href=\"{url}\" rel=\"nofollow noopener\">{url}</a>\n",
            url = escape_html(website)
        ));
    }
    main.push_str("    </div>\n");

    if !posts.is_empty() {
        main.push_str("    <div class=\"profile__posts\">\n");
        main.push_str(&render_posts(posts));
        main.push_str("\n    </div>");
    }

    page(name, name, &main)
}
