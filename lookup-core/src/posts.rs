//! Print the first few entries of the posts collection.

use std::io::Write;

use crate::{model::Post, provider::placeholder::PlaceholderClient};

/// Render up to `count` posts as `Title:`/`Body:` pairs separated by a blank
/// line. `count` is clamped to the number of posts available.
pub fn format_posts(posts: &[Post], count: usize) -> String {
    let count = count.min(posts.len());

    posts[..count]
        .iter()
        .map(|post| format!("Title: {}\nBody: {}", post.title, post.body))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fetch the collection and print the first `count` posts to `out`.
///
/// Failures are reported to `out` and yield an empty list; nothing is raised.
pub async fn show_posts(client: &PlaceholderClient, count: usize, out: &mut impl Write) -> Vec<Post> {
    let mut posts = match client.list_posts().await {
        Ok(posts) => posts,
        Err(err) => {
            err.report(out);
            return Vec::new();
        }
    };

    posts.truncate(count);

    let rendered = format_posts(&posts, count);
    if !rendered.is_empty() {
        let _ = writeln!(out, "{rendered}");
    }

    posts
}
