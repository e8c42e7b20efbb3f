use reqwest::Client;
use url::Url;

use crate::{error::ApiError, model::Post, request::endpoint};

use super::fetch_body;

const POSTS_PATH: &str = "posts";

/// Client for the JSONPlaceholder fake REST API. No authentication.
#[derive(Debug, Clone)]
pub struct PlaceholderClient {
    base_url: Url,
    http: Client,
}

impl PlaceholderClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }

    pub fn posts_url(&self) -> Url {
        endpoint(&self.base_url, POSTS_PATH)
    }

    /// The whole posts collection, in server order.
    pub async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let body = fetch_body(&self.http, self.posts_url()).await?;
        let posts: Vec<Post> = serde_json::from_str(&body)?;

        tracing::debug!(count = posts.len(), "fetched posts");
        Ok(posts)
    }
}
