//! The remote post source.
//!
//! Blog posts live in an external CMS; the site only ever asks it one
//! question, "list the published posts". The answer feeds `/blog/{slug}`
//! sitemap entries and the blog post pages. The source is injected as a
//! trait object so tests can substitute canned or failing implementations.
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::ContentError;

/// One published post, as returned by the content source.
///
/// Only `slug` is required; everything else is carried when the source
/// provides it and ignored otherwise.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PostSummary {
    pub slug: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl PostSummary {
    /// The site-relative URL path for this post.
    pub fn route_path(&self) -> String {
        format!("/blog/{}", self.slug)
    }
}

/// The single capability the site needs from the CMS.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<PostSummary>, ContentError>;
}

/// [`PostSource`] backed by an HTTP endpoint returning a JSON array of
/// posts.
pub struct HttpPostSource {
    api_url: String,
    client: reqwest::Client,
}

impl HttpPostSource {
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, ContentError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { api_url, client })
    }
}

#[async_trait]
impl PostSource for HttpPostSource {
    async fn list_posts(&self) -> Result<Vec<PostSummary>, ContentError> {
        let response = self.client.get(&self.api_url).send().await?;

        if !response.status().is_success() {
            return Err(ContentError::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}

/// Calls `list_posts` with an overall deadline, so a stalled content source
/// cannot hang the caller past the configured timeout.
pub async fn list_posts_with_timeout(
    source: &dyn PostSource,
    timeout_secs: u64,
) -> Result<Vec<PostSummary>, ContentError> {
    match tokio::time::timeout(Duration::from_secs(timeout_secs), source.list_posts()).await {
        Ok(result) => result,
        Err(_) => Err(ContentError::Timeout(timeout_secs)),
    }
}

#[cfg(test)]
pub mod test_support {
    //! Canned post sources shared by tests across the crate.
    use super::*;

    pub struct FixedPosts(pub Vec<PostSummary>);

    #[async_trait]
    impl PostSource for FixedPosts {
        async fn list_posts(&self) -> Result<Vec<PostSummary>, ContentError> {
            Ok(self.0.clone())
        }
    }

    pub struct BrokenSource;

    #[async_trait]
    impl PostSource for BrokenSource {
        async fn list_posts(&self) -> Result<Vec<PostSummary>, ContentError> {
            Err(ContentError::Status(500))
        }
    }

    pub struct StalledSource;

    #[async_trait]
    impl PostSource for StalledSource {
        async fn list_posts(&self) -> Result<Vec<PostSummary>, ContentError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(vec![])
        }
    }

    pub fn post(slug: &str) -> PostSummary {
        PostSummary {
            slug: slug.to_string(),
            title: None,
            updated_at: None,
            body: None,
        }
    }
}
