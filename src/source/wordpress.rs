use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{CatalogResponse, ReviewSource};
use crate::config::SourceConfig;
use crate::error::FetchError;
use crate::models::RawReview;

/// HTTP client for the remote review catalog
pub struct WordPressSource {
    client: Client,
    base_url: Url,
}

impl WordPressSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            anyhow::bail!(
                "No review catalog configured: set source.base_url or pass --reviews-file"
            );
        }

        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid catalog base URL: {}", config.base_url))?;

        if base_url.cannot_be_a_base() {
            anyhow::bail!("Catalog base URL cannot have a path: {}", config.base_url);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Catalog URL for a plugin; the slug is percent-encoded as one segment
    pub fn reviews_url(&self, slug: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(slug);
        }
        url
    }
}

impl ReviewSource for WordPressSource {
    #[instrument(skip(self))]
    async fn fetch_reviews(&self, slug: &str, fresh: bool) -> Result<Vec<RawReview>, FetchError> {
        let url = self.reviews_url(slug);

        info!(url = %url, "Fetching plugin reviews");

        let mut request = self.client.get(url);
        if fresh {
            request = request.header(CACHE_CONTROL, "no-cache");
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Review catalog request failed");
            return Err(FetchError::Status {
                slug: slug.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: CatalogResponse = serde_json::from_str(&body)?;

        debug!(count = parsed.reviews.len(), "Fetched reviews");

        Ok(parsed.reviews)
    }
}
