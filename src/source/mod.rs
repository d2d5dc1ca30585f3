pub mod file;
pub mod wordpress;

pub use file::FileSource;
pub use wordpress::WordPressSource;

use crate::error::FetchError;
use crate::models::RawReview;

/// Trait for review data sources
#[allow(async_fn_in_trait)]
pub trait ReviewSource {
    /// Fetch every available review for a plugin, in source order.
    ///
    /// `fresh` asks the source to bypass any cache between it and the catalog.
    async fn fetch_reviews(&self, slug: &str, fresh: bool) -> Result<Vec<RawReview>, FetchError>;
}

/// Wire envelope shared by the HTTP and file sources
#[derive(Debug, serde::Deserialize)]
pub(crate) struct CatalogResponse {
    #[serde(default)]
    pub reviews: Vec<RawReview>,
}
