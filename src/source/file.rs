use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{CatalogResponse, ReviewSource};
use crate::error::FetchError;
use crate::models::RawReview;

/// Reads reviews from a local JSON document in the catalog wire format.
///
/// A directory holds one `<slug>.json` per plugin; a plain file is returned
/// for any slug.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn document_path(&self, slug: &str) -> PathBuf {
        if self.path.is_dir() {
            self.path.join(format!("{}.json", slug))
        } else {
            self.path.clone()
        }
    }
}

impl ReviewSource for FileSource {
    async fn fetch_reviews(&self, slug: &str, _fresh: bool) -> Result<Vec<RawReview>, FetchError> {
        let path = self.document_path(slug);
        info!(path = %path.display(), slug, "Reading plugin reviews from file");

        let content = fs::read_to_string(&path)?;
        let parsed: CatalogResponse = serde_json::from_str(&content)?;

        debug!(count = parsed.reviews.len(), "Loaded reviews");

        Ok(parsed.reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DOC: &str = r#"{"reviews": [{"rating": 3, "timestamp": 5}]}"#;

    #[tokio::test]
    async fn test_single_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        fs::write(&path, DOC).unwrap();

        let reviews = FileSource::new(&path).fetch_reviews("anything", false).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].rating, 3);
    }

    #[tokio::test]
    async fn test_directory_per_slug() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("akismet.json"), DOC).unwrap();

        let src = FileSource::new(dir.path());
        assert_eq!(src.fetch_reviews("akismet", false).await.unwrap().len(), 1);

        let err = src.fetch_reviews("jetpack", false).await.unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }

    #[tokio::test]
    async fn test_invalid_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        fs::write(&path, "[").unwrap();

        let err = FileSource::new(&path).fetch_reviews("x", false).await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
