use std::collections::BTreeMap;

use tracing::warn;

/// Shown when the catalog cannot be reached. `{url}` is the reviews page.
pub const FETCH_ERROR: &str = "fetch_error";
/// Shown when no review survives the pipeline. `{url}` is the reviews page.
pub const NO_REVIEWS: &str = "no_reviews";
pub const LABEL_ALL_REVIEWS: &str = "label_all_reviews";
pub const LABEL_ADD_REVIEW: &str = "label_add_review";
/// Tooltip on the star rating. `{rating}` is the numeric score.
pub const RATING_TITLE: &str = "rating_title";

/// Keyed lookup of user-facing strings
#[derive(Debug, Clone)]
pub struct Catalog {
    messages: BTreeMap<String, String>,
}

impl Default for Catalog {
    fn default() -> Self {
        let messages = [
            (
                FETCH_ERROR,
                "An error occured. You can <a href=\"{url}\">check out all the reviews on WordPress.org</a>",
            ),
            (
                NO_REVIEWS,
                "No reviews found. If you think it's an error, check the reviews on {url}",
            ),
            (LABEL_ALL_REVIEWS, "See all reviews"),
            (LABEL_ADD_REVIEW, "Add a review"),
            (RATING_TITLE, "{rating} out of 5 stars"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self { messages }
    }
}

impl Catalog {
    /// Default catalog with the given entries replaced
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut catalog = Self::default();
        for (key, value) in overrides {
            if !catalog.messages.contains_key(key) {
                warn!(key = %key, "Ignoring unknown message key");
                continue;
            }
            catalog.messages.insert(key.clone(), value.clone());
        }
        catalog
    }

    /// Look up a message; unknown keys come back as the key itself
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.messages.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Look up a message and substitute `{name}` placeholders
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.get(key).to_string(), |msg, (name, value)| {
                msg.replace(&format!("{{{}}}", name), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lookup() {
        let catalog = Catalog::default();
        assert_eq!(catalog.get(LABEL_ALL_REVIEWS), "See all reviews");
        assert_eq!(catalog.get("missing"), "missing");
    }

    #[test]
    fn test_unknown_key_outlives_owned_key() {
        let catalog = Catalog::default();
        let key = String::from("no_such_key");
        let msg = catalog.get(&key).to_string();
        drop(key);
        assert_eq!(msg, "no_such_key");
    }

    #[test]
    fn test_format_placeholders() {
        let catalog = Catalog::default();
        let msg = catalog.format(NO_REVIEWS, &[("url", "https://example.org/r/")]);
        assert!(msg.ends_with("https://example.org/r/"));
    }

    #[test]
    fn test_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert(LABEL_ADD_REVIEW.to_string(), "Ajouter un avis".to_string());
        overrides.insert("bogus".to_string(), "x".to_string());

        let catalog = Catalog::with_overrides(&overrides);
        assert_eq!(catalog.get(LABEL_ADD_REVIEW), "Ajouter un avis");
        assert_eq!(catalog.get("bogus"), "bogus");
    }
}
