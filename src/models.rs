use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review author as reported by the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    /// Display name ("nice name"), not the account username
    pub text: String,
    /// Profile URL; the username is its last path segment
    pub href: String,
}

/// A review record exactly as returned by the data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReview {
    pub rating: u8,
    /// Unix timestamp in seconds
    pub timestamp: i64,
    #[serde(rename = "username", default)]
    pub author: Author,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Email address or md5 hash identifying the avatar
    #[serde(default)]
    pub avatar: Option<String>,
}

impl RawReview {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Display-ready review flowing through the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedReview {
    pub rating: u8,
    pub timestamp: i64,
    pub username: String,
    pub output: String,
}

/// Result of one render request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Assembled markup with at least one review or link
    Reviews(String),
    /// Nothing survived the pipeline; carries the fallback message
    NoReviews(String),
    /// The data source failed; carries the fallback message
    FetchFailed(String),
}

impl RenderOutcome {
    /// The string to embed in the page
    pub fn into_markup(self) -> String {
        match self {
            Self::Reviews(s) | Self::NoReviews(s) | Self::FetchFailed(s) => s,
        }
    }

    pub fn as_markup(&self) -> &str {
        match self {
            Self::Reviews(s) | Self::NoReviews(s) | Self::FetchFailed(s) => s,
        }
    }
}
