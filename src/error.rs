use thiserror::Error;

/// Failure while retrieving reviews from the remote catalog
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to review catalog failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Review catalog returned {status} for plugin '{slug}'")]
    Status { slug: String, status: u16 },

    #[error("Failed to parse review catalog response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read reviews file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while turning a review into markup
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}
