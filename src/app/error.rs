use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unusable summary document: {0}")]
    InvalidDocument(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Article not found: {0}")]
    ArticleNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl PortalError {
    /// Failures that mean the document itself could not be obtained.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            PortalError::Http(_) | PortalError::Json(_) | PortalError::InvalidDocument(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
