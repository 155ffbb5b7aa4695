//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Invalid URL template: {0}")]
    InvalidTemplate(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed suggestion response: {0}")]
    MalformedResponse(String),

    #[error("Failed to start suggestion runtime: {0}")]
    Runtime(std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
