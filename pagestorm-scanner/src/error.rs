use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Anchor matching '{selector}' on {page} has no '{attribute}' attribute")]
    MissingAttribute {
        selector: String,
        attribute: String,
        page: String,
    },
}

pub type Result<T> = std::result::Result<T, ScanError>;
