use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("portal rejected the supplied credentials")]
    Authentication,

    #[error("portal request {url} failed with status {status}")]
    Portal { url: String, status: StatusCode },

    #[error("no duty record for {title} on {date}")]
    NotFound { title: String, date: NaiveDate },

    #[error("malformed calendar: {0}")]
    MalformedDocument(String),

    #[error("portal request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
