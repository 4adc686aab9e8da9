//! Error types for the Taskey adapter.

use thiserror::Error;

use crate::processor::OutputRecord;

/// Errors that can occur while processing a single record.
#[derive(Debug, Error)]
pub enum TaskeyError {
    /// Credentials are missing or unusable
    #[error("Credential resolution failed: {0}")]
    CredentialResolution(String),

    /// Operation outside `addLead`, `addPurchase`, `addTask`, `addMeeting`
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Base URL could not be built
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP request failed before a reply was received
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Taskey replied with a non-success status
    #[error("Taskey returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// A batch aborted because a record failed while continue-on-fail was off.
#[derive(Debug, Error)]
#[error("Record {item} failed: {source}")]
pub struct BatchError {
    /// Index of the failing record in the input batch.
    pub item: usize,
    /// The underlying failure.
    #[source]
    pub source: TaskeyError,
    /// Outputs of the records processed before the failure.
    pub outputs: Vec<OutputRecord>,
}
