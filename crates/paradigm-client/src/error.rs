//! Error types for the PARADIGM client.

use std::path::PathBuf;

/// Message shown when the server reports `status: "Failed"` for a run.
pub const JOB_FAILED_MESSAGE: &str =
    "Run failed, please contact support@five3genomics.com for more info.";

/// Process exit code for any fatal error.
pub const EXIT_FAILURE: i32 = 1;

/// Process exit code when the wait was interrupted (128 + SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

/// Client errors.
///
/// Every variant is fatal: nothing in this crate retries.
#[derive(Debug, thiserror::Error)]
pub enum ParadigmError {
    /// Local precondition failed before any request was sent.
    #[error("{message}")]
    Precondition { message: String },

    /// Response body was not the expected JSON document.
    #[error("Error Invalid response: {body}\n\tHTTPcode={status}")]
    InvalidResponse { status: u16, body: String },

    /// Upload endpoint answered with an `error_message`.
    #[error("Upload failed for file: {file}\n{message}")]
    UploadRejected { file: PathBuf, message: String },

    /// Run endpoint refused the run request.
    #[error("Run Request failed: {message}")]
    RunRejected { message: String },

    /// Status endpoint answered with an `error_message`.
    #[error("{message}")]
    Server { message: String },

    /// A finished run carried a result payload of the wrong shape.
    #[error("malformed result payload: {message}")]
    MalformedResult { message: String },

    /// The server marked the run as failed.
    #[error("{}", JOB_FAILED_MESSAGE)]
    JobFailed,

    /// Transport-level failure.
    #[error("network error: {message}")]
    Network { message: String },

    /// Local file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Waiting was interrupted by the caller.
    #[error("interrupted while waiting for job {job}")]
    Cancelled { job: String },
}

impl ParadigmError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cancelled { .. } => EXIT_INTERRUPTED,
            _ => EXIT_FAILURE,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for ParadigmError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for client operations.
pub type ParadigmResult<T> = Result<T, ParadigmError>;
