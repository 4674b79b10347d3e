//! Client for the PARADIGM pathway-analysis web API.
//!
//! The inference itself runs server-side. This crate covers the local half:
//!
//! - multipart upload of input files under generated unique names
//! - run submission with only the options the caller set
//! - fixed-interval status polling with a cancellable wait
//! - streaming download of result artifacts
//! - pivoting the legacy triple-list result into a probe x sample table
//!
//! # Quick Start
//!
//! ```no_run
//! use paradigm_client::{
//!     submit_job, ApiFlavor, Credentials, FileFormat, FirstPoll, InputFile, JobPoller,
//!     OutputType, ParadigmClient, RunOptions,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = ParadigmClient::from_env(ApiFlavor::Current)?;
//! let creds = Credentials::new("alice", "api-key");
//! let inputs = [InputFile::new("pathway.tab", FileFormat::Pathway)];
//!
//! let submission = submit_job(&client, &creds, "my run", &inputs, RunOptions::default()).await?;
//! JobPoller::new(&client, &creds)
//!     .wait_for_completion(&submission.job, FirstPoll::AfterDelay, std::future::pending())
//!     .await?;
//! client
//!     .download_artifact(&creds, &submission.job, OutputType::Results, "paradigm.out".as_ref())
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `PARADIGM_API_URL` | Service root (default: `https://dna.five3genomics.com/api/v1`) |
//! | `PARADIGM_POLL_DELAY` | Seconds between status polls (default: 600, legacy 30) |
//! | `PARADIGM_CONNECT_TIMEOUT` | Connect timeout in seconds (default: 30) |

pub mod client;
pub mod error;
pub mod pivot;
pub mod poll;
pub mod types;
pub mod workflow;

// Re-export main types
pub use client::ParadigmClient;
pub use error::{ParadigmError, ParadigmResult, JOB_FAILED_MESSAGE};
pub use pivot::{parse_triples, PivotedMatrix, Triple};
pub use poll::{FirstPoll, JobPoller};
pub use types::{
    ApiFlavor, ClientConfig, Credentials, FileFormat, InputFile, JobId, JobStatus, OutputType,
    RunOptions, RunRequest, UploadedFile, DEFAULT_BASE_URL, DEFAULT_RUN_NAME,
};
pub use workflow::{check_preconditions, read_job_file, submit_job, write_job_file, Submission};

/// User-Agent sent on every request.
pub const PARADIGM_USER_AGENT: &str = client::USER_AGENT_VALUE;
