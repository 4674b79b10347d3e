//! Fixed-interval job poller.
//!
//! `PENDING -> DONE | FAILED`. There is no attempt limit and no backoff: the
//! server-side run may take many hours. The wait between polls is raced
//! against a caller-supplied cancel future.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use crate::client::ParadigmClient;
use crate::error::{ParadigmError, ParadigmResult};
use crate::types::{Credentials, JobId, JobStatus};

/// When the first status request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstPoll {
    /// Query right away (resume, legacy client).
    Immediate,
    /// Wait one delay first (fresh current-API submission).
    AfterDelay,
}

/// Polls one job until it reaches a terminal state.
#[derive(Debug)]
pub struct JobPoller<'a> {
    client: &'a ParadigmClient,
    credentials: &'a Credentials,
    delay: Duration,
}

impl<'a> JobPoller<'a> {
    pub fn new(client: &'a ParadigmClient, credentials: &'a Credentials) -> Self {
        Self {
            client,
            credentials,
            delay: Duration::from_secs(client.config().poll_delay_secs),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Poll until done and return the `result` payload.
    ///
    /// Failure states become errors: `error_message` surfaces as
    /// [`ParadigmError::Server`], `status: "Failed"` as
    /// [`ParadigmError::JobFailed`]. If `cancel` resolves while waiting,
    /// [`ParadigmError::Cancelled`] is returned.
    pub async fn wait_for_completion<C>(
        &self,
        job: &JobId,
        first: FirstPoll,
        cancel: C,
    ) -> ParadigmResult<serde_json::Value>
    where
        C: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let mut attempt: u64 = 0;

        if first == FirstPoll::AfterDelay {
            self.sleep(job, &mut cancel).await?;
        }

        loop {
            attempt += 1;
            match self.client.job_status(self.credentials, job).await? {
                JobStatus::Done(result) => {
                    info!(job = %job, attempt, "job finished");
                    return Ok(result);
                }
                JobStatus::Failed { message: Some(message) } => {
                    return Err(ParadigmError::Server { message });
                }
                JobStatus::Failed { message: None } => return Err(ParadigmError::JobFailed),
                JobStatus::Pending => {
                    debug!(job = %job, attempt, delay_secs = self.delay.as_secs(), "job pending");
                }
            }
            self.sleep(job, &mut cancel).await?;
        }
    }

    async fn sleep<C>(
        &self,
        job: &JobId,
        cancel: &mut std::pin::Pin<&mut C>,
    ) -> ParadigmResult<()>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            _ = cancel.as_mut() => Err(ParadigmError::Cancelled { job: job.to_string() }),
            _ = tokio::time::sleep(self.delay) => Ok(()),
        }
    }
}
