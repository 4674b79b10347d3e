//! Submission: upload every input in order, then create the run.

use tracing::info;

use crate::client::ParadigmClient;
use crate::error::{ParadigmError, ParadigmResult};
use crate::types::{Credentials, InputFile, JobId, RunOptions, RunRequest, UploadedFile};

/// Outcome of a submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub job: JobId,
    pub uploaded: Vec<UploadedFile>,
}

/// Reject missing credentials or unreadable inputs before touching the
/// network.
pub fn check_preconditions(credentials: &Credentials, inputs: &[InputFile]) -> ParadigmResult<()> {
    if !credentials.is_complete() {
        return Err(ParadigmError::Precondition {
            message: "Need Web API login/key".to_string(),
        });
    }
    for input in inputs {
        if !input.path.is_file() {
            return Err(ParadigmError::Precondition {
                message: format!("Input file not found: {}", input.path.display()),
            });
        }
    }
    Ok(())
}

/// Upload `inputs` one at a time in the given order and submit a run that
/// references them in the same order.
pub async fn submit_job(
    client: &ParadigmClient,
    credentials: &Credentials,
    name: &str,
    inputs: &[InputFile],
    options: RunOptions,
) -> ParadigmResult<Submission> {
    check_preconditions(credentials, inputs)?;

    let mut uploaded = Vec::with_capacity(inputs.len());
    for input in inputs {
        uploaded.push(client.upload_file(credentials, input).await?);
    }
    info!(count = uploaded.len(), "all files uploaded");

    let request = RunRequest::new(name, uploaded.clone(), options);
    let job = client.submit_run(credentials, &request).await?;

    Ok(Submission { job, uploaded })
}

/// Record a job id for a later `--resume-file`.
pub fn write_job_file(path: &std::path::Path, job: &JobId) -> ParadigmResult<()> {
    std::fs::write(path, job.as_str()).map_err(|e| ParadigmError::io(path, e))
}

/// Read the job id recorded by [`write_job_file`] (first line, trailing
/// whitespace removed).
pub fn read_job_file(path: &std::path::Path) -> ParadigmResult<JobId> {
    let text = std::fs::read_to_string(path).map_err(|e| ParadigmError::io(path, e))?;
    let id = text.lines().next().unwrap_or("").trim_end();
    if id.is_empty() {
        return Err(ParadigmError::Precondition {
            message: format!("No job id in {}", path.display()),
        });
    }
    Ok(JobId::new(id))
}
