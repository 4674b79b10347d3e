use anyhow::Result;
use paradigm_client::{
    check_preconditions, read_job_file, submit_job, write_job_file, ApiFlavor, Credentials,
    FirstPoll, JobId, JobPoller, OutputType, ParadigmClient,
};
use tracing::info;

use super::shutdown_signal;
use crate::cli::args::Cli;
use crate::exit_codes::SUCCESS;

/// Where the job to watch comes from.
enum JobSource {
    Fresh,
    Resume(JobId),
}

fn job_source(args: &Cli) -> Result<JobSource> {
    if let Some(id) = &args.resume {
        return Ok(JobSource::Resume(JobId::new(id.clone())));
    }
    if let Some(path) = &args.resume_file {
        return Ok(JobSource::Resume(read_job_file(path)?));
    }
    Ok(JobSource::Fresh)
}

pub async fn run(args: Cli) -> Result<i32> {
    let credentials = Credentials::new(args.user.clone(), args.api_key.clone());
    check_preconditions(&credentials, &[])?;

    let client = ParadigmClient::from_env(ApiFlavor::Current)?;

    let (job, first_poll) = match job_source(&args)? {
        JobSource::Resume(job) => {
            println!("Resuming Job: {}", job);
            (job, FirstPoll::Immediate)
        }
        JobSource::Fresh => {
            let inputs = args.files.inputs();
            let submission = submit_job(
                &client,
                &credentials,
                &args.name,
                &inputs,
                args.run.options(),
            )
            .await?;
            let job = submission.job;

            if let Some(path) = &args.submit_only {
                write_job_file(path, &job)?;
                println!("Running Job: {}", job);
                return Ok(SUCCESS);
            }
            println!("Running Job: {}", job);
            (job, FirstPoll::AfterDelay)
        }
    };

    JobPoller::new(&client, &credentials)
        .wait_for_completion(&job, first_poll, shutdown_signal())
        .await?;

    for output in OutputType::ALL {
        let dest = args.output.path_for(output);
        let bytes = client
            .download_artifact(&credentials, &job, output, dest)
            .await?;
        info!(output = output.as_str(), bytes, dest = %dest.display(), "saved");
    }

    Ok(SUCCESS)
}
