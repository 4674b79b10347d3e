use anyhow::Result;
use paradigm_client::{
    check_preconditions, parse_triples, submit_job, ApiFlavor, Credentials, FirstPoll, JobId,
    JobPoller, ParadigmClient, ParadigmError, PivotedMatrix, DEFAULT_RUN_NAME,
};
use tracing::info;

use super::shutdown_signal;
use crate::cli::args::LegacyCli;
use crate::exit_codes::SUCCESS;

pub async fn run(args: LegacyCli) -> Result<i32> {
    let credentials = Credentials::new(args.user.clone(), args.api_key.clone());
    check_preconditions(&credentials, &[])?;

    let client = ParadigmClient::from_env(ApiFlavor::Legacy)?;

    let job = match &args.resume {
        Some(id) => JobId::new(id.clone()),
        None => {
            if args.path.is_none() {
                return Err(ParadigmError::Precondition {
                    message: "Need to provide pathway file".to_string(),
                }
                .into());
            }
            let submission = submit_job(
                &client,
                &credentials,
                DEFAULT_RUN_NAME,
                &args.inputs(),
                args.options(),
            )
            .await?;
            println!("Running Job: {}", submission.job);
            submission.job
        }
    };

    let payload = JobPoller::new(&client, &credentials)
        .wait_for_completion(&job, FirstPoll::Immediate, shutdown_signal())
        .await?;

    let matrix = PivotedMatrix::from_triples(parse_triples(payload)?);
    matrix.write_tsv_file(&args.out)?;
    info!(
        probes = matrix.probes().count(),
        samples = matrix.samples().len(),
        out = %args.out.display(),
        "wrote result matrix"
    );

    Ok(SUCCESS)
}
