use paradigm_client::ParadigmError;

use crate::exit_codes::{FAILURE, SUCCESS};

pub mod current;
pub mod legacy;

/// Unwrap a parse result. Help and
/// version go to stdout with 0, argument errors to stderr with 1.
pub fn parse_or_exit<T>(parsed: Result<T, clap::Error>) -> T {
    match parsed {
        Ok(value) => value,
        Err(e) => {
            let code = if e.use_stderr() { FAILURE } else { SUCCESS };
            let _ = e.print();
            std::process::exit(code);
        }
    }
}

/// Report a command outcome and turn it into an exit code.
pub fn finish(result: anyhow::Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ParadigmError>()
        .map(ParadigmError::exit_code)
        .unwrap_or(FAILURE)
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
pub async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    eprintln!("\nInterrupted.");
}
