use paradigm_cli::cli::args::LegacyCli;
use paradigm_cli::cli::commands::{finish, legacy, parse_or_exit};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    paradigm_cli::logging::init();
    let cli = parse_or_exit(LegacyCli::try_parse_legacy(std::env::args_os()));
    let code = finish(legacy::run(cli).await);
    std::process::exit(code);
}
