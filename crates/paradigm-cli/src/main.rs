use paradigm_cli::cli::args::Cli;
use paradigm_cli::cli::commands::{current, finish, parse_or_exit};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    paradigm_cli::logging::init();
    let cli = parse_or_exit(<Cli as clap::Parser>::try_parse());
    let code = finish(current::run(cli).await);
    std::process::exit(code);
}
