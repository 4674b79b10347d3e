//! Arguments of the current-API client.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use paradigm_client::{FileFormat, InputFile, OutputType, RunOptions, DEFAULT_RUN_NAME};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "paradigm",
    version,
    about = "Submit a PARADIGM run to the web API, wait for it and download the results"
)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["path", "resume", "resume_file"])
))]
pub struct Cli {
    /// Username
    #[arg(short = 'u', long = "user")]
    pub user: String,

    /// API Key
    #[arg(short = 'a', long = "api")]
    pub api_key: String,

    /// Resume watching job UUID
    #[arg(short = 'r', long)]
    pub resume: Option<String>,

    /// Resume watching the job UUID stored in this file
    #[arg(long = "resume-file")]
    pub resume_file: Option<PathBuf>,

    /// Run Name
    #[arg(short = 'n', long, default_value = DEFAULT_RUN_NAME)]
    pub name: String,

    /// Submit, write the job UUID to this file and exit
    #[arg(long = "submit-only", conflicts_with_all = ["resume", "resume_file"])]
    pub submit_only: Option<PathBuf>,

    #[command(flatten)]
    pub files: FileArgs,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Files provided to the Paradigm Run.
#[derive(clap::Args, Debug, Clone)]
pub struct FileArgs {
    /// Pathway File
    #[arg(short = 'p', long = "path", help_heading = "Files")]
    pub path: Option<PathBuf>,

    /// mRNA matrix
    #[arg(short = 'e', long = "exp", help_heading = "Files")]
    pub exp: Option<PathBuf>,

    /// Copy number matrix
    #[arg(short = 'c', long = "cna", help_heading = "Files")]
    pub cna: Option<PathBuf>,

    /// Protein File
    #[arg(long = "prot", help_heading = "Files")]
    pub prot: Option<PathBuf>,

    /// Protein active file
    #[arg(long = "prota", help_heading = "Files")]
    pub prota: Option<PathBuf>,

    /// Params File
    #[arg(long = "param", help_heading = "Files")]
    pub param: Option<PathBuf>,

    /// Dogma File
    #[arg(long = "dogma", help_heading = "Files")]
    pub dogma: Option<PathBuf>,

    /// IMAP File
    #[arg(long = "imap", help_heading = "Files")]
    pub imap: Option<PathBuf>,
}

impl FileArgs {
    /// Inputs in upload order: path, exp, prot, cna, prota, param, dogma, imap.
    pub fn inputs(&self) -> Vec<InputFile> {
        [
            (&self.path, FileFormat::Pathway),
            (&self.exp, FileFormat::Expression),
            (&self.prot, FileFormat::Protein),
            (&self.cna, FileFormat::CopyNumber),
            (&self.prota, FileFormat::ProteinActive),
            (&self.param, FileFormat::Parameter),
            (&self.dogma, FileFormat::Dogma),
            (&self.imap, FileFormat::InteractionMap),
        ]
        .into_iter()
        .filter_map(|(path, format)| path.as_ref().map(|p| InputFile::new(p, format)))
        .collect()
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Number of null batches
    #[arg(long = "null-batches")]
    pub null_batches: Option<u32>,

    /// Skip EM
    #[arg(long = "skip-em")]
    pub skip_em: bool,

    /// Request all posteriors
    #[arg(long)]
    pub posterior: bool,

    /// Discretization lower bound
    #[arg(long = "disc-low", default_value_t = 0.3333)]
    pub disc_low: f64,

    /// Discretization upper bound
    #[arg(long = "disc-high", default_value_t = 0.6667)]
    pub disc_high: f64,

    /// Skip Link-Learning EM
    #[arg(long = "skip-link_em")]
    pub skip_link_em: bool,

    /// Skip Clustering
    #[arg(long = "skip-clustering")]
    pub skip_clustering: bool,
}

impl RunArgs {
    pub fn options(&self) -> RunOptions {
        RunOptions {
            null_batches: self.null_batches,
            skip_em: self.skip_em,
            skip_link_em: self.skip_link_em,
            posterior: self.posterior,
            skip_clustering: self.skip_clustering,
            disc_low: Some(self.disc_low),
            disc_high: Some(self.disc_high),
            disc: None,
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output filename
    #[arg(short = 'o', long = "out", default_value = "paradigm.out")]
    pub out: PathBuf,

    /// Output filename for Nulls
    #[arg(long = "out-nulls", default_value = "paradigm.nulls.out")]
    pub out_nulls: PathBuf,

    /// Output filename for Params
    #[arg(long = "out-params", default_value = "paradigm.params.out")]
    pub out_params: PathBuf,
}

impl OutputArgs {
    pub fn path_for(&self, output: OutputType) -> &PathBuf {
        match output {
            OutputType::Results => &self.out,
            OutputType::Nulls => &self.out_nulls,
            OutputType::Params => &self.out_params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_defaults() {
        let cli = Cli::try_parse_from(["paradigm", "-u", "alice", "-a", "key", "-p", "path.tab"])
            .expect("parse should succeed");

        assert_eq!(cli.name, DEFAULT_RUN_NAME);
        assert_eq!(cli.output.out, PathBuf::from("paradigm.out"));
        assert_eq!(cli.output.out_nulls, PathBuf::from("paradigm.nulls.out"));
        assert_eq!(cli.output.out_params, PathBuf::from("paradigm.params.out"));

        let options = cli.run.options();
        assert_eq!(options.disc_low, Some(0.3333));
        assert_eq!(options.disc_high, Some(0.6667));
        assert_eq!(options.null_batches, None);
        assert!(!options.skip_em);
    }

    #[test]
    fn inputs_follow_upload_order() {
        let cli = Cli::try_parse_from([
            "paradigm", "-u", "u", "-a", "k", "--imap", "i", "-c", "c", "-p", "p", "--prot",
            "pr", "-e", "e",
        ])
        .unwrap();

        let formats: Vec<FileFormat> = cli.files.inputs().iter().map(|i| i.format).collect();
        assert_eq!(
            formats,
            vec![
                FileFormat::Pathway,
                FileFormat::Expression,
                FileFormat::Protein,
                FileFormat::CopyNumber,
                FileFormat::InteractionMap,
            ]
        );
    }

    #[test]
    fn job_source_is_required() {
        assert!(Cli::try_parse_from(["paradigm", "-u", "u", "-a", "k"]).is_err());
    }

    #[test]
    fn job_sources_are_exclusive() {
        assert!(
            Cli::try_parse_from(["paradigm", "-u", "u", "-a", "k", "-p", "p", "-r", "job"])
                .is_err()
        );
        assert!(Cli::try_parse_from([
            "paradigm",
            "-u",
            "u",
            "-a",
            "k",
            "-r",
            "job",
            "--resume-file",
            "job.txt"
        ])
        .is_err());
    }

    #[test]
    fn submit_only_conflicts_with_resume() {
        assert!(Cli::try_parse_from([
            "paradigm",
            "-u",
            "u",
            "-a",
            "k",
            "-r",
            "job",
            "--submit-only",
            "job.txt"
        ])
        .is_err());
    }

    #[test]
    fn run_flags_map_to_options() {
        let cli = Cli::try_parse_from([
            "paradigm",
            "-u",
            "u",
            "-a",
            "k",
            "-p",
            "p",
            "--null-batches",
            "10",
            "--skip-link_em",
            "--skip-clustering",
            "--posterior",
        ])
        .unwrap();

        let options = cli.run.options();
        assert_eq!(options.null_batches, Some(10));
        assert!(options.skip_link_em);
        assert!(options.skip_clustering);
        assert!(options.posterior);
    }
}
