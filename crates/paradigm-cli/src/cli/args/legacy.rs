//! Arguments of the legacy-API client.
//!
//! The legacy client spells its long flags with a single dash (`-user`,
//! `-null_batches`). clap only knows `--long`, so argv is rewritten by
//! [`normalize_legacy_args`] before parsing.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use paradigm_client::{FileFormat, InputFile, RunOptions};

/// Long flags accepted with a single dash.
pub const LEGACY_FLAGS: &[&str] = &[
    "user",
    "api",
    "exp",
    "cna",
    "path",
    "null_batches",
    "skip_em",
    "disc",
    "out",
    "resume",
];

#[derive(Parser, Debug, Clone)]
#[command(
    name = "paradigm-legacy",
    version,
    about = "Run PARADIGM through the legacy web API and write the result matrix as TSV"
)]
pub struct LegacyCli {
    /// Username
    #[arg(long = "user")]
    pub user: String,

    /// API Key
    #[arg(long = "api")]
    pub api_key: String,

    /// mRNA matrix
    #[arg(long = "exp")]
    pub exp: Option<PathBuf>,

    /// Copy number matrix
    #[arg(long = "cna")]
    pub cna: Option<PathBuf>,

    /// Pathway File
    #[arg(long = "path", required_unless_present = "resume")]
    pub path: Option<PathBuf>,

    /// Null batches
    #[arg(long = "null_batches")]
    pub null_batches: Option<u32>,

    /// Skip EM
    #[arg(long = "skip_em")]
    pub skip_em: bool,

    /// Discretization
    #[arg(long = "disc", allow_hyphen_values = true)]
    pub disc: Option<String>,

    /// Output Path
    #[arg(long = "out", default_value = "paradigm.out")]
    pub out: PathBuf,

    /// Resume watching job UUID
    #[arg(long = "resume")]
    pub resume: Option<String>,
}

impl LegacyCli {
    /// Parse argv in the legacy single-dash style.
    pub fn try_parse_legacy<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_legacy_args(args))
    }

    /// Inputs in upload order: path, exp, cna.
    pub fn inputs(&self) -> Vec<InputFile> {
        [
            (&self.path, FileFormat::Pathway),
            (&self.exp, FileFormat::Expression),
            (&self.cna, FileFormat::CopyNumber),
        ]
        .into_iter()
        .filter_map(|(path, format)| path.as_ref().map(|p| InputFile::new(p, format)))
        .collect()
    }

    pub fn options(&self) -> RunOptions {
        RunOptions {
            null_batches: self.null_batches,
            skip_em: self.skip_em,
            disc: self.disc.clone(),
            ..Default::default()
        }
    }
}

/// Rewrite `-flag` / `-flag=value` to `--flag` for every known legacy flag.
/// Everything after a bare `--` is left alone.
pub fn normalize_legacy_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(n, _)| n);
                    if LEGACY_FLAGS.contains(&name) {
                        OsString::from(format!("-{}", text))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}
