//! Configuration and wire types for the PARADIGM web API.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Default service root.
pub const DEFAULT_BASE_URL: &str = "https://dna.five3genomics.com/api/v1";

/// Run name used when the caller does not pick one.
pub const DEFAULT_RUN_NAME: &str = "Galaxy Paradigm Run";

/// Which generation of the web API to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFlavor {
    /// `paradigm/file` + `paradigm/run`, artifacts fetched separately.
    Current,
    /// `legacy_upload_file` + `paradigm_legacy_run`, triple-list result.
    Legacy,
}

impl ApiFlavor {
    /// Default delay between status polls.
    pub fn default_poll_delay_secs(self) -> u64 {
        match self {
            // please don't lower this unless you have a really good reason
            Self::Current => 600,
            Self::Legacy => 30,
        }
    }

    fn upload_path(self) -> &'static str {
        match self {
            Self::Current => "paradigm/file",
            Self::Legacy => "legacy_upload_file",
        }
    }

    fn run_path(self) -> &'static str {
        match self {
            Self::Current => "paradigm/run",
            Self::Legacy => "paradigm_legacy_run",
        }
    }
}

/// Client configuration, passed explicitly to every component.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root, e.g. `https://dna.five3genomics.com/api/v1`.
    pub base_url: String,

    /// API generation.
    pub flavor: ApiFlavor,

    /// Fixed delay between status polls, in seconds.
    pub poll_delay_secs: u64,

    /// TCP connect timeout, in seconds.
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    30
}

impl ClientConfig {
    pub fn new(flavor: ApiFlavor) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            flavor,
            poll_delay_secs: flavor.default_poll_delay_secs(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }

    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `PARADIGM_API_URL` | Service root |
    /// | `PARADIGM_POLL_DELAY` | Seconds between status polls |
    /// | `PARADIGM_CONNECT_TIMEOUT` | Connect timeout in seconds |
    pub fn from_env(flavor: ApiFlavor) -> Self {
        Self {
            base_url: std::env::var("PARADIGM_API_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            flavor,
            poll_delay_secs: std::env::var("PARADIGM_POLL_DELAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| flavor.default_poll_delay_secs()),
            connect_timeout_secs: std::env::var("PARADIGM_CONNECT_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_connect_timeout),
        }
    }

    /// Set the service root.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the poll delay.
    pub fn with_poll_delay(mut self, secs: u64) -> Self {
        self.poll_delay_secs = secs;
        self
    }

    fn root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn upload_url(&self) -> String {
        format!("{}/{}/", self.root(), self.flavor.upload_path())
    }

    pub fn run_url(&self) -> String {
        format!("{}/{}/", self.root(), self.flavor.run_path())
    }

    pub fn job_url(&self, job: &JobId) -> String {
        format!("{}{}/", self.run_url(), job)
    }

    pub fn artifact_url(&self, job: &JobId, output: OutputType) -> String {
        format!("{}{}/", self.job_url(job), output.as_str())
    }
}

/// Web API login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.api_key.is_empty()
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("username", self.username.as_str()),
            ("api_key", self.api_key.as_str()),
        ]
    }
}

/// Closed set of upload format labels understood by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Pathway,
    Expression,
    Protein,
    CopyNumber,
    ProteinActive,
    Parameter,
    Dogma,
    InteractionMap,
}

impl FileFormat {
    /// Wire label sent in the `format` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pathway => "path",
            Self::Expression => "he",
            Self::Protein => "hprot",
            Self::CopyNumber => "hcnv",
            Self::ProteinActive => "hprota",
            Self::Parameter => "param",
            Self::Dogma => "dogma",
            Self::InteractionMap => "imap",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A local file the caller wants uploaded.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub path: PathBuf,
    pub format: FileFormat,
}

impl InputFile {
    pub fn new(path: impl Into<PathBuf>, format: FileFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }
}

/// A file already accepted by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Generated unique name the server knows the file by.
    pub name: String,
    pub format: FileFormat,
}

/// Optional run parameters.
///
/// A parameter is sent only when it was set; the server applies its own
/// defaults to everything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    pub null_batches: Option<u32>,
    pub skip_em: bool,
    pub skip_link_em: bool,
    pub posterior: bool,
    pub skip_clustering: bool,
    pub disc_low: Option<f64>,
    pub disc_high: Option<f64>,
    /// Legacy discretization string, passed through verbatim.
    pub disc: Option<String>,
}

impl RunOptions {
    /// Form fields for the options that were set.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(low) = self.disc_low {
            fields.push(("disc_0", low.to_string()));
        }
        if let Some(high) = self.disc_high {
            fields.push(("disc_1", high.to_string()));
        }
        if self.posterior {
            fields.push(("config_top", "1".to_string()));
        }
        if let Some(n) = self.null_batches {
            fields.push(("null_batches", n.to_string()));
        }
        if self.skip_clustering {
            fields.push(("skip_clustering", "1".to_string()));
        }
        // skip_em subsumes link-learning EM
        if self.skip_em {
            fields.push(("skip_em", "1".to_string()));
        } else if self.skip_link_em {
            fields.push(("config_top_em", "1".to_string()));
        }
        if let Some(disc) = &self.disc {
            fields.push(("disc", disc.clone()));
        }
        fields
    }
}

/// A run-creation request. Built once, submitted once.
#[derive(Debug, Clone)]
pub struct RunRequest {
    name: String,
    files: Vec<UploadedFile>,
    options: RunOptions,
}

impl RunRequest {
    pub fn new(name: impl Into<String>, files: Vec<UploadedFile>, options: RunOptions) -> Self {
        Self {
            name: name.into(),
            files,
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Full form body, credentials first, one `files` entry per upload.
    pub fn form(&self, credentials: &Credentials) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("username", credentials.username.clone()),
            ("api_key", credentials.api_key.clone()),
            ("name", self.name.clone()),
        ];
        form.extend(self.files.iter().map(|f| ("files", f.name.clone())));
        form.extend(self.options.form_fields());
        form
    }
}

/// Server-issued job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named result artifact of a finished current-API run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    Results,
    Nulls,
    Params,
}

impl OutputType {
    /// Fetch order used by the CLI.
    pub const ALL: [OutputType; 3] = [Self::Results, Self::Nulls, Self::Params];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Results => "results",
            Self::Nulls => "nulls",
            Self::Params => "params",
        }
    }
}

/// Observed state of a job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    Pending,
    /// Finished; carries the `result` payload.
    Done(serde_json::Value),
    /// Terminal failure; `message` is the server's `error_message` if any.
    Failed { message: Option<String> },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Body of `GET <run-endpoint>/<uuid>/`.
///
/// Kept as a raw object: the state machine keys off which fields are
/// present, not their types.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StatusResponse {
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl StatusResponse {
    /// `error_message` as text, if the key is present at all.
    pub fn error_message(&self) -> Option<String> {
        self.fields.get("error_message").map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// True only for the string `"Failed"`.
    pub fn is_failed(&self) -> bool {
        self.fields.get("status").and_then(serde_json::Value::as_str) == Some("Failed")
    }

    pub fn result(&self) -> Option<&serde_json::Value> {
        self.fields.get("result")
    }
}

/// Body of a run-creation response (either flavor).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunResponse {
    #[serde(default)]
    pub error_message: Option<String>,

    #[serde(default)]
    pub run: Option<RunHandle>,

    #[serde(default)]
    pub paradigm_legacy_run: Option<RunHandle>,
}

impl RunResponse {
    pub fn handle(&self, flavor: ApiFlavor) -> Option<&RunHandle> {
        match flavor {
            ApiFlavor::Current => self.run.as_ref(),
            ApiFlavor::Legacy => self.paradigm_legacy_run.as_ref(),
        }
    }
}

/// The `{"uuid": ...}` object inside a run response.
#[derive(Debug, Clone, Deserialize)]
pub struct RunHandle {
    pub uuid: String,
}

/// Body of an upload response; only the error field matters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub error_message: Option<String>,
}
