//! Client for the PARADIGM web API.
//!
//! Public API: typed requests in, typed results out. Body decoding lives in
//! http.rs.

use std::path::Path;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, info};

use crate::error::{ParadigmError, ParadigmResult};
use crate::types::{
    ApiFlavor, ClientConfig, Credentials, InputFile, JobId, JobStatus, OutputType, RunRequest,
    RunResponse, StatusResponse, UploadResponse, UploadedFile,
};

mod helpers;
mod http;

use helpers::{decode_status, generate_upload_name};
use http::HttpBackend;

pub(crate) const USER_AGENT_VALUE: &str = concat!("paradigm-client/", env!("CARGO_PKG_VERSION"));

/// Client for one PARADIGM service.
#[derive(Debug, Clone)]
pub struct ParadigmClient {
    http: HttpBackend,
}

impl ParadigmClient {
    pub fn new(config: ClientConfig) -> ParadigmResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| ParadigmError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http: HttpBackend { client, config },
        })
    }

    pub fn from_env(flavor: ApiFlavor) -> ParadigmResult<Self> {
        Self::new(ClientConfig::from_env(flavor))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.http.config
    }

    /// Upload one local file under a freshly generated unique name.
    pub async fn upload_file(
        &self,
        credentials: &Credentials,
        input: &InputFile,
    ) -> ParadigmResult<UploadedFile> {
        info!(file = %input.path.display(), format = %input.format, "uploading file");

        let content = tokio::fs::read(&input.path)
            .await
            .map_err(|e| ParadigmError::io(&input.path, e))?;
        let name = generate_upload_name();
        let fields = [
            ("file", name.clone()),
            ("format", input.format.as_str().to_string()),
        ];

        let url = self.http.config.upload_url();
        debug!(url = %url, name = %name, bytes = content.len(), "upload request");

        let meta: UploadResponse = self
            .http
            .post_multipart(&url, credentials, &fields, &name, content)
            .await?;

        if let Some(message) = meta.error_message {
            return Err(ParadigmError::UploadRejected {
                file: input.path.clone(),
                message,
            });
        }

        Ok(UploadedFile {
            name,
            format: input.format,
        })
    }

    /// Create the run and return the server-assigned job id.
    pub async fn submit_run(
        &self,
        credentials: &Credentials,
        request: &RunRequest,
    ) -> ParadigmResult<JobId> {
        let url = self.http.config.run_url();
        debug!(url = %url, files = request.files().len(), "submitting run");

        let meta: RunResponse = self.http.post_form(&url, &request.form(credentials)).await?;

        if let Some(message) = meta.error_message {
            return Err(ParadigmError::RunRejected { message });
        }

        let flavor = self.http.config.flavor;
        let handle = meta
            .handle(flavor)
            .ok_or_else(|| ParadigmError::InvalidResponse {
                status: 200,
                body: "run response carries no run uuid".to_string(),
            })?;

        let job = JobId::new(handle.uuid.clone());
        info!(job = %job, "run submitted");
        Ok(job)
    }

    /// Query the job once.
    pub async fn job_status(
        &self,
        credentials: &Credentials,
        job: &JobId,
    ) -> ParadigmResult<JobStatus> {
        let url = self.http.config.job_url(job);
        debug!(url = %url, "polling job status");

        let response: StatusResponse = self.http.get_json(&url, credentials).await?;
        Ok(decode_status(response))
    }

    /// Stream one result artifact of a finished job to `dest`.
    pub async fn download_artifact(
        &self,
        credentials: &Credentials,
        job: &JobId,
        output: OutputType,
        dest: &Path,
    ) -> ParadigmResult<u64> {
        let url = self.http.config.artifact_url(job, output);
        info!(job = %job, output = output.as_str(), dest = %dest.display(), "fetching result");
        self.http.download(&url, credentials, dest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileFormat, RunOptions};
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(mock_server: &MockServer, flavor: ApiFlavor) -> ParadigmClient {
        let config = ClientConfig::new(flavor).with_base_url(mock_server.uri());
        ParadigmClient::new(config).expect("failed to create client")
    }

    fn creds() -> Credentials {
        Credentials::new("alice", "secret")
    }

    #[tokio::test]
    async fn test_user_agent_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/paradigm/run/job-1/"))
            .and(header("user-agent", USER_AGENT_VALUE))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": null
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, ApiFlavor::Current);
        let status = client
            .job_status(&creds(), &JobId::new("job-1"))
            .await
            .unwrap();
        assert_eq!(status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn test_current_upload_sends_credentials_in_query() {
        let mock_server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pathway.tab");
        std::fs::write(&file, "protein\tTP53\n").unwrap();

        Mock::given(method("POST"))
            .and(path("/paradigm/file/"))
            .and(query_param("username", "alice"))
            .and(query_param("api_key", "secret"))
            .and(body_string_contains("protein\tTP53"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 1
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, ApiFlavor::Current);
        let uploaded = client
            .upload_file(&creds(), &InputFile::new(&file, FileFormat::Pathway))
            .await
            .unwrap();
        assert_eq!(uploaded.format, FileFormat::Pathway);
        assert_eq!(uploaded.name.len(), 36);
    }

    #[tokio::test]
    async fn test_legacy_upload_sends_credentials_in_form() {
        let mock_server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("exp.tab");
        std::fs::write(&file, "probe\ts1\n").unwrap();

        Mock::given(method("POST"))
            .and(path("/legacy_upload_file/"))
            .and(body_string_contains("name=\"api_key\"\r\n\r\nsecret"))
            .and(body_string_contains("name=\"format\"\r\n\r\nhe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, ApiFlavor::Legacy);
        client
            .upload_file(&creds(), &InputFile::new(&file, FileFormat::Expression))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upload_error_message() {
        let mock_server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pathway.tab");
        std::fs::write(&file, "x").unwrap();

        Mock::given(method("POST"))
            .and(path("/paradigm/file/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error_message": "Unknown format"
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, ApiFlavor::Current);
        let result = client
            .upload_file(&creds(), &InputFile::new(&file, FileFormat::Pathway))
            .await;

        match result {
            Err(ParadigmError::UploadRejected { file: f, message }) => {
                assert_eq!(f, file);
                assert_eq!(message, "Unknown format");
            }
            other => panic!("expected UploadRejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_non_json_body() {
        let mock_server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pathway.tab");
        std::fs::write(&file, "x").unwrap();

        Mock::given(method("POST"))
            .and(path("/paradigm/file/"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, ApiFlavor::Current);
        let result = client
            .upload_file(&creds(), &InputFile::new(&file, FileFormat::Pathway))
            .await;

        match result {
            Err(ParadigmError::InvalidResponse { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "<html>Bad Gateway</html>");
            }
            other => panic!("expected InvalidResponse, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_missing_local_file() {
        let mock_server = MockServer::start().await;
        let client = test_client(&mock_server, ApiFlavor::Current);

        let result = client
            .upload_file(
                &creds(),
                &InputFile::new("/nonexistent/pathway.tab", FileFormat::Pathway),
            )
            .await;

        assert!(matches!(result, Err(ParadigmError::Io { .. })));
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_run_current() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/paradigm/run/"))
            .and(body_string_contains("files=u-1&files=u-2"))
            .and(body_string_contains("null_batches=3"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "run": {"uuid": "job-42"}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = RunRequest::new(
            "test run",
            vec![
                UploadedFile {
                    name: "u-1".to_string(),
                    format: FileFormat::Pathway,
                },
                UploadedFile {
                    name: "u-2".to_string(),
                    format: FileFormat::Expression,
                },
            ],
            RunOptions {
                null_batches: Some(3),
                ..Default::default()
            },
        );

        let client = test_client(&mock_server, ApiFlavor::Current);
        let job = client.submit_run(&creds(), &request).await.unwrap();
        assert_eq!(job, JobId::new("job-42"));
    }

    #[tokio::test]
    async fn test_submit_run_wrong_flavor_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/paradigm_legacy_run/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "run": {"uuid": "job-42"}
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, ApiFlavor::Legacy);
        let request = RunRequest::new("x", vec![], RunOptions::default());
        let result = client.submit_run(&creds(), &request).await;
        assert!(matches!(result, Err(ParadigmError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn test_submit_run_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/paradigm/run/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error_message": "no pathway file"
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, ApiFlavor::Current);
        let request = RunRequest::new("x", vec![], RunOptions::default());
        let err = client.submit_run(&creds(), &request).await.unwrap_err();
        assert_eq!(err.to_string(), "Run Request failed: no pathway file");
    }

    #[tokio::test]
    async fn test_job_status_failed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/paradigm/run/job-1/"))
            .and(query_param("username", "alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "Failed",
                "result": null
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server, ApiFlavor::Current);
        let status = client
            .job_status(&creds(), &JobId::new("job-1"))
            .await
            .unwrap();
        assert_eq!(status, JobStatus::Failed { message: None });
    }

    #[tokio::test]
    async fn test_download_artifact_streams_body() {
        let mock_server = MockServer::start().await;
        let body = "id\tvalue\n".repeat(500);

        Mock::given(method("GET"))
            .and(path("/paradigm/run/job-1/results/"))
            .and(query_param("api_key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("paradigm.out");

        let client = test_client(&mock_server, ApiFlavor::Current);
        let written = client
            .download_artifact(&creds(), &JobId::new("job-1"), OutputType::Results, &dest)
            .await
            .unwrap();

        assert_eq!(written, body.len() as u64);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), body);
    }

    #[tokio::test]
    async fn test_download_artifact_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/paradigm/run/job-1/nulls/"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("paradigm.nulls.out");

        let client = test_client(&mock_server, ApiFlavor::Current);
        let result = client
            .download_artifact(&creds(), &JobId::new("job-1"), OutputType::Nulls, &dest)
            .await;

        assert!(matches!(
            result,
            Err(ParadigmError::InvalidResponse { status: 404, .. })
        ));
        assert!(!dest.exists());
    }
}
