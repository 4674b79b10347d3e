//! HTTP layer: request construction and response decoding.
//!
//! Every JSON body is decoded here, once, into a typed response. Callers in
//! client/mod.rs never see raw text.

use std::path::Path;

use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{ParadigmError, ParadigmResult};
use crate::types::{ApiFlavor, ClientConfig, Credentials};

/// HTTP backend (holds reqwest client and config).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) config: ClientConfig,
}

impl HttpBackend {
    /// Multipart upload. Credentials go in the query string for the current
    /// API and in the form body for the legacy one.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: &str,
        credentials: &Credentials,
        fields: &[(&'static str, String)],
        file_name: &str,
        content: Vec<u8>,
    ) -> ParadigmResult<T> {
        let mut form = Form::new();
        let mut request = self.client.post(url);

        match self.config.flavor {
            ApiFlavor::Current => {
                request = request.query(&credentials.query());
            }
            ApiFlavor::Legacy => {
                form = form
                    .text("username", credentials.username.clone())
                    .text("api_key", credentials.api_key.clone());
            }
        }
        for (key, value) in fields {
            form = form.text(*key, value.clone());
        }
        form = form.part("file", Part::bytes(content).file_name(file_name.to_string()));

        let response = request.multipart(form).send().await?;
        decode_json(response).await
    }

    /// URL-encoded form POST.
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&'static str, String)],
    ) -> ParadigmResult<T> {
        let response = self.client.post(url).form(form).send().await?;
        decode_json(response).await
    }

    /// GET with credentials in the query string, decoded as JSON.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> ParadigmResult<T> {
        let response = self
            .client
            .get(url)
            .query(&credentials.query())
            .send()
            .await?;
        decode_json(response).await
    }

    /// Stream a GET body into `dest`, flushing after every chunk.
    pub(crate) async fn download(
        &self,
        url: &str,
        credentials: &Credentials,
        dest: &Path,
    ) -> ParadigmResult<u64> {
        let response = self
            .client
            .get(url)
            .query(&credentials.query())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ParadigmError::InvalidResponse {
                status: status.as_u16(),
                body,
            });
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| ParadigmError::io(dest, e))?;

        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if chunk.is_empty() {
                continue;
            }
            file.write_all(&chunk)
                .await
                .map_err(|e| ParadigmError::io(dest, e))?;
            file.flush().await.map_err(|e| ParadigmError::io(dest, e))?;
            written += chunk.len() as u64;
        }

        debug!(url = %url, bytes = written, dest = %dest.display(), "download complete");
        Ok(written)
    }
}

/// Decode a JSON body; anything unparseable becomes `InvalidResponse` with
/// the raw body and status code.
async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> ParadigmResult<T> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|e| ParadigmError::Network {
        message: format!("failed to read response body: {}", e),
    })?;
    debug!(status, body = %body, "response");

    serde_json::from_str(&body).map_err(|_| ParadigmError::InvalidResponse { status, body })
}
