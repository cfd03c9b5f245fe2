// src/core/service_client.rs
//! HTTP client for the scoring and export services

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::config::ClientConfig;
use crate::staging::content_type;
use crate::submission::JobSubmission;
use crate::types::ExportRequest;

pub const UPLOAD_ENDPOINT: &str = "/upload";
pub const EXPORT_ENDPOINT: &str = "/export";

const RESUMES_FIELD: &str = "resumes";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

/// The request never produced an HTTP response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("request to {url} failed: {message}")]
pub struct TransportError {
    pub url: String,
    pub message: String,
}

impl TransportError {
    pub fn new(url: impl Into<String>, message: impl ToString) -> Self {
        Self {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The remote side of a screening session.
///
/// Implementations only move bytes; interpreting replies is left to the
/// submission and export controllers.
#[async_trait]
pub trait ScreeningService: Send + Sync {
    async fn submit_resumes(
        &self,
        submission: &JobSubmission<'_>,
    ) -> std::result::Result<HttpReply, TransportError>;

    async fn export_results(
        &self,
        request: &ExportRequest<'_>,
    ) -> std::result::Result<HttpReply, TransportError>;
}

pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
    upload_endpoint: String,
    export_endpoint: String,
}

impl ServiceClient {
    /// Client with the default endpoints and no request timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::build(base_url, UPLOAD_ENDPOINT, EXPORT_ENDPOINT, None)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::build(
            &config.service_url,
            &config.upload_endpoint,
            &config.export_endpoint,
            config.timeout_seconds.map(Duration::from_secs),
        )
    }

    fn build(
        base_url: &str,
        upload_endpoint: &str,
        export_endpoint: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            upload_endpoint: upload_endpoint.to_string(),
            export_endpoint: export_endpoint.to_string(),
        })
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.base_url, self.upload_endpoint)
    }

    pub fn export_url(&self) -> String {
        format!("{}{}", self.base_url, self.export_endpoint)
    }

    fn build_form(&self, submission: &JobSubmission<'_>) -> std::result::Result<Form, TransportError> {
        let mut form = Form::new();
        for file in &submission.files {
            let part = Part::bytes(file.content.to_vec())
                .file_name(file.name.to_string())
                .mime_str(content_type(file.extension))
                .map_err(|e| TransportError::new(self.upload_url(), e))?;
            form = form.part(RESUMES_FIELD, part);
        }

        Ok(form.text(JOB_DESCRIPTION_FIELD, submission.job_description.to_string()))
    }

    async fn read_reply(
        &self,
        url: &str,
        response: reqwest::Response,
    ) -> std::result::Result<HttpReply, TransportError> {
        let status = response.status();
        trace!("Response status: {}", status);

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::new(url, e))?;
        debug!("Received {} byte(s) from {}", body.len(), url);

        Ok(HttpReply::new(status.as_u16(), body.to_vec()))
    }
}

#[async_trait]
impl ScreeningService for ServiceClient {
    async fn submit_resumes(
        &self,
        submission: &JobSubmission<'_>,
    ) -> std::result::Result<HttpReply, TransportError> {
        let url = self.upload_url();
        let form = self.build_form(submission)?;

        info!(
            "Calling scoring service: {} ({} resume(s))",
            url,
            submission.files.len()
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::new(url.as_str(), e))?;

        self.read_reply(&url, response).await
    }

    async fn export_results(
        &self,
        request: &ExportRequest<'_>,
    ) -> std::result::Result<HttpReply, TransportError> {
        let url = self.export_url();

        info!(
            "Calling export service: {} ({} result(s))",
            url,
            request.results.len()
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::new(url.as_str(), e))?;

        self.read_reply(&url, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_without_double_slash() {
        let client = ServiceClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.upload_url(), "http://localhost:5000/upload");
        assert_eq!(client.export_url(), "http://localhost:5000/export");
    }

    #[test]
    fn test_reply_success_range() {
        assert!(HttpReply::new(200, "").is_success());
        assert!(HttpReply::new(204, "").is_success());
        assert!(!HttpReply::new(400, "").is_success());
        assert!(!HttpReply::new(500, "").is_success());
    }
}
