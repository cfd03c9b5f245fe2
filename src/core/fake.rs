// src/core/fake.rs
//! In-memory `ScreeningService` for controller tests

use async_trait::async_trait;
use std::sync::Mutex;

use super::service_client::{HttpReply, ScreeningService, TransportError};
use crate::submission::JobSubmission;
use crate::types::ExportRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    pub files: Vec<String>,
    pub job_description: String,
}

#[derive(Default)]
pub struct FakeService {
    submit_reply: Option<HttpReply>,
    export_reply: Option<HttpReply>,
    hang_on_submit: bool,
    submissions: Mutex<Vec<RecordedSubmission>>,
    exports: Mutex<Vec<serde_json::Value>>,
}

impl FakeService {
    /// Answers every submit with `status` and `body`; exports are unreachable.
    pub fn replying(status: u16, body: &str) -> Self {
        Self {
            submit_reply: Some(HttpReply::new(status, body)),
            ..Self::default()
        }
    }

    pub fn exporting(status: u16, body: &[u8]) -> Self {
        Self {
            export_reply: Some(HttpReply::new(status, body)),
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self::default()
    }

    /// Records submits but never answers them.
    pub fn hanging() -> Self {
        Self {
            hang_on_submit: true,
            ..Self::default()
        }
    }

    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn submit_calls(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn exports(&self) -> Vec<serde_json::Value> {
        self.exports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScreeningService for FakeService {
    async fn submit_resumes(
        &self,
        submission: &JobSubmission<'_>,
    ) -> Result<HttpReply, TransportError> {
        self.submissions.lock().unwrap().push(RecordedSubmission {
            files: submission.files.iter().map(|f| f.name.to_string()).collect(),
            job_description: submission.job_description.to_string(),
        });
        if self.hang_on_submit {
            std::future::pending::<()>().await;
        }
        self.submit_reply
            .clone()
            .ok_or_else(|| TransportError::new("fake://upload", "connection refused"))
    }

    async fn export_results(
        &self,
        request: &ExportRequest<'_>,
    ) -> Result<HttpReply, TransportError> {
        self.exports
            .lock()
            .unwrap()
            .push(serde_json::to_value(request).unwrap());
        self.export_reply
            .clone()
            .ok_or_else(|| TransportError::new("fake://export", "connection refused"))
    }
}
