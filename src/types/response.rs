// src/types/response.rs
use serde::{Deserialize, Serialize};

use crate::types::candidate::RankedResult;

// ===== Scoring Service Payloads =====

/// Body returned by the upload endpoint, both on success and on failure.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Option<Vec<RankedResult>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub total_resumes: Option<u64>,
}

// ===== Export Service Payloads =====

#[derive(Debug, Serialize)]
pub struct ExportRequest<'a> {
    pub results: &'a [RankedResult],
}
