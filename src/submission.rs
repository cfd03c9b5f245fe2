// src/submission.rs
//! Submission lifecycle: Idle -> Submitting -> ShowingResults | Idle

use thiserror::Error;
use tracing::{error, info, warn};

use crate::core::service_client::{HttpReply, ScreeningService};
use crate::render;
use crate::staging::FileStaging;
use crate::types::{ResultSet, SubmitResponse};
use crate::view::{Region, View};

const GENERIC_SERVER_ERROR: &str = "Error processing resumes";
const GENERIC_TRANSPORT_ERROR: &str = "An error occurred while processing resumes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    ShowingResults,
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionState::Idle => write!(f, "idle"),
            SubmissionState::Submitting => write!(f, "submitting"),
            SubmissionState::ShowingResults => write!(f, "showing results"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("a submission is already in flight")]
    Busy,
    #[error("results are shown; reset the session before submitting again")]
    ResultsShown,
    #[error("no resumes staged")]
    EmptySelection,
    #[error("job description is empty")]
    EmptyJobDescription,
    #[error("scoring service reported failure: {message}")]
    Server { message: String },
    #[error("scoring service unreachable or replied with garbage: {detail}")]
    Transport { detail: String },
}

impl SubmissionError {
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Busy => "Resumes are already being processed".to_string(),
            SubmissionError::ResultsShown => {
                "Start a new search before submitting again".to_string()
            }
            SubmissionError::EmptySelection => "Please upload at least one resume".to_string(),
            SubmissionError::EmptyJobDescription => "Please enter a job description".to_string(),
            SubmissionError::Server { message } => message.clone(),
            SubmissionError::Transport { .. } => GENERIC_TRANSPORT_ERROR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedFile<'a> {
    pub name: &'a str,
    pub extension: &'a str,
    pub content: &'a [u8],
}

/// Request assembled at submit time; borrows from the staging area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSubmission<'a> {
    pub files: Vec<SubmittedFile<'a>>,
    pub job_description: &'a str,
}

impl<'a> JobSubmission<'a> {
    /// Checks the selection first, then the trimmed description.
    pub fn new(staging: &'a FileStaging, job_description_raw: &'a str) -> Result<Self, SubmissionError> {
        if staging.is_empty() {
            return Err(SubmissionError::EmptySelection);
        }

        let job_description = job_description_raw.trim();
        if job_description.is_empty() {
            return Err(SubmissionError::EmptyJobDescription);
        }

        let files = staging
            .contents()
            .map(|(meta, content)| SubmittedFile {
                name: &meta.name,
                extension: &meta.extension,
                content,
            })
            .collect();

        Ok(Self {
            files,
            job_description,
        })
    }
}

/// Decide what a scoring-service reply means.
///
/// Success needs a 2xx status and `success: true`; anything else carries the
/// service's `error` text when it sent one.
pub fn interpret_reply(reply: &HttpReply) -> Result<ResultSet, SubmissionError> {
    let parsed = serde_json::from_slice::<SubmitResponse>(&reply.body);

    match parsed {
        Ok(response) if reply.is_success() && response.success => {
            if let Some(total) = response.total_resumes {
                info!("Scoring service ranked {} resume(s)", total);
            }
            Ok(ResultSet::new(response.results.unwrap_or_default()))
        }
        Ok(response) => Err(SubmissionError::Server {
            message: response
                .error
                .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string()),
        }),
        Err(e) => Err(SubmissionError::Transport {
            detail: format!("status {}: unreadable body: {}", reply.status, e),
        }),
    }
}

// Puts the state back to Idle unless the round-trip got to finish.
struct InFlight<'a> {
    state: &'a mut SubmissionState,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn begin(state: &'a mut SubmissionState) -> Self {
        *state = SubmissionState::Submitting;
        Self {
            state,
            settled: false,
        }
    }

    fn settle(mut self, next: SubmissionState) {
        *self.state = next;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Submission dropped before completion");
            *self.state = SubmissionState::Idle;
        }
    }
}

/// Owns the current result set and the submit round-trip.
#[derive(Debug)]
pub struct SubmissionController {
    state: SubmissionState,
    results: ResultSet,
}

impl Default for SubmissionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionController {
    pub fn new() -> Self {
        Self {
            state: SubmissionState::Idle,
            results: ResultSet::default(),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Submit every staged file with the job description.
    ///
    /// Guard failures are reported through `view` and leave the state as it
    /// was; no request is sent. Failed round-trips revert to Idle.
    pub async fn submit<S, V>(
        &mut self,
        service: &S,
        staging: &FileStaging,
        job_description_raw: &str,
        view: &mut V,
    ) -> Result<&ResultSet, SubmissionError>
    where
        S: ScreeningService + ?Sized,
        V: View + ?Sized,
    {
        let submission = match self.check_ready(staging, job_description_raw) {
            Ok(submission) => submission,
            Err(e) => {
                warn!("Submission refused: {}", e);
                view.alert(&e.user_message());
                return Err(e);
            }
        };

        let in_flight = InFlight::begin(&mut self.state);
        info!("Submitting {} resume(s)", submission.files.len());
        view.show_state(SubmissionState::Submitting);

        let outcome = match service.submit_resumes(&submission).await {
            Ok(reply) => interpret_reply(&reply),
            Err(e) => Err(SubmissionError::Transport {
                detail: e.to_string(),
            }),
        };

        match outcome {
            Ok(results) => {
                in_flight.settle(SubmissionState::ShowingResults);
                self.results = results;
                info!("Received {} ranked candidate(s)", self.results.len());

                view.show_state(SubmissionState::ShowingResults);
                view.render_results(&render::render(&self.results));
                view.focus(Region::Results);
                Ok(&self.results)
            }
            Err(e) => {
                in_flight.settle(SubmissionState::Idle);
                error!("Submission failed: {}", e);

                view.alert(&e.user_message());
                view.show_state(SubmissionState::Idle);
                Err(e)
            }
        }
    }

    fn check_ready<'a>(
        &self,
        staging: &'a FileStaging,
        job_description_raw: &'a str,
    ) -> Result<JobSubmission<'a>, SubmissionError> {
        match self.state {
            SubmissionState::Idle => JobSubmission::new(staging, job_description_raw),
            SubmissionState::Submitting => Err(SubmissionError::Busy),
            SubmissionState::ShowingResults => Err(SubmissionError::ResultsShown),
        }
    }

    /// Drop the result set and return to Idle.
    pub fn reset(&mut self) -> Result<(), SubmissionError> {
        if self.state == SubmissionState::Submitting {
            return Err(SubmissionError::Busy);
        }
        self.results.clear();
        self.state = SubmissionState::Idle;
        Ok(())
    }
}
