// src/session.rs
//! One screening session: staged files, job description, results and the view

use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::core::service_client::ScreeningService;
use crate::export::{ExportController, ExportError};
use crate::staging::{FileStaging, PendingFile, RawFile, StagedBatch, StagingError};
use crate::submission::{SubmissionController, SubmissionError, SubmissionState};
use crate::types::ResultSet;
use crate::view::{Region, View};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Staging(#[from] StagingError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("files can only be staged before submitting (session is {0})")]
    StagingClosed(SubmissionState),
    #[error("cannot reset while a submission is in flight")]
    Busy,
}

pub struct Session<S, V> {
    service: S,
    view: V,
    staging: FileStaging,
    submission: SubmissionController,
    exporter: ExportController,
    job_description: String,
}

impl<S, V> Session<S, V>
where
    S: ScreeningService,
    V: View,
{
    pub fn new(service: S, view: V, config: &ClientConfig) -> Self {
        Self {
            service,
            view,
            staging: FileStaging::new(config.max_upload_bytes),
            submission: SubmissionController::new(),
            exporter: ExportController::new(config.export_dir.clone()),
            job_description: String::new(),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.submission.state()
    }

    pub fn staged(&self) -> Vec<PendingFile> {
        self.staging.list()
    }

    pub fn results(&self) -> &ResultSet {
        self.submission.results()
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Stage a batch of files and repaint the staged list.
    pub fn add_files(&mut self, files: Vec<RawFile>) -> Result<StagedBatch, SessionError> {
        self.ensure_staging_open()?;

        match self.staging.add(files) {
            Ok(batch) => {
                if !batch.rejected_size.is_empty() {
                    self.view.alert(&format!(
                        "Upload limit reached, not staged: {}",
                        batch.rejected_size.join(", ")
                    ));
                }
                self.view.render_staged(&self.staging.list());
                Ok(batch)
            }
            Err(e) => {
                self.view.alert(&e.user_message());
                Err(e.into())
            }
        }
    }

    /// Unstage the file at `index` (0-based) and repaint the staged list.
    pub fn remove_file(&mut self, index: usize) -> Result<PendingFile, SessionError> {
        self.ensure_staging_open()?;

        match self.staging.remove(index) {
            Ok(removed) => {
                self.view.render_staged(&self.staging.list());
                Ok(removed)
            }
            Err(e) => {
                self.view.alert(&e.user_message());
                Err(e.into())
            }
        }
    }

    pub fn set_job_description(&mut self, text: &str) {
        self.job_description = text.to_string();
    }

    pub async fn submit(&mut self) -> Result<&ResultSet, SessionError> {
        let results = self
            .submission
            .submit(
                &self.service,
                &self.staging,
                &self.job_description,
                &mut self.view,
            )
            .await?;
        Ok(results)
    }

    pub async fn export(&mut self) -> Result<PathBuf, SessionError> {
        let path = self
            .exporter
            .export_current_results(&self.service, self.submission.results(), &mut self.view)
            .await?;
        Ok(path)
    }

    /// Back to an empty, Idle session with the staging form in focus.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.submission.reset().is_err() {
            warn!("Reset refused while submitting");
            self.view.alert("Please wait for the current submission to finish");
            return Err(SessionError::Busy);
        }

        self.staging.clear();
        self.job_description.clear();

        self.view.clear_form();
        self.view.render_staged(&[]);
        self.view.show_state(SubmissionState::Idle);
        self.view.focus(Region::Staging);
        info!("Session reset");
        Ok(())
    }

    fn ensure_staging_open(&mut self) -> Result<(), SessionError> {
        let state = self.submission.state();
        if state == SubmissionState::Idle {
            return Ok(());
        }
        self.view
            .alert("Start a new search before changing the selected files");
        Err(SessionError::StagingClosed(state))
    }
}
