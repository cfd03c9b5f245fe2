//! Client for a resume-screening service.
//!
//! Resumes are staged locally ([`staging`]), submitted with a job description
//! to the scoring service ([`submission`]), shown as a ranked table
//! ([`render`], [`view`]) and optionally exported as CSV ([`export`]).
//! [`session::Session`] ties the pieces together for one user.

pub mod cli;
pub mod config;
pub mod core;
pub mod export;
pub mod render;
pub mod session;
pub mod staging;
pub mod submission;
pub mod types;
pub mod view;

pub use config::ClientConfig;
pub use crate::core::{HttpReply, ScreeningService, ServiceClient, TransportError};
pub use export::{ExportController, ExportError, EXPORT_FILE_NAME};
pub use render::{render, RankTier, RenderedRow, ScoreTier, SkillsCell};
pub use session::{Session, SessionError};
pub use staging::{FileStaging, PendingFile, RawFile, StagedBatch, StagingError};
pub use submission::{JobSubmission, SubmissionController, SubmissionError, SubmissionState};
pub use types::{RankedResult, ResultSet};
pub use view::{RecordingView, Region, TerminalView, View, ViewEvent};
