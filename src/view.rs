// src/view.rs
//! Presentation seam: every visible side effect of a session goes through `View`

use std::io::Write;

use crate::render::RenderedRow;
use crate::staging::PendingFile;
use crate::submission::SubmissionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Staging,
    Results,
}

pub trait View {
    /// Full repaint of the staged-file list.
    fn render_staged(&mut self, files: &[PendingFile]);

    /// Show the sections belonging to `state` and hide the others.
    fn show_state(&mut self, state: SubmissionState);

    fn render_results(&mut self, rows: &[RenderedRow]);

    fn focus(&mut self, region: Region);

    /// Blocking message, used for every refused or failed action.
    fn alert(&mut self, message: &str);

    fn notify(&mut self, message: &str);

    /// Empty the job-description input.
    fn clear_form(&mut self);
}

/// Paints a session as plain text.
pub struct TerminalView<W: Write> {
    out: W,
}

impl TerminalView<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Terminal output is best effort; a closed stdout is not a session error.
    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
    }
}

impl<W: Write> View for TerminalView<W> {
    fn render_staged(&mut self, files: &[PendingFile]) {
        if files.is_empty() {
            self.line("No files staged.");
            return;
        }

        self.line("Selected Files:");
        for (index, file) in files.iter().enumerate() {
            self.line(&format!(
                "  {:>2}. {} ({})",
                index + 1,
                file.name,
                file.display_size()
            ));
        }
    }

    fn show_state(&mut self, state: SubmissionState) {
        if state == SubmissionState::Submitting {
            self.line("Analyzing resumes...");
        }
    }

    fn render_results(&mut self, rows: &[RenderedRow]) {
        self.line(&format!(
            "{:<5} {:<8} {:<25} {:<25} {:>8} {:<7} {:<12} {}",
            "Rank", "Tier", "Name", "File", "Score", "Match", "Experience", "Skills"
        ));
        self.line(&"-".repeat(110));

        for row in rows {
            self.line(&format!(
                "{:<5} {:<8} {:<25} {:<25} {:>8} {:<7} {:<12} {}",
                row.rank,
                row.rank_tier.as_str(),
                row.name,
                row.filename,
                row.score_label,
                row.score_tier.as_str(),
                row.experience,
                row.skills.display()
            ));
        }
    }

    fn focus(&mut self, _region: Region) {
        let _ = self.out.flush();
    }

    fn alert(&mut self, message: &str) {
        self.line(&format!("! {}", message));
    }

    fn notify(&mut self, message: &str) {
        self.line(message);
    }

    fn clear_form(&mut self) {}
}

/// Everything a session asked its view to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Staged(Vec<String>),
    State(SubmissionState),
    Results(Vec<RenderedRow>),
    Focus(Region),
    Alert(String),
    Notice(String),
    FormCleared,
}

/// Headless view that records calls; drives sessions without a terminal.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Alert(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_results(&self) -> Option<&[RenderedRow]> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::Results(rows) => Some(rows.as_slice()),
            _ => None,
        })
    }

    pub fn states(&self) -> Vec<SubmissionState> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::State(state) => Some(*state),
                _ => None,
            })
            .collect()
    }
}

impl View for RecordingView {
    fn render_staged(&mut self, files: &[PendingFile]) {
        self.events
            .push(ViewEvent::Staged(files.iter().map(|f| f.name.clone()).collect()));
    }

    fn show_state(&mut self, state: SubmissionState) {
        self.events.push(ViewEvent::State(state));
    }

    fn render_results(&mut self, rows: &[RenderedRow]) {
        self.events.push(ViewEvent::Results(rows.to_vec()));
    }

    fn focus(&mut self, region: Region) {
        self.events.push(ViewEvent::Focus(region));
    }

    fn alert(&mut self, message: &str) {
        self.events.push(ViewEvent::Alert(message.to_string()));
    }

    fn notify(&mut self, message: &str) {
        self.events.push(ViewEvent::Notice(message.to_string()));
    }

    fn clear_form(&mut self) {
        self.events.push(ViewEvent::FormCleared);
    }
}
