// src/export.rs
//! Server-side CSV export of the current result set

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::core::service_client::ScreeningService;
use crate::types::{ExportRequest, ResultSet};
use crate::view::View;

pub const EXPORT_FILE_NAME: &str = "shortlisted_candidates.csv";

const GENERIC_EXPORT_ERROR: &str = "Error exporting results";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no results to export")]
    NothingToExport,
    #[error("export service returned status {status}")]
    Status { status: u16 },
    #[error("export request failed: {0}")]
    Transport(String),
    #[error("failed to save {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub fn user_message(&self) -> String {
        match self {
            ExportError::NothingToExport => "No results to export".to_string(),
            ExportError::Save { path, .. } => {
                format!("{} (could not write {})", GENERIC_EXPORT_ERROR, path.display())
            }
            _ => GENERIC_EXPORT_ERROR.to_string(),
        }
    }
}

/// Saves exported shortlists under a fixed name in one directory.
#[derive(Debug, Clone)]
pub struct ExportController {
    export_dir: PathBuf,
}

impl ExportController {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    pub fn destination(&self) -> PathBuf {
        self.export_dir.join(EXPORT_FILE_NAME)
    }

    /// Ask the export service for a CSV of `results` and save it.
    ///
    /// The full result set is sent, skills included. Nothing else changes
    /// on failure.
    pub async fn export_current_results<S, V>(
        &self,
        service: &S,
        results: &ResultSet,
        view: &mut V,
    ) -> Result<PathBuf, ExportError>
    where
        S: ScreeningService + ?Sized,
        V: View + ?Sized,
    {
        match self.try_export(service, results).await {
            Ok((path, rows)) => {
                view.notify(&format!(
                    "Exported {} candidate(s) to {}",
                    rows,
                    path.display()
                ));
                Ok(path)
            }
            Err(e) => {
                error!("Export failed: {}", e);
                view.alert(&e.user_message());
                Err(e)
            }
        }
    }

    async fn try_export<S>(
        &self,
        service: &S,
        results: &ResultSet,
    ) -> Result<(PathBuf, usize), ExportError>
    where
        S: ScreeningService + ?Sized,
    {
        if results.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        let request = ExportRequest {
            results: results.as_slice(),
        };
        let reply = service
            .export_results(&request)
            .await
            .map_err(|e| ExportError::Transport(e.to_string()))?;

        if !reply.is_success() {
            return Err(ExportError::Status {
                status: reply.status,
            });
        }

        let path = self.destination();
        save_atomically(&path, &reply.body).await?;

        let rows = count_csv_rows(&reply.body);
        info!("Saved export ({} row(s)) to {}", rows, path.display());
        Ok((path, rows))
    }
}

/// Write through a `.part` file renamed into place; the part file never outlives the call.
async fn save_atomically(path: &Path, content: &[u8]) -> Result<(), ExportError> {
    let part = path.with_extension("csv.part");
    let save_err = |source| ExportError::Save {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(save_err)?;
    }

    let written = match tokio::fs::write(&part, content).await {
        Ok(()) => tokio::fs::rename(&part, path).await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        if let Err(cleanup) = tokio::fs::remove_file(&part).await {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                warn!("Could not remove {}: {}", part.display(), cleanup);
            }
        }
        return Err(save_err(e));
    }

    Ok(())
}

/// Data rows in an exported CSV; the header row is not counted.
pub fn count_csv_rows(content: &[u8]) -> usize {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    reader.records().filter(|r| r.is_ok()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fake::FakeService;
    use crate::types::RankedResult;
    use crate::view::RecordingView;

    const CSV: &[u8] = b"Rank,Name,Filename,Match Score (%),Skills,Experience (Years)\n\
1,A,a.pdf,92,\"sql, python, rust, go, java, docker\",5\n";

    fn results() -> ResultSet {
        ResultSet::new(vec![RankedResult::new(1, "A", "a.pdf", 92.0)
            .with_skills(["sql", "python", "rust", "go", "java", "docker"])
            .with_experience(5.0)])
    }

    #[tokio::test]
    async fn test_export_saves_under_fixed_name() {
        let dir = tempfile::tempdir().unwrap();
        let service = FakeService::exporting(200, CSV);
        let controller = ExportController::new(dir.path());
        let mut view = RecordingView::new();

        let path = controller
            .export_current_results(&service, &results(), &mut view)
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("shortlisted_candidates.csv"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), CSV);
        assert!(!dir.path().join("shortlisted_candidates.csv.part").exists());
        assert!(view.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_export_sends_untruncated_results() {
        let dir = tempfile::tempdir().unwrap();
        let service = FakeService::exporting(200, CSV);
        let controller = ExportController::new(dir.path());

        controller
            .export_current_results(&service, &results(), &mut RecordingView::new())
            .await
            .unwrap();

        let sent = &service.exports()[0];
        assert_eq!(sent["results"][0]["skills"].as_array().unwrap().len(), 6);
        assert_eq!(sent["results"][0]["experience"], serde_json::json!(5));
    }

    #[tokio::test]
    async fn test_nothing_to_export() {
        let dir = tempfile::tempdir().unwrap();
        let service = FakeService::exporting(200, CSV);
        let mut view = RecordingView::new();

        let err = ExportController::new(dir.path())
            .export_current_results(&service, &ResultSet::default(), &mut view)
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::NothingToExport));
        assert!(service.exports().is_empty());
        assert_eq!(view.alerts(), vec!["No results to export"]);
    }

    #[tokio::test]
    async fn test_failed_export_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let controller = ExportController::new(dir.path());

        let mut view = RecordingView::new();
        let err = controller
            .export_current_results(&FakeService::exporting(500, b"{}"), &results(), &mut view)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Status { status: 500 }));

        let err = controller
            .export_current_results(&FakeService::unreachable(), &results(), &mut view)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Transport(_)));

        assert_eq!(
            view.alerts(),
            vec!["Error exporting results", "Error exporting results"]
        );
        assert!(!controller.destination().exists());
    }

    #[test]
    fn test_count_csv_rows() {
        assert_eq!(count_csv_rows(CSV), 1);
        assert_eq!(count_csv_rows(b"Rank,Name\n"), 0);
        assert_eq!(count_csv_rows(b""), 0);
    }
}
