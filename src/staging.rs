// src/staging.rs
//! Local staging of resume files before they are submitted for scoring

use anyhow::{Context, Result};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Extensions the scoring service can read.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "doc"];

/// Upload cap of the scoring service (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StagingError {
    #[error("no valid resume files in selection")]
    NoValidFiles,
    #[error("no staged file at position {index} (staged: {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl StagingError {
    pub fn user_message(&self) -> String {
        match self {
            StagingError::NoValidFiles => {
                "Please select valid resume files (PDF or DOCX)".to_string()
            }
            StagingError::IndexOutOfRange { index, len } => {
                format!("There is no file #{} to remove ({} staged)", index + 1, len)
            }
        }
    }
}

/// A file offered for staging, as picked by the user.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// Read a file from disk; the staged name is the path's file name.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid file name: {}", path.display()))?
            .to_string();

        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(Self { name, content })
    }
}

/// What the user sees for a staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub name: String,
    pub size_bytes: u64,
    pub extension: String,
}

impl PendingFile {
    /// Size as shown in the staged list, e.g. `12.50 KB`.
    pub fn display_size(&self) -> String {
        format!("{:.2} KB", self.size_bytes as f64 / 1024.0)
    }
}

#[derive(Debug, Clone)]
struct StagedFile {
    meta: PendingFile,
    content: Vec<u8>,
}

/// Outcome of one `add` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedBatch {
    pub accepted: usize,
    pub rejected_extension: Vec<String>,
    pub rejected_size: Vec<String>,
    pub staged_total: usize,
}

/// Lower-cased substring after the final `.`.
///
/// A name without a dot is its own extension, so a file called `pdf` passes
/// the allowlist.
pub fn file_extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_lowercase()
}

pub fn is_allowed(name: &str) -> bool {
    ALLOWED_EXTENSIONS.contains(&file_extension(name).as_str())
}

/// MIME type sent with each uploaded part.
pub fn content_type(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "doc" => "application/msword",
        _ => "application/octet-stream",
    }
}

/// Ordered, duplicate-tolerant list of files waiting to be submitted.
#[derive(Debug, Clone)]
pub struct FileStaging {
    files: Vec<StagedFile>,
    max_total_bytes: u64,
}

impl Default for FileStaging {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

impl FileStaging {
    pub fn new(max_total_bytes: u64) -> Self {
        Self {
            files: Vec::new(),
            max_total_bytes,
        }
    }

    /// Append every allowed file of the batch, in batch order.
    ///
    /// Fails with `NoValidFiles` (and stages nothing) when no file of the
    /// batch passes the extension allowlist.
    pub fn add(&mut self, candidates: Vec<RawFile>) -> Result<StagedBatch, StagingError> {
        let mut batch = StagedBatch::default();
        let (valid, invalid): (Vec<RawFile>, Vec<RawFile>) =
            candidates.into_iter().partition(|file| is_allowed(&file.name));

        for file in invalid {
            debug!("Dropping file with unsupported extension: {}", file.name);
            batch.rejected_extension.push(file.name);
        }

        if valid.is_empty() {
            warn!("No valid resume files in batch");
            return Err(StagingError::NoValidFiles);
        }

        let mut total = self.total_bytes();
        for file in valid {
            let size = file.content.len() as u64;
            if total + size > self.max_total_bytes {
                warn!(
                    "Rejecting {}: staged size would reach {} bytes (limit {})",
                    file.name,
                    total + size,
                    self.max_total_bytes
                );
                batch.rejected_size.push(file.name);
                continue;
            }

            total += size;
            let extension = file_extension(&file.name);
            self.files.push(StagedFile {
                meta: PendingFile {
                    name: file.name,
                    size_bytes: size,
                    extension,
                },
                content: file.content,
            });
            batch.accepted += 1;
        }

        batch.staged_total = self.files.len();
        info!(
            "Staged {} file(s), {} in total",
            batch.accepted, batch.staged_total
        );
        Ok(batch)
    }

    /// Remove the file at `index`; later files shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<PendingFile, StagingError> {
        if index >= self.files.len() {
            return Err(StagingError::IndexOutOfRange {
                index,
                len: self.files.len(),
            });
        }

        let removed = self.files.remove(index);
        info!("Unstaged {} ({} left)", removed.meta.name, self.files.len());
        Ok(removed.meta)
    }

    pub fn list(&self) -> Vec<PendingFile> {
        self.files.iter().map(|f| f.meta.clone()).collect()
    }

    /// Name and content of every staged file, in staged order.
    pub fn contents(&self) -> impl Iterator<Item = (&PendingFile, &[u8])> {
        self.files.iter().map(|f| (&f.meta, f.content.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.meta.size_bytes).sum()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str) -> RawFile {
        RawFile::new(name, name.as_bytes().to_vec())
    }

    fn names(staging: &FileStaging) -> Vec<String> {
        staging.list().into_iter().map(|f| f.name).collect()
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("cv.PDF"), "pdf");
        assert_eq!(file_extension("john.doe.docx"), "docx");
        assert_eq!(file_extension("noext"), "noext");
        assert_eq!(file_extension("archive."), "");
    }

    #[test]
    fn test_dotless_name_is_its_own_extension() {
        assert!(is_allowed("PDF"));
        assert!(is_allowed("docx"));
        assert!(!is_allowed("resume"));

        let mut staging = FileStaging::default();
        let batch = staging.add(vec![raw("pdf"), raw("resume")]).unwrap();
        assert_eq!(batch.accepted, 1);
        assert_eq!(batch.rejected_extension, vec!["resume".to_string()]);
        assert_eq!(staging.list()[0].extension, "pdf");
    }

    #[test]
    fn test_add_keeps_only_allowed_in_order() {
        let mut staging = FileStaging::default();
        staging
            .add(vec![raw("a.pdf"), raw("x.txt"), raw("b.DOCX")])
            .unwrap();
        let batch = staging
            .add(vec![raw("notes.md"), raw("c.doc"), raw("a.pdf")])
            .unwrap();

        assert_eq!(names(&staging), vec!["a.pdf", "b.DOCX", "c.doc", "a.pdf"]);
        assert_eq!(batch.accepted, 2);
        assert_eq!(batch.rejected_extension, vec!["notes.md"]);
        assert_eq!(batch.staged_total, 4);
        assert_eq!(staging.list()[1].extension, "docx");
    }

    #[test]
    fn test_add_all_invalid_is_reported_and_stages_nothing() {
        let mut staging = FileStaging::default();
        staging.add(vec![raw("keep.pdf")]).unwrap();

        let err = staging.add(vec![raw("x.txt"), raw("pdf")]).unwrap_err();
        assert_eq!(err, StagingError::NoValidFiles);
        assert_eq!(names(&staging), vec!["keep.pdf"]);

        assert_eq!(staging.add(Vec::new()), Err(StagingError::NoValidFiles));
    }

    #[test]
    fn test_remove_shifts_following_files() {
        let mut staging = FileStaging::default();
        staging
            .add(vec![raw("a.pdf"), raw("b.pdf"), raw("c.pdf"), raw("d.pdf")])
            .unwrap();

        let removed = staging.remove(1).unwrap();
        assert_eq!(removed.name, "b.pdf");
        assert_eq!(names(&staging), vec!["a.pdf", "c.pdf", "d.pdf"]);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut staging = FileStaging::default();
        staging.add(vec![raw("a.pdf"), raw("b.pdf")]).unwrap();

        assert_eq!(
            staging.remove(2),
            Err(StagingError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(names(&staging), vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn test_size_limit_rejects_individual_files() {
        let mut staging = FileStaging::new(10);
        let batch = staging
            .add(vec![
                RawFile::new("a.pdf", vec![0; 6]),
                RawFile::new("big.pdf", vec![0; 6]),
                RawFile::new("c.pdf", vec![0; 4]),
            ])
            .unwrap();

        assert_eq!(names(&staging), vec!["a.pdf", "c.pdf"]);
        assert_eq!(batch.rejected_size, vec!["big.pdf"]);
        assert_eq!(staging.total_bytes(), 10);
    }

    #[test]
    fn test_display_size() {
        let file = PendingFile {
            name: "a.pdf".to_string(),
            size_bytes: 12_800,
            extension: "pdf".to_string(),
        };
        assert_eq!(file.display_size(), "12.50 KB");
    }

    #[tokio::test]
    async fn test_raw_file_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        tokio::fs::write(&path, b"%PDF-1.4").await.unwrap();

        let file = RawFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "resume.pdf");
        assert_eq!(file.content, b"%PDF-1.4");

        assert!(RawFile::from_path(&dir.path().join("missing.pdf")).await.is_err());
    }
}
