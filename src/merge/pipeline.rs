//! The merge run.
//!
//! A run moves through `Converting`, `Assembling`, `Stamping` and `Cleanup`
//! and ends `Succeeded` or `Failed`. Each input becomes a temporary PDF in a
//! per-run scratch directory, the temporaries are assembled in list order,
//! the assembly is stamped with page numbers and written to the output path.
//! The scratch directory is removed whatever the outcome.
//!
//! # Examples
//!
//! ```no_run
//! use docmerge::document::DocumentList;
//! use docmerge::merge::{MergePipeline, MergeRequest, NoProgress};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut list = DocumentList::new();
//! list.add("cover.pdf")?;
//! list.add("report.docx")?;
//!
//! let request = MergeRequest::new(&list, "merged.pdf");
//! let finished = MergePipeline::new().run(request, &NoProgress);
//! assert!(finished.success, "{:?}", finished.error);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::convert::{ConversionOutcome, FormatConverter};
use crate::document::{DocumentDescriptor, DocumentKind, DocumentList};
use crate::error::{DocMergeError, ErrorKind, Result};
use crate::io::PdfWriter;
use crate::merge::assembler::PdfAssembler;
use crate::merge::progress::{PhaseSpan, ProgressSink, ProgressTracker};
use crate::merge::stamper::PageNumberStamper;

const SCRATCH_PREFIX: &str = "docmerge_";

/// Where a run is, or how it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MergePhase {
    /// Submitted but not picked up.
    #[default]
    NotStarted,
    /// Producing temporary PDFs.
    Converting,
    /// Concatenating the temporary PDFs.
    Assembling,
    /// Writing page labels.
    Stamping,
    /// Removing temporary files.
    Cleanup,
    /// Finished with an output file.
    Succeeded,
    /// Finished with an error.
    Failed,
}

/// Counters collected by a successful run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStatistics {
    /// Documents in the request.
    pub documents: usize,
    /// Word documents converted with content.
    pub converted: usize,
    /// PDFs copied through unchanged.
    pub copied: usize,
    /// Word documents replaced by a placeholder.
    pub fallbacks: usize,
    /// Documents that contributed no pages.
    pub skipped: usize,
    /// Pages in the output.
    pub total_pages: usize,
    /// Size of the output file in bytes.
    pub output_size: u64,
    /// Wall time of the run.
    pub elapsed: Duration,
}

/// One unit of merge work and, once run, its outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    documents: Vec<DocumentDescriptor>,

    /// Destination of the merged PDF.
    pub output: PathBuf,

    /// Stamp page labels after assembly.
    pub add_page_numbers: bool,

    /// Label of the first page.
    pub start_number: u32,

    /// Current or final phase.
    pub phase: MergePhase,

    /// Set when the run starts.
    pub started_at: Option<DateTime<Local>>,

    /// Set when the run ends, successfully or not.
    pub finished_at: Option<DateTime<Local>>,

    /// True only after a successful run.
    pub success: bool,

    /// Message of the error that failed the run.
    pub error: Option<String>,

    /// Classification of that error.
    pub error_kind: Option<ErrorKind>,

    /// Counters of a successful run.
    pub statistics: Option<MergeStatistics>,
}

impl MergeRequest {
    /// Request merging a snapshot of `list` into `output`.
    pub fn new(list: &DocumentList, output: impl Into<PathBuf>) -> Self {
        Self::from_documents(list.snapshot(), output)
    }

    /// Request merging `documents` in the given order.
    pub fn from_documents(documents: Vec<DocumentDescriptor>, output: impl Into<PathBuf>) -> Self {
        Self {
            documents,
            output: output.into(),
            add_page_numbers: true,
            start_number: 1,
            phase: MergePhase::NotStarted,
            started_at: None,
            finished_at: None,
            success: false,
            error: None,
            error_kind: None,
            statistics: None,
        }
    }

    /// Enable or disable page labels.
    pub fn with_page_numbers(mut self, enabled: bool) -> Self {
        self.add_page_numbers = enabled;
        self
    }

    /// Number the first page `start_number`.
    pub fn with_start_number(mut self, start_number: u32) -> Self {
        self.start_number = start_number;
        self
    }

    /// Documents in merge order.
    pub fn documents(&self) -> &[DocumentDescriptor] {
        &self.documents
    }

    /// Time between start and end, once both are known.
    pub fn duration(&self) -> Option<chrono::TimeDelta> {
        Some(self.finished_at? - self.started_at?)
    }

    /// True once the run has ended either way.
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, MergePhase::Succeeded | MergePhase::Failed)
    }

    fn fail(&mut self, err: &DocMergeError) {
        self.success = false;
        self.phase = MergePhase::Failed;
        self.error = Some(err.to_string());
        self.error_kind = Some(err.kind());
    }
}

/// How a temporary PDF came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOrigin {
    /// Byte copy of an input PDF.
    Copied,
    /// Converted from a Word document.
    Converted,
    /// Placeholder for a Word document that could not be read.
    Fallback,
    /// Nothing was written; the input kind is not supported.
    Unsupported,
}

/// A temporary single-document PDF.
#[derive(Debug, Clone)]
pub struct TemporaryArtifact {
    /// Index of the originating document in the request.
    pub index: usize,
    /// Location inside the scratch directory.
    pub path: PathBuf,
    /// How it was produced.
    pub origin: ArtifactOrigin,
}

/// Runs merge requests.
#[derive(Debug, Clone, Default)]
pub struct MergePipeline {
    converter: FormatConverter,
    assembler: PdfAssembler,
    stamper: PageNumberStamper,
    writer: PdfWriter,
    temp_root: Option<PathBuf>,
}

impl MergePipeline {
    /// Create a pipeline with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline honouring compression and temp root from `config`.
    pub fn from_config(config: &Config) -> Self {
        let writer = PdfWriter::with_compression(config.compression);
        let pipeline = Self {
            writer,
            ..Self::default()
        };

        match &config.temp_root {
            Some(root) => pipeline.with_temp_root(root),
            None => pipeline,
        }
    }

    /// Create scratch directories under `root` instead of the system temp dir.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    /// Run `request` to completion on the current thread.
    ///
    /// Never fails: the outcome is recorded on the returned request.
    pub fn run(&self, mut request: MergeRequest, progress: &dyn ProgressSink) -> MergeRequest {
        let started = Instant::now();
        request.started_at = Some(Local::now());
        request.success = false;
        request.error = None;
        request.error_kind = None;
        request.statistics = None;

        let mut tracker = ProgressTracker::new(progress);

        match self.execute(&mut request, &mut tracker) {
            Ok(mut stats) => {
                stats.elapsed = started.elapsed();
                log::info!(
                    "merged {} document(s) into {} ({} pages)",
                    stats.documents,
                    request.output.display(),
                    stats.total_pages
                );
                request.success = true;
                request.phase = MergePhase::Succeeded;
                request.statistics = Some(stats);
                tracker.finish();
            }
            Err(err) => {
                log::error!("merge into {} failed: {err}", request.output.display());
                request.fail(&err);
            }
        }

        request.finished_at = Some(Local::now());
        request
    }

    /// Run `request` on a blocking worker thread.
    ///
    /// A panic on the worker is reported as a failed request.
    pub async fn spawn(&self, request: MergeRequest, progress: Arc<dyn ProgressSink>) -> MergeRequest {
        let pipeline = self.clone();
        let mut fallback = request.clone();

        match tokio::task::spawn_blocking(move || pipeline.run(request, progress.as_ref())).await {
            Ok(finished) => finished,
            Err(join_err) => {
                fallback.started_at.get_or_insert_with(Local::now);
                fallback.fail(&DocMergeError::merge_failed(format!(
                    "merge worker stopped: {join_err}"
                )));
                fallback.finished_at = Some(Local::now());
                fallback
            }
        }
    }

    fn execute(
        &self,
        request: &mut MergeRequest,
        tracker: &mut ProgressTracker<'_>,
    ) -> Result<MergeStatistics> {
        if request.documents.is_empty() {
            return Err(DocMergeError::NoFilesToMerge);
        }

        let scratch = self.create_scratch_dir()?;
        let outcome = self.run_phases(request, scratch.path(), tracker);

        request.phase = MergePhase::Cleanup;
        Self::cleanup(scratch);

        outcome
    }

    fn run_phases(
        &self,
        request: &mut MergeRequest,
        scratch: &Path,
        tracker: &mut ProgressTracker<'_>,
    ) -> Result<MergeStatistics> {
        request.phase = MergePhase::Converting;
        let total = request.documents.len();
        let mut artifacts = Vec::with_capacity(total);

        for (index, document) in request.documents.iter().enumerate() {
            artifacts.push(self.produce_artifact(index, document, scratch)?);
            tracker.step(PhaseSpan::CONVERTING, index + 1, total);
        }

        request.phase = MergePhase::Assembling;
        let paths: Vec<&Path> = artifacts.iter().map(|a| a.path.as_path()).collect();
        let mut assembly = self
            .assembler
            .assemble_with_progress(&paths, |done, total| {
                tracker.step(PhaseSpan::ASSEMBLING, done, total)
            })?;

        if request.add_page_numbers {
            request.phase = MergePhase::Stamping;
            self.stamper.stamp_with_progress(
                &mut assembly.document,
                request.start_number,
                |done, total| tracker.step(PhaseSpan::STAMPING, done, total),
            )?;
        }

        let written = self.writer.write(&mut assembly.document, &request.output)?;
        log::debug!(
            "wrote {} in {:?}",
            written.format_file_size(),
            written.write_time
        );

        let count = |origin: ArtifactOrigin| artifacts.iter().filter(|a| a.origin == origin).count();
        Ok(MergeStatistics {
            documents: total,
            converted: count(ArtifactOrigin::Converted),
            copied: count(ArtifactOrigin::Copied),
            fallbacks: count(ArtifactOrigin::Fallback),
            skipped: assembly.skipped.len(),
            total_pages: assembly.page_count(),
            output_size: written.file_size,
            elapsed: Duration::ZERO,
        })
    }

    fn produce_artifact(
        &self,
        index: usize,
        document: &DocumentDescriptor,
        scratch: &Path,
    ) -> Result<TemporaryArtifact> {
        let path = scratch.join(format!("temp_{index}_{}.pdf", document.file_stem()));
        log::debug!(
            "[{}] {} -> {}",
            index + 1,
            document.path().display(),
            path.display()
        );

        let origin = match document.kind() {
            DocumentKind::Pdf => {
                std::fs::copy(document.path(), &path).map_err(|err| {
                    if err.kind() == std::io::ErrorKind::NotFound {
                        DocMergeError::file_not_found(document.path().to_path_buf())
                    } else {
                        DocMergeError::Io(err)
                    }
                })?;
                ArtifactOrigin::Copied
            }
            kind if kind.is_word() => match self.converter.convert(document.path(), &path)? {
                ConversionOutcome::Converted { .. } => ArtifactOrigin::Converted,
                ConversionOutcome::Fallback { .. } => ArtifactOrigin::Fallback,
            },
            _ => {
                log::warn!("not converting unsupported {}", document.path().display());
                ArtifactOrigin::Unsupported
            }
        };

        Ok(TemporaryArtifact {
            index,
            path,
            origin,
        })
    }

    fn create_scratch_dir(&self) -> Result<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);

        let created = match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };

        created.map_err(|source| DocMergeError::TempDir { source })
    }

    /// Delete every file in the scratch directory, then the directory.
    fn cleanup(scratch: tempfile::TempDir) {
        if let Ok(entries) = std::fs::read_dir(scratch.path()) {
            for entry in entries.flatten() {
                let path = entry.path();
                if let Err(err) = std::fs::remove_file(&path) {
                    log::warn!("cannot remove temporary file {}: {err}", path.display());
                }
            }
        }

        let dir = scratch.path().to_path_buf();
        if let Err(err) = scratch.close() {
            log::warn!("cannot remove temporary directory {}: {err}", dir.display());
        }
    }
}
