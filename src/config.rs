//! Configuration for a docmerge run.
//!
//! CLI arguments are turned into a validated [`Config`] that drives list
//! building, the merge pipeline and terminal output.

use anyhow::{Result, bail};
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;

use crate::DocMergeError;
use crate::document::DocumentKind;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Streams are written as produced.
    None,
    /// Streams are deflated.
    #[default]
    Standard,
    /// Unreferenced objects are pruned, then streams are deflated.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = DocMergeError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(DocMergeError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// How the document list is ordered before merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Keep the order the inputs were given in.
    #[default]
    AsGiven,
    /// By file name.
    Name,
    /// By modification time, oldest first.
    Modified,
}

impl FromStr for SortOrder {
    type Err = DocMergeError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" | "given" => Ok(Self::AsGiven),
            "name" => Ok(Self::Name),
            "modified" | "mtime" => Ok(Self::Modified),
            _ => Err(DocMergeError::invalid_config(format!(
                "Invalid sort order: {s}. Must be one of: none, name, modified"
            ))),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for a merge run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input documents in merge order.
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Stamp "Page N" labels on the merged output.
    pub page_numbers: bool,

    /// Label of the first output page.
    pub start_number: u32,

    /// Reordering applied to the inputs.
    pub sort: SortOrder,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Print the merge plan and stop.
    pub dry_run: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Print the run report as JSON.
    pub json: bool,

    /// Concurrent page-count probes (None = auto-detect).
    pub jobs: Option<usize>,

    /// Parent directory for per-run scratch directories.
    pub temp_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: PathBuf::from("merged.pdf"),
            page_numbers: true,
            start_number: 1,
            sort: SortOrder::default(),
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
            dry_run: false,
            quiet: false,
            verbose: false,
            json: false,
            jobs: None,
            temp_root: None,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count or start number is zero
    /// - The output path is also an input
    /// - An input has an unsupported extension
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        if self.start_number == 0 {
            bail!("Start number must be at least 1");
        }

        for input in &self.inputs {
            if input == &self.output {
                bail!(
                    "Output file cannot be the same as an input file: {}",
                    self.output.display()
                );
            }

            if !DocumentKind::from_path(input).is_supported() {
                bail!(DocMergeError::unsupported_document(input.clone()));
            }
        }

        Ok(())
    }

    /// Get the effective number of parallel probes.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check if status output should be displayed.
    ///
    /// Returns false in quiet or JSON mode, unless doing a dry run.
    pub fn should_print(&self) -> bool {
        (!self.quiet && !self.json) || self.dry_run
    }
}
