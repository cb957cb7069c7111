//! CLI argument parsing for docmerge.
//!
//! # Examples
//!
//! ```no_run
//! use docmerge::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! println!("Merging {} inputs", cli.inputs.len());
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{CompressionLevel, Config, OverwriteMode, SortOrder};
use crate::error::{DocMergeError, Result};
use crate::utils;

/// Merge PDF and Word documents into one page-numbered PDF.
///
/// Word documents are converted on a best-effort basis; a document that
/// cannot be converted is represented by a placeholder page instead of
/// failing the merge.
#[derive(Parser, Debug)]
#[command(name = "docmerge")]
#[command(version)]
#[command(about = "Merge PDF and Word documents into a single PDF", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input documents to merge (in order)
    ///
    /// Accepts .pdf, .docx and .doc files or glob patterns. Matches of a
    /// pattern are merged in sorted order.
    ///
    /// Examples:
    ///   docmerge cover.pdf report.docx -o packet.pdf
    ///   docmerge "chapters/*.docx" -o book.pdf
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE", default_value = "merged.pdf")]
    pub output: PathBuf,

    /// Read additional inputs from a file (one path per line)
    ///
    /// Lines starting with '#' and blank lines are ignored. Paths from the
    /// list are appended after direct inputs.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Do not stamp page numbers onto the merged document
    #[arg(long)]
    pub no_page_numbers: bool,

    /// Number printed on the first page
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub start_number: u32,

    /// Reorder inputs before merging: none, name or modified
    #[arg(long, value_name = "ORDER", default_value = "none")]
    pub sort: String,

    /// Dry run - show the merge plan without creating output
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the run result as JSON
    #[arg(long)]
    pub json: bool,

    /// Overwrite an existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Compression level for output PDF
    ///
    /// - none: No compression
    /// - standard: Deflate streams (default)
    /// - maximum: Drop unreferenced objects, then deflate
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Number of page-count probes run concurrently
    ///
    /// Default is number of CPU cores.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Directory under which the per-run scratch directory is created
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// Glob patterns and the input list are resolved here, so the resulting
    /// config names concrete files.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern matches nothing, the input list cannot
    /// be read, an option value is invalid or validation fails.
    pub fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;
        let sort = SortOrder::from_str(&self.sort)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            inputs: self.all_inputs()?,
            output: self.output.clone(),
            page_numbers: !self.no_page_numbers,
            start_number: self.start_number,
            sort,
            overwrite_mode,
            compression,
            dry_run: self.dry_run,
            quiet: self.quiet,
            verbose: self.verbose,
            json: self.json,
            jobs: self.jobs,
            temp_root: self.temp_dir.clone(),
        };

        config.validate()?;

        Ok(config)
    }

    /// Direct inputs followed by the input list, with patterns expanded.
    pub fn all_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut patterns = self.inputs.clone();

        if let Some(ref list) = self.input_list {
            patterns.extend(utils::read_input_list(list)?);
        }

        if patterns.is_empty() {
            return Err(DocMergeError::NoFilesToMerge);
        }

        utils::collect_paths_for_patterns(&patterns)
    }
}

impl TryFrom<&Cli> for Config {
    type Error = DocMergeError;

    fn try_from(cli: &Cli) -> Result<Self> {
        cli.to_config()
    }
}
