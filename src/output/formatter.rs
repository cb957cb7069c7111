//! Status messages, merge plans and run summaries.
//!
//! Rendering of plan and summary lines is kept in plain functions returning
//! strings, so they can be checked without capturing stdout.

use std::io::{self, IsTerminal};

use crate::config::Config;
use crate::document::PlanEntry;
use crate::merge::MergeRequest;
use crate::utils::format_file_size;

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn decoration(self) -> (&'static str, &'static str) {
        match self {
            Self::Info => ("", ""),
            Self::Success => ("✓ ", "\x1b[32m"),
            Self::Warning => ("⚠ ", "\x1b[33m"),
            Self::Error => ("✗ ", "\x1b[31m"),
            Self::Debug => ("→ ", "\x1b[36m"),
        }
    }
}

/// Terminal output honouring quiet and verbose modes.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl OutputFormatter {
    /// Create a formatter.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: io::stdout().is_terminal() && std::env::var("TERM").is_ok(),
        }
    }

    /// Create a formatter from configuration. JSON mode is treated as quiet.
    pub fn from_config(config: &Config) -> Self {
        Self::new(!config.should_print(), config.verbose)
    }

    /// Formatter that prints only warnings and errors.
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Print a section header.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            if self.colored {
                println!("\x1b[1m{title}\x1b[0m");
            } else {
                println!("{title}");
            }
        }
    }

    /// Print a `label: value` line, indented under a section.
    pub fn detail(&self, label: &str, value: &str) {
        if !self.quiet {
            println!("  {label:<14} {value}");
        }
    }

    /// Print an empty line.
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// Print an informational message unless quiet.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print(MessageLevel::Info, message);
        }
    }

    /// Print a success message unless quiet.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print(MessageLevel::Success, message);
        }
    }

    /// Print a warning, even when quiet.
    pub fn warning(&self, message: &str) {
        self.print(MessageLevel::Warning, message);
    }

    /// Print an error to stderr.
    pub fn error(&self, message: &str) {
        let (prefix, color) = MessageLevel::Error.decoration();
        if self.colored {
            eprintln!("{color}{prefix}{message}\x1b[0m");
        } else {
            eprintln!("{prefix}{message}");
        }
    }

    /// Print a message only in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print(MessageLevel::Debug, message);
        }
    }

    fn print(&self, level: MessageLevel, message: &str) {
        let (prefix, color) = level.decoration();
        if self.colored && !color.is_empty() {
            println!("{color}{prefix}{message}\x1b[0m");
        } else {
            println!("{prefix}{message}");
        }
    }

    /// Print the expected layout of the merged output.
    pub fn plan(&self, entries: &[PlanEntry]) {
        if self.quiet {
            return;
        }

        println!("📋 Merge plan:");
        for entry in entries {
            println!("  {}", plan_line(entry));
        }
        let total: u32 = entries.iter().map(|e| e.pages).sum();
        println!("\n  Estimated pages in merged document: {total}");
    }

    /// Print the outcome of a finished run.
    pub fn summary(&self, request: &MergeRequest) {
        if request.success {
            if self.quiet {
                return;
            }
            self.success(&format!("Created {}", request.output.display()));
            for line in summary_lines(request) {
                println!("  {line}");
            }
        } else {
            self.error(request.error.as_deref().unwrap_or("merge failed"));
        }
    }

    /// True if verbose output is shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// True if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

/// One plan line, e.g. `2. report.docx (3 pages, pages 3-5)`.
pub fn plan_line(entry: &PlanEntry) -> String {
    let noun = if entry.pages == 1 { "page" } else { "pages" };
    let range = match entry.pages {
        0 => "no pages".to_string(),
        1 => format!("page {}", entry.first_page),
        _ => format!("pages {}-{}", entry.first_page, entry.last_page),
    };
    format!(
        "{}. {} ({} {noun}, {range})",
        entry.order, entry.file_name, entry.pages
    )
}

/// Detail lines describing a successful run.
pub fn summary_lines(request: &MergeRequest) -> Vec<String> {
    let Some(stats) = &request.statistics else {
        return Vec::new();
    };

    let mut lines = vec![
        format!(
            "Documents: {} ({} PDF, {} converted)",
            stats.documents, stats.copied, stats.converted
        ),
        format!("Pages: {}", stats.total_pages),
        format!("Size: {}", format_file_size(stats.output_size)),
        format!("Time: {:.2}s", stats.elapsed.as_secs_f64()),
    ];

    if stats.fallbacks > 0 {
        lines.push(format!(
            "Placeholders: {} Word document(s) could not be converted",
            stats.fallbacks
        ));
    }
    if stats.skipped > 0 {
        lines.push(format!("Skipped: {} document(s) without output", stats.skipped));
    }

    lines
}
