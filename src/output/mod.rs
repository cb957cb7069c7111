//! User-facing terminal output for the CLI.
//!
//! Library components log through the `log` facade; this module is what the
//! binary prints to the user: status lines, the dry-run plan, the progress
//! bar and the final summary.
//!
//! # Examples
//!
//! ```no_run
//! use docmerge::output::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Merging 3 documents...");
//! formatter.success("Created merged.pdf");
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter, plan_line, summary_lines};
pub use progress::ProgressBar;
