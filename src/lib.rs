//! docmerge - Merge PDF and Word documents into a single PDF.
//!
//! Inputs are collected into a [`DocumentList`](document::DocumentList), each
//! is turned into a temporary PDF (Word documents through a best-effort
//! converter that falls back to a placeholder page), the temporaries are
//! concatenated in list order and the result is stamped with `Page N` labels.
//!
//! # Examples
//!
//! ## Basic Merge
//!
//! ```no_run
//! use docmerge::document::DocumentList;
//! use docmerge::merge::{MergePipeline, MergeRequest, NoProgress};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut list = DocumentList::new();
//! list.add_all(["cover.pdf", "report.docx"])?;
//!
//! let request = MergeRequest::new(&list, "packet.pdf").with_start_number(1);
//! let finished = MergePipeline::new().run(request, &NoProgress);
//!
//! if let Some(stats) = &finished.statistics {
//!     println!("Created {} page document", stats.total_pages);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use docmerge::convert::FormatConverter;
//! use docmerge::count::PageCounter;
//! use docmerge::merge::PageNumberStamper;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let estimate = PageCounter::count(Path::new("report.docx"));
//! println!("report.docx has about {estimate} pages");
//!
//! let outcome = FormatConverter::new().convert(Path::new("report.docx"), Path::new("report.pdf"))?;
//! println!("placeholder: {}", outcome.is_fallback());
//!
//! PageNumberStamper::default().stamp_file(Path::new("report.pdf"), 1)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod convert;
pub mod count;
pub mod document;
pub mod error;
pub mod fonts;
pub mod io;
pub mod merge;
pub mod output;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use error::{DocMergeError, ErrorKind, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
