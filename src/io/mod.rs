//! PDF input/output for docmerge.
//!
//! - [`PdfReader`] loads PDF documents and reports load details
//! - [`PdfWriter`] serializes documents to disk with optional compression

pub mod reader;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};
