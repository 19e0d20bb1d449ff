//! # sift-extract
//!
//! Per-category content extraction for the sift ingestion pipeline.
//!
//! [`ExtractionRegistry`] classifies an upload by extension, runs the adapter
//! for its category, and always returns a [`sift_core::ProcessedFile`]. Adapter
//! failures surface as banner text plus a structured
//! [`sift_core::ExtractionDiagnostic`], never as errors.
//!
//! ## Example
//!
//! ```ignore
//! use sift_core::UploadedFile;
//! use sift_extract::ExtractionRegistry;
//!
//! let registry = ExtractionRegistry::new();
//! let file = UploadedFile::from_path("report.pdf")?;
//! let processed = registry.extract(&file).await;
//! println!("{} -> {}", processed.name, processed.diagnostic);
//! ```

pub mod adapters;
pub mod banner;
pub mod registry;

pub use adapters::{
    ArchiveAdapter, CodeAdapter, DocumentAdapter, ImageAdapter, MediaAdapter,
    PresentationAdapter, SpreadsheetAdapter, TextAdapter, UnknownAdapter,
};
pub use banner::LEGACY_DOC_MESSAGE;
pub use registry::ExtractionRegistry;
