//! # sift-ingest
//!
//! Batch orchestration for the sift pipeline: configuration from the
//! environment, per-file processing, and hand-off to a [`sift_core::NoteSink`].
//!
//! ## Example
//!
//! ```ignore
//! use sift_core::UploadedFile;
//! use sift_ingest::{IngestConfig, Pipeline};
//! use sift_notes::InMemoryNoteStore;
//!
//! let pipeline = Pipeline::from_config(&IngestConfig::from_env()?);
//! let store = InMemoryNoteStore::new();
//! let report = pipeline
//!     .ingest_batch(vec![UploadedFile::from_path("minutes.md")?], &store)
//!     .await;
//! println!("{} notes stored", report.notes_stored);
//! ```

pub mod config;
pub mod pipeline;

pub use config::IngestConfig;
pub use pipeline::{BatchReport, FileOutcome, FileReport, Pipeline};
