//! # sift-core
//!
//! Core types, traits, and abstractions for the sift ingestion pipeline.
//!
//! This crate provides the data model shared by every pipeline stage
//! (uploaded files, processed files, segmented units, note records), the
//! file type classifier, and the trait seams for the external collaborators
//! (generation, transcription, persistence).

pub mod classifier;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod mime;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use classifier::{base_name, classify, extension_of, extension_table, validate_extension_table};
pub use error::{Error, Result};
pub use mime::{detect_content_type, mime_subtype};
pub use models::*;
pub use traits::*;
