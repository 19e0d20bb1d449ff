//! # sift-notes
//!
//! Turns extracted text into note records.
//!
//! - [`segment`]: the ordered segmentation cascade
//! - [`synthesize`]: note records with ids, tags, summaries and provenance
//! - [`smart_tags`]: keyword and size based tags
//! - [`store`]: in-memory and JSON file note sinks
//!
//! ## Example
//!
//! ```rust
//! use sift_notes::segment;
//!
//! let units = segment("# Intro\nHello\n\n# Details\nWorld", "notes.md");
//! assert_eq!(units.len(), 2);
//! assert_eq!(units[0].title, "Intro");
//! ```

pub mod segment;
pub mod smart_tags;
pub mod store;
pub mod synthesize;

pub use segment::{segment, segment_with_strategy, truncate_title, Segmentation, SegmentStrategy, CASCADE};
pub use smart_tags::{slugify, smart_tags};
pub use store::{InMemoryNoteStore, JsonFileNoteStore};
pub use synthesize::{extractive_summary, generate_note_id, note_tags, NoteSynthesizer};
