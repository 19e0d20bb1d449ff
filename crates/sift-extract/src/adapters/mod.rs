//! Extraction adapter implementations, one per file category.

pub mod archive;
pub mod code;
pub mod document;
pub mod image;
pub mod media;
mod pandoc;
pub mod presentation;
pub mod spreadsheet;
pub mod text;
pub mod unknown;

pub use archive::ArchiveAdapter;
pub use code::CodeAdapter;
pub use document::DocumentAdapter;
pub use image::ImageAdapter;
pub use media::MediaAdapter;
pub use presentation::PresentationAdapter;
pub use spreadsheet::SpreadsheetAdapter;
pub use text::TextAdapter;
pub use unknown::UnknownAdapter;
