//! PDF writing, merging and inspection

pub mod fonts;
pub mod merge;
pub mod metadata;
pub mod render;

// Re-export commonly used items
pub use merge::{load_upload, merge_documents};
pub use metadata::{count_pages, extract_metadata, extract_metadata_from_bytes, PdfMetadata};
pub use render::{page_content, save_to_bytes, DocumentBuilder};
