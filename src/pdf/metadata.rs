//! PDF metadata extraction

use std::path::Path;
use lopdf::{Document, Object};
use crate::error::{Error, Result};

/// Count pages by reading the Count field from the Pages dictionary
/// This is more reliable than get_pages() which doesn't handle nested page trees
pub fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let catalog_id = doc.trailer.get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| Error::General("No Root reference in trailer".to_string()))?;

    let pages_id = doc.get_dictionary(catalog_id)?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| Error::General("No Pages reference in catalog".to_string()))?;

    let count = doc.get_dictionary(pages_id)?
        .get(b"Count")
        .and_then(Object::as_i64)
        .map_err(|_| Error::General("No integer Count in Pages".to_string()))?;

    usize::try_from(count).map_err(|_| Error::General(format!("Negative page count: {}", count)))
}

/// PDF metadata
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Document title (if present)
    pub title: Option<String>,
    /// Document author (if present)
    pub author: Option<String>,
    /// Producing application (if present)
    pub producer: Option<String>,
}

/// Extract metadata from a PDF file
pub fn extract_metadata(path: &Path) -> Result<PdfMetadata> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    metadata_of(&doc, &path.display().to_string())
}

/// Extract metadata from PDF bytes held in memory
pub fn extract_metadata_from_bytes(bytes: &[u8]) -> Result<PdfMetadata> {
    let doc = Document::load_mem(bytes)?;
    metadata_of(&doc, "in-memory document")
}

fn metadata_of(doc: &Document, name: &str) -> Result<PdfMetadata> {
    let page_count = count_pages_from_catalog(doc)?;

    if page_count == 0 {
        return Err(Error::EmptyPdf(name.to_string()));
    }

    let info = doc.trailer.get(b"Info")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .ok();

    let text_entry = |key: &[u8]| -> Option<String> {
        let bytes = info?.get(key).and_then(Object::as_str).ok()?;
        String::from_utf8(bytes.to_vec()).ok()
    };

    Ok(PdfMetadata {
        page_count,
        title: text_entry(b"Title"),
        author: text_entry(b"Author"),
        producer: text_entry(b"Producer"),
    })
}

/// Count the number of pages in PDF bytes
pub fn count_pages(bytes: &[u8]) -> Result<usize> {
    let doc = Document::load_mem(bytes)?;
    count_pages_from_catalog(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{PageDimensions, PageLayout};
    use crate::pdf::render::{save_to_bytes, DocumentBuilder};

    #[test]
    fn test_extract_metadata_nonexistent_file() {
        let result = extract_metadata(Path::new("nonexistent.pdf"));
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_metadata_of_generated_document() {
        let mut builder = DocumentBuilder::new();
        for _ in 0..3 {
            builder.add_page(&PageLayout::new(PageDimensions::a4()), &[]).unwrap();
        }
        let bytes = save_to_bytes(&mut builder.finish()).unwrap();

        assert_eq!(count_pages(&bytes).unwrap(), 3);

        let metadata = extract_metadata_from_bytes(&bytes).unwrap();
        assert_eq!(metadata.page_count, 3);
        assert_eq!(metadata.title.as_deref(), Some("Bewirtungsbeleg"));
        assert_eq!(metadata.producer.as_deref(), Some("Bewirti"));
        assert_eq!(metadata.author, None);
    }

    #[test]
    fn test_count_pages_rejects_garbage() {
        assert!(count_pages(b"%PDF-nope").is_err());
    }
}
