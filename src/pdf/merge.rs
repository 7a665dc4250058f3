//! PDF merging functionality using lopdf

use std::collections::BTreeMap;
use lopdf::{Document, Object, ObjectId, Dictionary};
use crate::error::{Error, Result};
use crate::pdf::render::info_dictionary;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic Parent chains in broken files
const MAX_TREE_DEPTH: usize = 64;

/// Parse an uploaded PDF, rejecting encrypted and empty documents
///
/// `name` only appears in error messages.
pub fn load_upload(bytes: &[u8], name: &str) -> Result<Document> {
    let doc = Document::load_mem(bytes).map_err(Error::Merge)?;

    if doc.is_encrypted() {
        return Err(Error::EncryptedPdf(name.to_string()));
    }
    if doc.get_pages().is_empty() {
        return Err(Error::EmptyPdf(name.to_string()));
    }

    Ok(doc)
}

/// Merge documents into a single new document, pages in input order
///
/// Based on the lopdf merge example:
/// https://github.com/J-F-Liu/lopdf/blob/main/examples/merge.rs
///
/// Each document's objects are renumbered into a disjoint ID range, pages are
/// re-parented under one new page tree, and objects that are no longer
/// reachable (old catalogs and page tree nodes) are pruned.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    if documents.is_empty() {
        return Err(Error::General("No input documents provided".to_string()));
    }

    // Define a starting max_id for merged document
    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for (index, mut doc) in documents.into_iter().enumerate() {
        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(Error::EmptyPdf(format!("document {}", index + 1)));
        }

        // The new page tree has no attributes to inherit, so pull them down now
        for &page_id in pages.values() {
            flatten_inherited_attributes(&mut doc, page_id).map_err(Error::Merge)?;
        }

        // Renumber objects in this document to avoid conflicts
        doc.renumber_objects_with(max_id);

        // Update max_id for next document
        max_id = doc.max_id + 1;

        // Collect page IDs from this document
        page_ids.extend(doc.get_pages().into_values());

        // Collect all objects from this document
        objects.extend(doc.objects);
    }

    let mut merged_doc = Document::with_version("1.5");

    // Add all collected objects FIRST
    merged_doc.objects.extend(objects);

    // new_object_id() must hand out IDs above everything just added
    merged_doc.max_id = max_id - 1;

    let pages_id = merged_doc.new_object_id();

    let kids: Vec<Object> = page_ids
        .iter()
        .map(|&id| Object::Reference(id))
        .collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));

    let catalog_id = merged_doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    merged_doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged_doc.objects.insert(pages_id, Object::Dictionary(pages_object));
    merged_doc.trailer.set("Root", Object::Reference(catalog_id));

    let info_id = merged_doc.add_object(Object::Dictionary(info_dictionary()));
    merged_doc.trailer.set("Info", Object::Reference(info_id));

    // Update parent references for all pages
    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(dict)) = merged_doc.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    let pruned = merged_doc.prune_objects();
    tracing::debug!(
        "Merged {} pages, pruned {} unreachable objects",
        page_ids.len(),
        pruned.len()
    );

    Ok(merged_doc)
}

/// Copy inheritable attributes from ancestor page tree nodes onto the page
/// itself, where the page does not define them already
///
/// The walk stops at the first ancestor that cannot be resolved; the page is
/// re-parented during the merge anyway.
fn flatten_inherited_attributes(doc: &mut Document, page_id: ObjectId) -> lopdf::Result<()> {
    let mut inherited: Vec<(&[u8], Object)> = Vec::new();

    {
        let page = doc.get_dictionary(page_id)?;
        let mut missing: Vec<&[u8]> = INHERITABLE_ATTRIBUTES
            .iter()
            .copied()
            .filter(|key| !page.has(key))
            .collect();
        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
        let mut depth = 0;

        while let Some(parent_id) = parent {
            if missing.is_empty() || depth >= MAX_TREE_DEPTH {
                break;
            }
            let Ok(node) = doc.get_dictionary(parent_id) else {
                tracing::debug!("Page {:?} has unresolvable Parent {:?}", page_id, parent_id);
                break;
            };
            missing.retain(|key| match node.get(key) {
                Ok(value) => {
                    inherited.push((*key, value.clone()));
                    false
                }
                Err(_) => true,
            });
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
            depth += 1;
        }
    }

    if !inherited.is_empty() {
        let page = doc.get_dictionary_mut(page_id)?;
        for (key, value) in inherited {
            page.set(key.to_vec(), value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Font, PageDimensions, PageLayout};
    use crate::pdf::render::{save_to_bytes, DocumentBuilder};
    use lopdf::dictionary;

    fn built_document(pages: usize) -> Document {
        let mut builder = DocumentBuilder::new();
        for n in 0..pages {
            let mut layout = PageLayout::new(PageDimensions::a4());
            layout.text(50.0, 50.0, Font::Helvetica, 11.0, format!("page {}", n + 1));
            builder.add_page(&layout, &[]).unwrap();
        }
        builder.finish()
    }

    /// A document whose pages inherit MediaBox and Resources from the root node
    fn inheriting_document(pages: usize) -> Document {
        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let mut font = Dictionary::new();
        font.set("Type", Object::Name(b"Font".to_vec()));
        font.set("Subtype", Object::Name(b"Type1".to_vec()));
        font.set("BaseFont", Object::Name(b"Courier".to_vec()));
        let font_id = doc.add_object(Object::Dictionary(font));

        let mut kids = Vec::new();
        for _ in 0..pages {
            let content_id = doc.add_object(lopdf::Stream::new(
                Dictionary::new(),
                b"BT /C 12 Tf 72 720 Td (upload) Tj ET".to_vec(),
            ));
            let mut page = Dictionary::new();
            page.set("Type", Object::Name(b"Page".to_vec()));
            page.set("Parent", Object::Reference(pages_id));
            page.set("Contents", Object::Reference(content_id));
            kids.push(Object::Reference(doc.add_object(Object::Dictionary(page))));
        }

        let mut fonts = Dictionary::new();
        fonts.set("C", Object::Reference(font_id));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));

        let mut tree = Dictionary::new();
        tree.set("Type", Object::Name(b"Pages".to_vec()));
        tree.set("Count", Object::Integer(pages as i64));
        tree.set("Kids", Object::Array(kids));
        tree.set("Resources", Object::Dictionary(resources));
        tree.set("MediaBox", Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ]));
        doc.objects.insert(pages_id, Object::Dictionary(tree));

        let catalog_id = doc.add_object(lopdf::dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_merge_empty_input_list() {
        let result = merge_documents(vec![]);
        assert!(result.unwrap_err().to_string().contains("No input documents"));
    }

    #[test]
    fn test_merge_page_count_and_order() {
        let mut merged = merge_documents(vec![built_document(1), inheriting_document(3)]).unwrap();
        let pages = merged.get_pages();
        assert_eq!(pages.len(), 4);

        let first_page = *pages.get(&1).unwrap();
        let content = merged.get_page_content(first_page).unwrap();
        assert!(String::from_utf8_lossy(&content).contains("page 1"));

        let bytes = save_to_bytes(&mut merged).unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 4);
    }

    #[test]
    fn test_merge_pushes_inherited_attributes_onto_pages() {
        let merged = merge_documents(vec![built_document(1), inheriting_document(2)]).unwrap();

        for (_, page_id) in merged.get_pages() {
            let page = merged.get_dictionary(page_id).unwrap();
            assert!(page.has(b"MediaBox"), "page {:?} lost its MediaBox", page_id);
            assert!(page.has(b"Resources"), "page {:?} lost its Resources", page_id);
        }
    }

    #[test]
    fn test_merge_drops_old_catalogs() {
        let merged = merge_documents(vec![built_document(1), built_document(2)]).unwrap();
        let catalogs = merged
            .objects
            .values()
            .filter(|object| match object {
                Object::Dictionary(dict) => dict.has_type(b"Catalog"),
                _ => false,
            })
            .count();
        assert_eq!(catalogs, 1);
    }

    #[test]
    fn test_merge_tolerates_dangling_parent() {
        let mut upload = inheriting_document(1);
        let page_id = *upload.get_pages().get(&1).unwrap();
        upload
            .get_dictionary_mut(page_id)
            .unwrap()
            .set("Parent", Object::Reference((999, 0)));

        let mut bytes = Vec::new();
        upload.save_to(&mut bytes).unwrap();
        let upload = load_upload(&bytes, "beleg.pdf").unwrap();

        let merged = merge_documents(vec![built_document(1), upload]).unwrap();
        let pages = merged.get_pages();
        assert_eq!(pages.len(), 2);

        let page = merged.get_dictionary(pages[&2]).unwrap();
        let parent = page.get(b"Parent").and_then(Object::as_reference).unwrap();
        assert!(merged.get_dictionary(parent).unwrap().has_type(b"Pages"));
    }

    #[test]
    fn test_load_upload_rejects_garbage() {
        let result = load_upload(b"this is not a pdf", "beleg.pdf");
        assert!(matches!(result, Err(Error::Merge(_))));
    }
}
