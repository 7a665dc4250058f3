//! Rendering page layouts into a new PDF document using lopdf

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::attachment::{EncodedImage, ImageEncoding};
use crate::error::Result;
use crate::layout::{DrawOp, Font, PageLayout};
use crate::pdf::fonts::{add_standard_font, encode_win_ansi};

/// Document title written to the Info dictionary
pub const DOCUMENT_TITLE: &str = "Bewirtungsbeleg";

/// Producer written to the Info dictionary
pub const PRODUCER: &str = "Bewirti";

/// Builds a fresh document page by page
///
/// Pages are finalized as soon as they are added; the page tree and catalog
/// are written by [`DocumentBuilder::finish`].
pub struct DocumentBuilder {
    doc: Document,
    pages_id: ObjectId,
    fonts: Dictionary,
    page_ids: Vec<ObjectId>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            let font_id = add_standard_font(&mut doc, font);
            fonts.set(font.resource_name(), Object::Reference(font_id));
        }

        Self { doc, pages_id, fonts, page_ids: Vec::new() }
    }

    /// Add an image XObject and return its object ID
    pub fn add_image(&mut self, image: &EncodedImage) -> ObjectId {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        dict.set("Width", Object::Integer(image.width as i64));
        dict.set("Height", Object::Integer(image.height as i64));
        dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
        dict.set("BitsPerComponent", Object::Integer(8));

        let stream = match image.encoding {
            ImageEncoding::Jpeg => {
                dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
                // Already compressed; deflating JPEG data again gains nothing
                Stream::new(dict, image.data.clone()).with_compression(false)
            }
            ImageEncoding::RawRgb => Stream::new(dict, image.data.clone()),
        };

        self.doc.add_object(Object::Stream(stream))
    }

    /// Render a layout as the next page
    ///
    /// `images` maps the names used by [`DrawOp::Image`] to XObject IDs.
    pub fn add_page(&mut self, layout: &PageLayout, images: &[(&str, ObjectId)]) -> Result<ObjectId> {
        let content = page_content(layout)?;
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), content));

        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(self.fonts.clone()));
        if !images.is_empty() {
            let mut xobjects = Dictionary::new();
            for (name, id) in images {
                xobjects.set(name.as_bytes().to_vec(), Object::Reference(*id));
            }
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(self.pages_id));
        page.set("MediaBox", Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(layout.page.width_pt()),
            Object::Real(layout.page.height_pt()),
        ]));
        page.set("Resources", Object::Dictionary(resources));
        page.set("Contents", Object::Reference(content_id));

        let page_id = self.doc.add_object(Object::Dictionary(page));
        self.page_ids.push(page_id);
        Ok(page_id)
    }

    /// Write the page tree, catalog and Info dictionary
    pub fn finish(mut self) -> Document {
        let kids: Vec<Object> = self.page_ids.iter().map(|&id| Object::Reference(id)).collect();

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", Object::Integer(self.page_ids.len() as i64));
        pages.set("Kids", Object::Array(kids));
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(self.pages_id));
        let catalog_id = self.doc.add_object(Object::Dictionary(catalog));
        self.doc.trailer.set("Root", Object::Reference(catalog_id));

        let info_id = self.doc.add_object(Object::Dictionary(info_dictionary()));
        self.doc.trailer.set("Info", Object::Reference(info_id));

        self.doc
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Info dictionary without timestamps so output stays reproducible
pub fn info_dictionary() -> Dictionary {
    let mut info = Dictionary::new();
    info.set("Title", Object::string_literal(DOCUMENT_TITLE));
    info.set("Producer", Object::string_literal(PRODUCER));
    info
}

/// Encode the content stream for a layout
pub fn page_content(layout: &PageLayout) -> Result<Vec<u8>> {
    let mut ops = vec![
        Operation::new("g", vec![Object::Integer(0)]),
        Operation::new("G", vec![Object::Integer(0)]),
    ];

    for op in &layout.ops {
        match op {
            DrawOp::Text { x, y, font, size, text } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new("Tf", vec![
                    Object::Name(font.resource_name().as_bytes().to_vec()),
                    Object::Real(*size),
                ]));
                ops.push(Operation::new("Td", vec![Object::Real(*x), Object::Real(*y)]));
                ops.push(Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawOp::Line { from, to, width } => {
                ops.push(Operation::new("w", vec![Object::Real(*width)]));
                ops.push(Operation::new("m", vec![Object::Real(from.0), Object::Real(from.1)]));
                ops.push(Operation::new("l", vec![Object::Real(to.0), Object::Real(to.1)]));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Image { name, x, y, width, height } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("cm", vec![
                    Object::Real(*width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(*height),
                    Object::Real(*x),
                    Object::Real(*y),
                ]));
                ops.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }

    Ok(Content { operations: ops }.encode()?)
}

/// Compress and serialize a document
pub fn save_to_bytes(doc: &mut Document) -> Result<Vec<u8>> {
    doc.compress();
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}
