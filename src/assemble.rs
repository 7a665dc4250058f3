//! Document assembly: summary page plus the resolved attachment

use crate::attachment::ResolvedAttachment;
use crate::compose::{compose_image_page, SummaryPage, LOGO_NAME, RECEIPT_IMAGE_NAME};
use crate::error::Result;
use crate::pdf::merge::{load_upload, merge_documents};
use crate::pdf::metadata::count_pages_from_catalog;
use crate::pdf::render::{save_to_bytes, DocumentBuilder};

/// File name offered for download
pub const OUTPUT_FILE_NAME: &str = "bewirtungsbeleg.pdf";

/// The finished receipt PDF
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Build the summary page, then either draw the receipt image on a second
/// page or merge the uploaded PDF after it
pub fn assemble(summary: &SummaryPage, attachment: ResolvedAttachment) -> Result<AssembledDocument> {
    let mut builder = DocumentBuilder::new();

    let mut summary_images = Vec::new();
    if let Some(logo) = &summary.logo {
        summary_images.push((LOGO_NAME, builder.add_image(logo)));
    }
    builder.add_page(&summary.layout, &summary_images)?;

    let mut doc = match attachment {
        ResolvedAttachment::Image(image) => {
            let image_id = builder.add_image(&image);
            builder.add_page(&compose_image_page(&image), &[(RECEIPT_IMAGE_NAME, image_id)])?;
            builder.finish()
        }
        ResolvedAttachment::Pdf { bytes, name } => {
            let upload = load_upload(&bytes, &name)?;
            tracing::debug!("Merging uploaded PDF with {} pages", upload.get_pages().len());
            merge_documents(vec![builder.finish(), upload])?
        }
    };

    let page_count = count_pages_from_catalog(&doc)?;
    let bytes = save_to_bytes(&mut doc)?;
    Ok(AssembledDocument { bytes, page_count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::{EncodedImage, ImageEncoding};
    use crate::error::Error;
    use crate::layout::{PageDimensions, PageLayout};

    fn blank_summary() -> SummaryPage {
        SummaryPage { layout: PageLayout::new(PageDimensions::a4()), logo: None }
    }

    #[test]
    fn test_image_branch_adds_one_page() {
        let image = EncodedImage {
            data: vec![0; 12],
            width: 2,
            height: 2,
            encoding: ImageEncoding::RawRgb,
        };
        let document = assemble(&blank_summary(), ResolvedAttachment::Image(image)).unwrap();
        assert_eq!(document.page_count, 2);
        assert!(document.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_broken_upload_is_a_merge_error() {
        let attachment = ResolvedAttachment::Pdf {
            bytes: b"%PDF-1.4 truncated".to_vec(),
            name: "kaputt.pdf".to_string(),
        };
        let result = assemble(&blank_summary(), attachment);
        assert!(matches!(result, Err(Error::Merge(_)) | Err(Error::EmptyPdf(_))));
    }
}
