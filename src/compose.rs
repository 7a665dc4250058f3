//! Summary page composition
//!
//! Produces the fixed layout of the receipt's first page as draw
//! instructions. Nothing here touches a PDF document, so the layout can be
//! inspected and compared directly.

use std::path::Path;

use crate::attachment::EncodedImage;
use crate::date::format_date;
use crate::error::{Error, Result};
use crate::layout::{fit_width, Font, PageDimensions, PageLayout};
use crate::pdf::fonts::text_width;
use crate::record::ExpenseRecord;

pub const TITLE: &str = "Bewirtungsbeleg";
pub const FOOTER_TEXT: &str =
    "Dieser Beleg wurde erstellt mit Bewirti – Der Bewirtungsbeleg Buddy - bewirti.swokiz.com";
pub const SIGNATURE_CAPTION: &str = "Unterschrift";

/// Resource name of the logo image on the summary page
pub const LOGO_NAME: &str = "Logo";
/// Resource name of the receipt image on the attachment page
pub const RECEIPT_IMAGE_NAME: &str = "Receipt";

const LEFT_MARGIN: f32 = 50.0;
const VALUE_X: f32 = 180.0;
const ATTENDEE_X: f32 = 70.0;
const LINE_SPACING: f32 = 18.0;
const BODY_SIZE: f32 = 11.0;
const TITLE_SIZE: f32 = 16.0;
const FOOTER_SIZE: f32 = 8.0;
const FOOTER_Y: f32 = 30.0;

const LOGO_WIDTH: f32 = 150.0;
const LOGO_RIGHT_INSET: f32 = 50.0;
const LOGO_TOP_INSET: f32 = 30.0;

const SIGNATURE_Y: f32 = 100.0;
const SIGNATURE_LENGTH: f32 = 200.0;
const SIGNATURE_CAPTION_GAP: f32 = 15.0;

/// Margin around the receipt image on the attachment page
const IMAGE_MARGIN: f32 = 50.0;

/// The composed summary page and the logo it references, if any
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPage {
    pub layout: PageLayout,
    pub logo: Option<EncodedImage>,
}

/// Load the logo image, flattened onto white
pub fn load_logo(path: &Path) -> Result<EncodedImage> {
    let image = image::open(path).map_err(|source| Error::Logo {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(EncodedImage::flattened_rgb(&image))
}

/// Compose the summary page for a record
///
/// The attendee list is not paginated; very long lists run into the
/// signature area.
pub fn compose_summary(record: &ExpenseRecord, logo: Option<EncodedImage>) -> SummaryPage {
    let page = PageDimensions::a4();
    let (width, height) = (page.width_pt(), page.height_pt());
    let mut layout = PageLayout::new(page);

    if let Some(logo) = &logo {
        let logo_height = LOGO_WIDTH * logo.aspect_ratio();
        layout.image(
            LOGO_NAME,
            width - LOGO_WIDTH - LOGO_RIGHT_INSET,
            height - logo_height - LOGO_TOP_INSET,
            LOGO_WIDTH,
            logo_height,
        );
    }

    layout.text(LEFT_MARGIN, height - 50.0, Font::HelveticaBold, TITLE_SIZE, TITLE);

    let fields = [
        ("Anlass der Bewirtung:", record.reason().to_string()),
        ("Tag der Bewirtung:", format_date(&record.date())),
        ("Betrag:", record.amount().to_string()),
        ("Trinkgeld:", record.tip().to_string()),
        ("Gesamtbetrag:", record.total().to_string()),
    ];

    let mut y = height - 80.0;
    for (label, value) in fields {
        layout.text(LEFT_MARGIN, y, Font::HelveticaBold, BODY_SIZE, label);
        layout.text(VALUE_X, y, Font::Helvetica, BODY_SIZE, value);
        y -= LINE_SPACING;
    }

    // One blank line between the amounts and the attendees
    y -= LINE_SPACING;
    layout.text(LEFT_MARGIN, y, Font::HelveticaBold, BODY_SIZE, "Bewirtete Personen:");
    y -= LINE_SPACING;
    for person in record.attendees() {
        layout.text(ATTENDEE_X, y, Font::Helvetica, BODY_SIZE, format!("- {}", person));
        y -= LINE_SPACING;
    }

    layout.line(
        (LEFT_MARGIN, SIGNATURE_Y),
        (LEFT_MARGIN + SIGNATURE_LENGTH, SIGNATURE_Y),
        1.0,
    );
    layout.text(
        LEFT_MARGIN,
        SIGNATURE_Y - SIGNATURE_CAPTION_GAP,
        Font::Helvetica,
        BODY_SIZE,
        SIGNATURE_CAPTION,
    );

    let footer_width = text_width(FOOTER_TEXT, Font::HelveticaOblique, FOOTER_SIZE);
    layout.text(
        (width - footer_width) / 2.0,
        FOOTER_Y,
        Font::HelveticaOblique,
        FOOTER_SIZE,
        FOOTER_TEXT,
    );

    SummaryPage { layout, logo }
}

/// Compose the page showing the receipt image
///
/// The image spans the page width minus margins with its top edge at the top
/// margin. An image that would then run past the bottom margin is instead
/// shrunk to the page height minus margins and centered horizontally, so
/// long receipts are never cut off at the page edge.
pub fn compose_image_page(image: &EncodedImage) -> PageLayout {
    let page = PageDimensions::a4();
    let (width, height) = (page.width_pt(), page.height_pt());
    let mut layout = PageLayout::new(page);

    let max_width = width - 2.0 * IMAGE_MARGIN;
    let max_height = height - 2.0 * IMAGE_MARGIN;
    let (draw_width, draw_height) = fit_width(max_width, max_height, image.aspect_ratio());

    layout.image(
        RECEIPT_IMAGE_NAME,
        IMAGE_MARGIN + (max_width - draw_width) / 2.0,
        height - draw_height - IMAGE_MARGIN,
        draw_width,
        draw_height,
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::attachment::ImageEncoding;
    use crate::layout::DrawOp;
    use chrono::NaiveDate;

    fn record(attendees: &[&str]) -> ExpenseRecord {
        ExpenseRecord::new(
            "Projektabschluss".to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            attendees.iter().map(|s| s.to_string()).collect(),
            Amount::from_cents(1250),
            Amount::from_cents(200),
        )
        .unwrap()
    }

    fn image(width: u32, height: u32) -> EncodedImage {
        EncodedImage { data: vec![], width, height, encoding: ImageEncoding::Jpeg }
    }

    fn find_text<'a>(layout: &'a PageLayout, needle: &str) -> &'a DrawOp {
        layout
            .ops
            .iter()
            .find(|op| matches!(op, DrawOp::Text { text, .. } if text == needle))
            .unwrap_or_else(|| panic!("text {:?} not on page", needle))
    }

    #[test]
    fn test_summary_fields_in_order() {
        let summary = compose_summary(&record(&["Anna", "Bernd"]), None);
        let texts: Vec<&str> = summary.layout.texts().collect();

        assert_eq!(
            texts,
            vec![
                "Bewirtungsbeleg",
                "Anlass der Bewirtung:",
                "Projektabschluss",
                "Tag der Bewirtung:",
                "07.03.2024",
                "Betrag:",
                "12.50 €",
                "Trinkgeld:",
                "2.00 €",
                "Gesamtbetrag:",
                "14.50 €",
                "Bewirtete Personen:",
                "- Anna",
                "- Bernd",
                "Unterschrift",
                FOOTER_TEXT,
            ]
        );
    }

    #[test]
    fn test_attendees_step_down_one_line_each() {
        let summary = compose_summary(&record(&["Anna", "Bernd", "Carla"]), None);
        let ys: Vec<f32> = ["- Anna", "- Bernd", "- Carla"]
            .iter()
            .map(|name| match find_text(&summary.layout, name) {
                DrawOp::Text { x, y, .. } => {
                    assert_eq!(*x, 70.0);
                    *y
                }
                _ => unreachable!(),
            })
            .collect();

        assert!((ys[0] - ys[1] - 18.0).abs() < 0.001);
        assert!((ys[1] - ys[2] - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_fixed_positions() {
        let summary = compose_summary(&record(&["Anna", "Bernd"]), None);
        let height = PageDimensions::a4().height_pt();

        match find_text(&summary.layout, "Bewirtungsbeleg") {
            DrawOp::Text { x, y, font, size, .. } => {
                assert_eq!((*x, *font, *size), (50.0, Font::HelveticaBold, 16.0));
                assert!((*y - (height - 50.0)).abs() < 0.001);
            }
            _ => unreachable!(),
        }

        match find_text(&summary.layout, "Unterschrift") {
            DrawOp::Text { x, y, .. } => assert_eq!((*x, *y), (50.0, 85.0)),
            _ => unreachable!(),
        }

        assert!(summary.layout.ops.contains(&DrawOp::Line {
            from: (50.0, 100.0),
            to: (250.0, 100.0),
            width: 1.0,
        }));
    }

    #[test]
    fn test_footer_is_centered() {
        let summary = compose_summary(&record(&["Anna", "Bernd"]), None);
        let page_width = PageDimensions::a4().width_pt();

        match find_text(&summary.layout, FOOTER_TEXT) {
            DrawOp::Text { x, y, font, size, text } => {
                assert_eq!((*y, *font, *size), (30.0, Font::HelveticaOblique, 8.0));
                let width = text_width(text, *font, *size);
                assert!((x + width / 2.0 - page_width / 2.0).abs() < 0.01);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_logo_placement() {
        let summary = compose_summary(&record(&["Anna", "Bernd"]), Some(image(300, 100)));
        let page = PageDimensions::a4();

        match &summary.layout.ops[0] {
            DrawOp::Image { name, x, y, width, height } => {
                assert_eq!(name, LOGO_NAME);
                assert_eq!(*width, 150.0);
                assert_eq!(*height, 50.0);
                assert!((x - (page.width_pt() - 200.0)).abs() < 0.001);
                assert!((y - (page.height_pt() - 80.0)).abs() < 0.001);
            }
            other => panic!("expected logo first, got {:?}", other),
        }
        assert!(summary.logo.is_some());
    }

    #[test]
    fn test_no_logo_no_image_op() {
        let summary = compose_summary(&record(&["Anna", "Bernd"]), None);
        assert!(!summary.layout.ops.iter().any(|op| matches!(op, DrawOp::Image { .. })));
    }

    #[test]
    fn test_composition_is_deterministic() {
        let a = compose_summary(&record(&["Anna", "Bernd"]), Some(image(10, 10)));
        let b = compose_summary(&record(&["Anna", "Bernd"]), Some(image(10, 10)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_image_page_fills_width() {
        let layout = compose_image_page(&image(400, 300));
        let page = PageDimensions::a4();

        match &layout.ops[..] {
            [DrawOp::Image { x, y, width, height, .. }] => {
                assert_eq!(*x, 50.0);
                assert!((width - (page.width_pt() - 100.0)).abs() < 0.001);
                assert!((height - width * 0.75).abs() < 0.001);
                assert!((y + height - (page.height_pt() - 50.0)).abs() < 0.001);
            }
            other => panic!("unexpected ops {:?}", other),
        }
    }

    #[test]
    fn test_image_page_shrinks_tall_receipts() {
        let layout = compose_image_page(&image(100, 1000));
        let page = PageDimensions::a4();

        match &layout.ops[..] {
            [DrawOp::Image { y, height, .. }] => {
                assert!((height - (page.height_pt() - 100.0)).abs() < 0.001);
                assert!((y - 50.0).abs() < 0.001);
            }
            other => panic!("unexpected ops {:?}", other),
        }
    }

    #[test]
    fn test_load_logo_missing_file() {
        let result = load_logo(Path::new("does/not/exist.png"));
        assert!(matches!(result, Err(Error::Logo { .. })));
    }
}
