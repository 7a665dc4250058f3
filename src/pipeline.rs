//! One receipt request, end to end
//!
//! validate → compose summary → resolve attachment → assemble. Runs
//! synchronously to completion; nothing is shared between requests.

use std::path::PathBuf;

use crate::assemble::{assemble, OUTPUT_FILE_NAME};
use crate::attachment::ResolvedAttachment;
use crate::compose::{compose_summary, load_logo};
use crate::error::Result;
use crate::validate::{validate, ReceiptForm};

/// Default location of the logo drawn on the summary page
pub const DEFAULT_LOGO_PATH: &str = "res/bewirti_logo.png";

pub const SUCCESS_MESSAGE: &str = "Beleg erfolgreich erstellt.";
pub const SUCCESS_MESSAGE_WITH_PDF: &str = "Beleg erstellt mit hochgeladenem PDF.";

/// Per-request options that are not part of the form
#[derive(Debug, Clone)]
pub struct ReceiptOptions {
    /// Where to load the logo from when the form asks for one
    pub logo_path: PathBuf,
}

impl Default for ReceiptOptions {
    fn default() -> Self {
        Self {
            logo_path: PathBuf::from(DEFAULT_LOGO_PATH),
        }
    }
}

/// The generated receipt, ready to be offered for download
#[derive(Debug, Clone)]
pub struct Receipt {
    /// Always `bewirtungsbeleg.pdf`
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Non-fatal problems, e.g. a logo that could not be loaded
    pub warnings: Vec<String>,
    /// Success notification for the user
    pub message: &'static str,
}

/// Generate the receipt PDF for a submitted form
///
/// Validation failures come back as [`Error::Validation`](crate::Error::Validation)
/// before any document work starts.
pub fn generate_receipt(form: ReceiptForm, options: &ReceiptOptions) -> Result<Receipt> {
    let submission = validate(form)?;
    let mut warnings = Vec::new();

    let logo = if submission.include_logo {
        match load_logo(&options.logo_path) {
            Ok(logo) => Some(logo),
            Err(e) => {
                tracing::warn!("{} ({})", e, options.logo_path.display());
                warnings.push(e.to_string());
                None
            }
        }
    } else {
        None
    };

    let summary = compose_summary(&submission.record, logo);
    tracing::debug!(
        "Composed summary page with {} draw operations",
        summary.layout.ops.len()
    );

    let resolved = submission.attachment.resolve()?;
    let message = match resolved {
        ResolvedAttachment::Image(_) => SUCCESS_MESSAGE,
        ResolvedAttachment::Pdf { .. } => SUCCESS_MESSAGE_WITH_PDF,
    };

    let document = assemble(&summary, resolved)?;
    tracing::info!(
        "Generated {} with {} pages ({} bytes)",
        OUTPUT_FILE_NAME,
        document.page_count,
        document.bytes.len()
    );

    Ok(Receipt {
        file_name: OUTPUT_FILE_NAME,
        bytes: document.bytes,
        page_count: document.page_count,
        warnings,
        message,
    })
}
