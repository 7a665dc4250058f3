//! Form validation
//!
//! Every rule is checked so the user sees all problems at once. A form that
//! passes becomes a [`ValidatedSubmission`], the only way to obtain an
//! [`ExpenseRecord`].

use std::fmt;

use chrono::NaiveDate;

use crate::amount::Amount;
use crate::attachment::Attachment;
use crate::record::{parse_attendees, ExpenseRecord};

/// Minimum number of attendees on a hospitality receipt
pub const MIN_ATTENDEES: usize = 2;

/// A file the user uploaded instead of taking a photo
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Raw values collected by the form layer for one submission
#[derive(Debug, Clone)]
pub struct ReceiptForm {
    /// Occasion of the hospitality
    pub reason: String,
    pub date: NaiveDate,
    /// Newline-delimited attendee names
    pub attendees: String,
    pub amount: Amount,
    pub tip: Amount,
    /// Whether to draw the logo on the summary page
    pub include_logo: bool,
    /// Photo taken with the camera
    pub captured_photo: Option<Vec<u8>>,
    /// Existing receipt (image or PDF)
    pub uploaded_file: Option<UploadedFile>,
}

/// A single user-correctable problem with the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingReason,
    TooFewAttendees,
    /// Amount plus tip does not fit into an [`Amount`]
    TotalTooLarge,
    MissingAttachment,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ValidationError::MissingReason => "Bitte gib den Anlass der Bewirtung an.",
            ValidationError::TooFewAttendees => "Bitte gib mindestens zwei bewirtete Personen an.",
            ValidationError::TotalTooLarge => "Der Gesamtbetrag ist zu hoch.",
            ValidationError::MissingAttachment => {
                "Bitte lade einen Beleg hoch oder nimm ein Foto auf."
            }
        };
        f.write_str(message)
    }
}

/// All problems found in one form, in rule order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Human-readable messages, one per problem
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}

/// A form that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub record: ExpenseRecord,
    pub attachment: Attachment,
    pub include_logo: bool,
}

/// Validate a form, consuming it
///
/// When both a photo and an upload are present the upload wins.
pub fn validate(form: ReceiptForm) -> std::result::Result<ValidatedSubmission, ValidationErrors> {
    let mut errors = Vec::new();

    if form.reason.trim().is_empty() {
        errors.push(ValidationError::MissingReason);
    }

    let attendees = parse_attendees(&form.attendees);
    if attendees.len() < MIN_ATTENDEES {
        errors.push(ValidationError::TooFewAttendees);
    }

    let record = ExpenseRecord::new(
        form.reason.trim().to_string(),
        form.date,
        attendees,
        form.amount,
        form.tip,
    );
    if record.is_none() {
        errors.push(ValidationError::TotalTooLarge);
    }

    let upload = form.uploaded_file.filter(|file| !file.bytes.is_empty());
    let photo = form.captured_photo.filter(|bytes| !bytes.is_empty());
    let attachment = match (upload, photo) {
        (Some(file), _) => Some(Attachment::uploaded(file.name, file.bytes)),
        (None, Some(bytes)) => Some(Attachment::captured(bytes)),
        (None, None) => {
            errors.push(ValidationError::MissingAttachment);
            None
        }
    };

    match (record, attachment) {
        (Some(record), Some(attachment)) if errors.is_empty() => Ok(ValidatedSubmission {
            record,
            attachment,
            include_logo: form.include_logo,
        }),
        _ => Err(ValidationErrors(errors)),
    }
}
