//! Error types for the receipt generator

use std::path::PathBuf;
use thiserror::Error;

use crate::validate::ValidationErrors;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the receipt generator
#[derive(Error, Debug)]
pub enum Error {
    /// The form was incomplete; carries every violation found
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Logo could not be loaded. The pipeline turns this into a warning.
    #[error("Logo konnte nicht geladen werden: {source}")]
    Logo {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Receipt photo or uploaded image could not be decoded/re-encoded
    #[error("Receipt image could not be processed: {0}")]
    AttachmentDecode(#[from] image::ImageError),

    /// Uploaded PDF could not be parsed or merged
    #[error("Uploaded PDF could not be merged: {0}")]
    Merge(#[source] lopdf::Error),

    /// Uploaded PDF is encrypted
    #[error("Uploaded PDF is encrypted: {0}")]
    EncryptedPdf(String),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {0}")]
    EmptyPdf(String),

    /// PDF processing error on a document we produced ourselves
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Money amount could not be parsed
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Date parsing error
    #[error("Invalid date expression: {0}")]
    InvalidDateExpression(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// General error
    #[error("{0}")]
    General(String),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}
