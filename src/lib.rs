//! Bewirti Library
//!
//! Generates German hospitality receipts ("Bewirtungsbelege") as PDF.
//! This library provides functionality to:
//! - Validate the submitted form (occasion, attendees, receipt evidence)
//! - Compose the fixed-layout summary page with signature line
//! - Re-encode receipt photos as JPEG or merge uploaded receipt PDFs
//! - Parse flexible date expressions and exact money amounts
//!
//! # Example
//!
//! ```no_run
//! use bewirti::{generate_receipt, Amount, ReceiptForm, ReceiptOptions, UploadedFile};
//! use chrono::NaiveDate;
//!
//! let form = ReceiptForm {
//!     reason: "Projektabschluss".to_string(),
//!     date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
//!     attendees: "Anna Schmidt\nBernd Meier".to_string(),
//!     amount: Amount::parse("12.50").unwrap(),
//!     tip: Amount::parse("2.00").unwrap(),
//!     include_logo: true,
//!     captured_photo: None,
//!     uploaded_file: Some(UploadedFile {
//!         name: "rechnung.pdf".to_string(),
//!         bytes: std::fs::read("rechnung.pdf").unwrap(),
//!     }),
//! };
//!
//! let receipt = generate_receipt(form, &ReceiptOptions::default()).expect("Failed to generate");
//! std::fs::write(receipt.file_name, &receipt.bytes).unwrap();
//! ```

pub mod amount;
pub mod assemble;
pub mod attachment;
pub mod compose;
pub mod date;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod pipeline;
pub mod record;
pub mod validate;

// Re-export commonly used items
pub use amount::Amount;
pub use error::{Error, Result};
pub use pipeline::{generate_receipt, Receipt, ReceiptOptions};
pub use record::ExpenseRecord;
pub use validate::{ReceiptForm, UploadedFile, ValidationError, ValidationErrors};
