//! Receipt attachments: classification and normalization
//!
//! Photos and uploaded images are re-encoded as baseline RGB JPEG so they can
//! be embedded with `DCTDecode` directly. PDFs are passed through untouched
//! and merged later.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use crate::error::Result;

/// JPEG quality used when re-encoding receipt images
pub const JPEG_QUALITY: u8 = 85;

/// The receipt evidence supplied with a submission
#[derive(Debug, Clone)]
pub enum Attachment {
    /// Photo taken with the camera
    CapturedImage(Vec<u8>),
    /// Uploaded file that is not a PDF
    UploadedImage { bytes: Vec<u8>, name: String },
    /// Uploaded PDF
    UploadedPdf { bytes: Vec<u8>, name: String },
}

impl Attachment {
    pub fn captured(bytes: Vec<u8>) -> Self {
        Attachment::CapturedImage(bytes)
    }

    /// Classify an uploaded file by its name: a `.pdf` suffix (any case) is a
    /// PDF, everything else is treated as an image
    pub fn uploaded(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        if is_pdf_name(&name) {
            Attachment::UploadedPdf { bytes, name }
        } else {
            Attachment::UploadedImage { bytes, name }
        }
    }

    /// Normalize into either an embeddable JPEG or raw PDF bytes
    pub fn resolve(self) -> Result<ResolvedAttachment> {
        match self {
            Attachment::CapturedImage(bytes) => {
                tracing::debug!("Re-encoding captured photo ({} bytes)", bytes.len());
                Ok(ResolvedAttachment::Image(reencode_as_jpeg(&bytes)?))
            }
            Attachment::UploadedImage { bytes, name } => {
                tracing::debug!("Re-encoding uploaded image {} ({} bytes)", name, bytes.len());
                Ok(ResolvedAttachment::Image(reencode_as_jpeg(&bytes)?))
            }
            Attachment::UploadedPdf { bytes, name } => {
                tracing::debug!("Passing through uploaded PDF {} ({} bytes)", name, bytes.len());
                Ok(ResolvedAttachment::Pdf { bytes, name })
            }
        }
    }
}

fn is_pdf_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".pdf")
}

/// Result of resolving an [`Attachment`]
#[derive(Debug, Clone)]
pub enum ResolvedAttachment {
    /// Drawn on its own page after the summary
    Image(EncodedImage),
    /// Merged page-for-page after the summary
    Pdf { bytes: Vec<u8>, name: String },
}

/// How the bytes of an [`EncodedImage`] are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    /// Baseline JPEG, embedded as-is
    Jpeg,
    /// 8-bit RGB samples, row by row
    RawRgb,
}

/// An image ready to be embedded as a PDF image XObject
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    pub encoding: ImageEncoding,
}

impl EncodedImage {
    /// Height divided by width
    pub fn aspect_ratio(&self) -> f32 {
        self.height as f32 / self.width.max(1) as f32
    }

    /// Flatten an image onto a white background and keep the raw RGB samples
    pub fn flattened_rgb(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = a as f32 / 255.0;
            for channel in [r, g, b] {
                let blended = channel as f32 * alpha + 255.0 * (1.0 - alpha);
                data.push(blended.round() as u8);
            }
        }

        Self { data, width, height, encoding: ImageEncoding::RawRgb }
    }
}

/// Decode any supported image format, drop the alpha channel and re-encode
/// as JPEG. Dimensions are those of the decoded image.
pub fn reencode_as_jpeg(bytes: &[u8]) -> Result<EncodedImage> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
    let (width, height) = (rgb.width(), rgb.height());

    let mut data = Cursor::new(Vec::new());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut data, JPEG_QUALITY))?;

    Ok(EncodedImage {
        data: data.into_inner(),
        width,
        height,
        encoding: ImageEncoding::Jpeg,
    })
}
