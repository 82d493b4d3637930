//! Error types for the scanwise-core library.

use thiserror::Error;

/// Main error type for the scanwise library.
#[derive(Error, Debug)]
pub enum ScanError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Image decoding or processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// File type rejected before any processing.
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to OCR processing.
///
/// Backend failures are infrastructure problems and retry-worthy; an empty
/// result is a data-quality problem the user fixes with a clearer photo.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR backend is missing or could not be started.
    #[error("OCR backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The OCR backend started but crashed or rejected the image.
    #[error("OCR backend failed: {0}")]
    BackendFailed(String),

    /// The backend ran but produced no usable text.
    #[error("no text recognized in image")]
    EmptyText,

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The OCR call exceeded its time budget.
    #[error("OCR timed out after {0}s")]
    Timeout(u64),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to extract images from PDF.
    #[error("failed to extract images: {0}")]
    ImageExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Result type for the scanwise library.
pub type Result<T> = std::result::Result<T, ScanError>;
