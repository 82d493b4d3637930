//! OCR pipeline: image preprocessing and the recognition engine seam.

mod preprocessing;
mod tesseract;

pub use preprocessing::ImagePreprocessor;
pub use tesseract::TesseractEngine;

use image::DynamicImage;

use crate::error::OcrError;

/// Contract for the external text-recognition engine: image in, raw
/// newline-delimited text out.
///
/// Implementations must distinguish backend failures (engine missing or
/// crashed) from a successful run that found nothing; the latter is reported
/// by the pipeline as [`OcrError::EmptyText`], not by the engine.
pub trait OcrEngine: Send + Sync {
    /// Recognize text in the given image.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

impl<E: OcrEngine + ?Sized> OcrEngine for &E {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        (**self).recognize(image)
    }
}

impl<E: OcrEngine + ?Sized> OcrEngine for Box<E> {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        (**self).recognize(image)
    }
}
