//! Tesseract-backed OCR engine.

use std::collections::HashMap;

use image::DynamicImage;
use rusty_tesseract::{Args, Image};
use tracing::debug;

use super::OcrEngine;
use crate::config::OcrConfig;
use crate::error::OcrError;

/// OCR engine backed by the system Tesseract binary.
///
/// All backend settings (language, page segmentation mode, engine mode) come
/// in through [`OcrConfig`] at construction; nothing is read from or written
/// to process-wide state.
pub struct TesseractEngine {
    args: Args,
}

impl TesseractEngine {
    /// Build an engine from explicit configuration.
    pub fn new(config: &OcrConfig) -> Self {
        let args = Args {
            lang: config.language.clone(),
            config_variables: HashMap::new(),
            dpi: Some(config.dpi),
            psm: Some(config.psm),
            oem: Some(config.oem),
        };
        Self { args }
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let tess_image = Image::from_dynamic_image(image)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        let text = rusty_tesseract::image_to_string(&tess_image, &self.args)
            .map_err(backend_error)?;

        debug!("OCR produced {} characters", text.len());
        Ok(text)
    }
}

/// Classify a backend error: a missing binary is an infrastructure problem
/// distinct from a crash while reading a particular image.
fn backend_error(e: impl std::fmt::Display) -> OcrError {
    let message = e.to_string();
    if message.to_lowercase().contains("not found") {
        OcrError::BackendUnavailable(message)
    } else {
        OcrError::BackendFailed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_carries_config() {
        let config = OcrConfig {
            language: "eng+hin".to_string(),
            psm: 4,
            oem: 1,
            dpi: 600,
            timeout_secs: 10,
        };
        let engine = TesseractEngine::new(&config);

        assert_eq!(engine.args.lang, "eng+hin");
        assert_eq!(engine.args.psm, Some(4));
        assert_eq!(engine.args.oem, Some(1));
        assert_eq!(engine.args.dpi, Some(600));
    }

    #[test]
    fn test_backend_error_classification() {
        assert!(matches!(
            backend_error("tesseract not found in PATH"),
            OcrError::BackendUnavailable(_)
        ));
        assert!(matches!(
            backend_error("segmentation fault"),
            OcrError::BackendFailed(_)
        ));
    }
}
