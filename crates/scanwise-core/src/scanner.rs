//! End-to-end receipt scanning pipeline.

use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::error::{OcrError, Result, ScanError};
use crate::ocr::{ImagePreprocessor, OcrEngine};
use crate::pdf::PdfReceipt;
use crate::receipt::rules::guess_category;
use crate::receipt::{Category, ExtractedReceipt, ReceiptExtractor};

/// Result of scanning one receipt file.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Structured fields; empty where extraction was not confident.
    pub receipt: ExtractedReceipt,
    /// Advisory category guess for the user to confirm or override.
    pub suggested_category: Category,
    /// The text extraction worked from, for display and troubleshooting.
    pub raw_text: String,
    /// Wall-clock time for the whole scan.
    pub processing_time_ms: u64,
}

/// Orchestrates preprocessing, text recognition and field extraction.
///
/// The engine is a pluggable collaborator so the pipeline can be exercised
/// without a real OCR backend installed.
pub struct ReceiptScanner<E: OcrEngine> {
    preprocessor: ImagePreprocessor,
    engine: E,
    extractor: ReceiptExtractor,
    config: ScanConfig,
}

impl<E: OcrEngine> ReceiptScanner<E> {
    /// Build a scanner with default configuration.
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, ScanConfig::default())
    }

    /// Build a scanner with explicit configuration.
    pub fn with_config(engine: E, config: ScanConfig) -> Self {
        Self {
            preprocessor: ImagePreprocessor::with_config(config.preprocess.clone()),
            extractor: ReceiptExtractor::with_config(&config.extraction),
            engine,
            config,
        }
    }

    /// Scan an encoded image (JPEG, PNG, ...).
    pub fn scan_bytes(&self, data: &[u8]) -> Result<ScanOutcome> {
        let image = image::load_from_memory(data)?;
        self.scan_image(&image)
    }

    /// Scan a decoded image.
    pub fn scan_image(&self, image: &DynamicImage) -> Result<ScanOutcome> {
        let started = Instant::now();
        let text = self.ocr_image(image)?;
        self.finish(text, started)
    }

    /// Scan a PDF receipt.
    ///
    /// Digitally generated PDFs carry a usable text layer; scanned ones wrap
    /// a photograph, so when the layer is missing or too thin the embedded
    /// images go through OCR instead.
    pub fn scan_pdf(&self, data: &[u8]) -> Result<ScanOutcome> {
        let started = Instant::now();
        let pdf = PdfReceipt::load(data)?;

        if self.config.pdf.prefer_embedded_text {
            match pdf.extract_text() {
                Ok(text) if text.trim().len() >= self.config.pdf.min_text_length => {
                    debug!("Using embedded PDF text layer ({} chars)", text.len());
                    return self.finish(text, started);
                }
                Ok(text) => {
                    debug!(
                        "Text layer too thin ({} chars), falling back to images",
                        text.trim().len()
                    );
                }
                Err(e) => warn!("PDF text extraction failed, trying images: {}", e),
            }
        }

        let mut text = String::new();
        for image in pdf.extract_images()? {
            match self.ocr_image(&image) {
                Ok(chunk) => {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(&chunk);
                }
                Err(ScanError::Ocr(OcrError::EmptyText)) => continue,
                Err(e) => return Err(e),
            }
        }

        if text.trim().is_empty() {
            return Err(OcrError::EmptyText.into());
        }
        self.finish(text, started)
    }

    /// Preprocess and recognize one image.
    fn ocr_image(&self, image: &DynamicImage) -> Result<String> {
        let prepared = self.preprocessor.preprocess(image);
        let text = self
            .engine
            .recognize(&DynamicImage::ImageLuma8(prepared))?;

        if text.trim().is_empty() {
            return Err(OcrError::EmptyText.into());
        }
        Ok(text)
    }

    /// Extract fields and assemble the outcome.
    fn finish(&self, text: String, started: Instant) -> Result<ScanOutcome> {
        if text.trim().is_empty() {
            return Err(OcrError::EmptyText.into());
        }

        let receipt = self.extractor.extract(&text);
        let suggested_category = guess_category(&text);
        let processing_time_ms = started.elapsed().as_millis() as u64;

        info!(
            "Scanned receipt: vendor={:?}, amount={:?}, date={:?}, suggestion={} ({}ms)",
            receipt.vendor, receipt.amount, receipt.date, suggested_category, processing_time_ms
        );

        Ok(ScanOutcome {
            receipt,
            suggested_category,
            raw_text: text,
            processing_time_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Mutex;

    use image::{GrayImage, Luma};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use super::*;

    /// Engine that returns canned text and records the image it was given.
    struct FakeEngine {
        text: String,
        seen_dimensions: Mutex<Option<(u32, u32)>>,
    }

    impl FakeEngine {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                seen_dimensions: Mutex::new(None),
            }
        }
    }

    impl OcrEngine for FakeEngine {
        fn recognize(&self, image: &DynamicImage) -> std::result::Result<String, OcrError> {
            *self.seen_dimensions.lock().unwrap() = Some((image.width(), image.height()));
            Ok(self.text.clone())
        }
    }

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([180])))
    }

    #[test]
    fn test_scan_image_extracts_fields() {
        let engine = FakeEngine::new("SuperMart\n15/03/2024\nGrand Total ₹379.00");
        let scanner = ReceiptScanner::new(engine);

        let outcome = scanner.scan_image(&test_image(640, 480)).unwrap();

        assert_eq!(outcome.receipt.vendor, "SuperMart");
        assert_eq!(
            outcome.receipt.amount,
            Some(Decimal::from_str("379.00").unwrap())
        );
        assert_eq!(outcome.suggested_category, Category::Groceries);
        assert_eq!(outcome.receipt.category, None);
        assert!(outcome.raw_text.contains("SuperMart"));
    }

    #[test]
    fn test_small_image_is_upscaled_before_ocr() {
        let engine = FakeEngine::new("Corner Shop\nTotal: 50.00");
        let scanner = ReceiptScanner::new(engine);

        scanner.scan_image(&test_image(150, 200)).unwrap();

        let seen = scanner.engine.seen_dimensions.lock().unwrap().unwrap();
        assert_eq!(seen, (300, 400));
    }

    #[test]
    fn test_whitespace_only_text_is_an_error() {
        let engine = FakeEngine::new("  \n\t  \n");
        let scanner = ReceiptScanner::new(engine);

        let result = scanner.scan_image(&test_image(640, 480));
        assert!(matches!(
            result,
            Err(ScanError::Ocr(OcrError::EmptyText))
        ));
    }

    #[test]
    fn test_undecodable_bytes_are_an_image_error() {
        let engine = FakeEngine::new("irrelevant");
        let scanner = ReceiptScanner::new(engine);

        let result = scanner.scan_bytes(b"not an image");
        assert!(matches!(result, Err(ScanError::Image(_))));
    }

    #[test]
    fn test_garbage_pdf_is_a_pdf_error() {
        let engine = FakeEngine::new("irrelevant");
        let scanner = ReceiptScanner::new(engine);

        let result = scanner.scan_pdf(b"not a pdf");
        assert!(matches!(result, Err(ScanError::Pdf(_))));
    }

    #[test]
    fn test_fallback_vendor_and_empty_fields() {
        let engine = FakeEngine::new("--\nthank you");
        let scanner = ReceiptScanner::new(engine);

        let outcome = scanner.scan_image(&test_image(640, 480)).unwrap();

        assert_eq!(outcome.receipt.vendor, "Receipt");
        assert_eq!(outcome.receipt.amount, None);
        assert_eq!(outcome.receipt.date, None);
        assert_eq!(outcome.suggested_category, Category::Shopping);
    }
}
