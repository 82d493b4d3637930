//! Core library for receipt OCR and expense extraction.
//!
//! This crate provides:
//! - Image preprocessing tuned for photographed receipts
//! - A pluggable OCR engine seam with a Tesseract backend
//! - Rule-based extraction of vendor, amount and purchase date
//! - Keyword-based spending category suggestions
//! - PDF receipt intake (embedded text layer or scanned images)
//! - Transaction records materialized from confirmed scans

pub mod config;
pub mod error;
pub mod ocr;
pub mod pdf;
pub mod receipt;
pub mod scanner;
pub mod transaction;

pub use config::{ExtractionConfig, OcrConfig, PdfConfig, PreprocessConfig, ScanConfig};
pub use error::{OcrError, PdfError, Result, ScanError};
pub use ocr::{ImagePreprocessor, OcrEngine, TesseractEngine};
pub use pdf::PdfReceipt;
pub use receipt::{Category, ExtractedReceipt, ReceiptExtractor};
pub use scanner::{ReceiptScanner, ScanOutcome};
pub use transaction::{NewTransaction, Provenance, Transaction, TransactionStore, TxnType};
