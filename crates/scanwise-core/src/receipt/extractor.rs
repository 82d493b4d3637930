//! Top-level receipt extractor.

use tracing::debug;

use super::rules::patterns::VENDOR_STOPLIST;
use super::rules::{extract_amount, extract_date};
use super::ExtractedReceipt;
use crate::config::ExtractionConfig;

/// Turns raw OCR text into an [`ExtractedReceipt`].
///
/// Stateless: extraction is a pure function of the input text, so running it
/// twice on the same text yields the same receipt.
pub struct ReceiptExtractor {
    vendor_max_len: usize,
    vendor_placeholder: String,
}

impl ReceiptExtractor {
    pub fn new() -> Self {
        Self::with_config(&ExtractionConfig::default())
    }

    pub fn with_config(config: &ExtractionConfig) -> Self {
        Self {
            vendor_max_len: config.vendor_max_len,
            vendor_placeholder: config.vendor_placeholder.clone(),
        }
    }

    /// Extract all receipt fields from OCR text.
    pub fn extract(&self, text: &str) -> ExtractedReceipt {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        debug!("Extracting fields from {} non-empty lines", lines.len());

        ExtractedReceipt {
            vendor: self.extract_vendor(&lines),
            amount: extract_amount(&lines),
            date: extract_date(&lines),
            category: None,
        }
    }

    /// The merchant name is almost always the first printed line; lines that
    /// carry structural boilerplate are skipped.
    fn extract_vendor(&self, lines: &[&str]) -> String {
        for line in lines {
            if line.chars().count() <= 2 {
                continue;
            }
            let lower = line.to_lowercase();
            if VENDOR_STOPLIST.iter().any(|word| lower.contains(word)) {
                continue;
            }
            return truncate_chars(line, self.vendor_max_len);
        }
        self.vendor_placeholder.clone()
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncate on character boundaries, never mid-codepoint.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    use super::*;

    const SAMPLE: &str = "\
SuperMart City Center
15/03/2024
Milk           55.00
Bread          45.00
Grand Total ₹379.00
Thank you, visit again";

    #[test]
    fn test_full_extraction() {
        let receipt = ReceiptExtractor::new().extract(SAMPLE);

        assert_eq!(receipt.vendor, "SuperMart City Center");
        assert_eq!(receipt.amount, Some(Decimal::from_str("379.00").unwrap()));
        assert_eq!(
            receipt.date,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(receipt.category, None);
    }

    #[test]
    fn test_vendor_skips_short_and_boilerplate_lines() {
        let text = "**\nQty Item Amount\nGreen Grocers\nTotal: 120.00";
        let receipt = ReceiptExtractor::new().extract(text);
        assert_eq!(receipt.vendor, "Green Grocers");
    }

    #[test]
    fn test_vendor_placeholder_when_nothing_usable() {
        let text = "--\nTotal: 99.00\nthank you";
        let receipt = ReceiptExtractor::new().extract(text);
        assert_eq!(receipt.vendor, "Receipt");
    }

    #[test]
    fn test_vendor_truncated_on_char_boundary() {
        let long = "क".repeat(80);
        let receipt = ReceiptExtractor::new().extract(&long);
        assert_eq!(receipt.vendor.chars().count(), 50);
    }

    #[test]
    fn test_empty_fields_stay_empty() {
        let receipt = ReceiptExtractor::new().extract("Corner Shop\nhave a nice day");
        assert_eq!(receipt.amount, None);
        assert_eq!(receipt.date, None);
        assert_eq!(receipt.category, None);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = ReceiptExtractor::new();
        assert_eq!(extractor.extract(SAMPLE), extractor.extract(SAMPLE));
    }

    #[test]
    fn test_windows_line_endings() {
        let text = "SuperMart\r\nGrand Total ₹379.00\r\n";
        let receipt = ReceiptExtractor::new().extract(text);
        assert_eq!(receipt.vendor, "SuperMart");
        assert_eq!(receipt.amount, Some(Decimal::from_str("379.00").unwrap()));
    }
}
