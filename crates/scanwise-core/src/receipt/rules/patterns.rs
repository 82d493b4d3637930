//! Regex patterns and keyword tables for receipt field extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Labels that mark the final payable amount. Checked case-insensitively
/// against the uppercased line.
pub const TOTAL_LABELS: &[&str] = &[
    "GRAND TOTAL",
    "NET AMOUNT",
    "AMOUNT PAYABLE",
    "TOTAL AMOUNT",
    "NET TOTAL",
    "AMOUNT TO BE PAID",
];

/// Tokens that disqualify a labeled line: receipt numbers, phone numbers
/// and similar digit runs otherwise masquerade as totals.
pub const EXCLUDED_TOKENS: &[&str] = &["RECEIPT", "PHONE", "DATE", "STATION", "BARCODE"];

/// Stoplist for vendor detection; lines carrying these are structural
/// boilerplate, not a merchant name. Matched as case-insensitive substrings.
pub const VENDOR_STOPLIST: &[&str] = &["date", "item", "qty", "amount", "thank", "total"];

lazy_static! {
    /// Any numeric substring, optional thousands separators and decimals.
    pub static ref NUMBER: Regex = Regex::new(
        r"\d+(?:,\d+)*(?:\.\d+)?"
    ).unwrap();

    /// Amount prefixed by a currency symbol.
    pub static ref SYMBOL_AMOUNT: Regex = Regex::new(
        r"[₹$]\s*(\d+(?:,\d+)*(?:\.\d+)?)"
    ).unwrap();

    /// Amount prefixed by "Rs" / "Rs.".
    pub static ref RS_AMOUNT: Regex = Regex::new(
        r"(?i)\bRs\.?\s*(\d+(?:,\d+)*(?:\.\d+)?)"
    ).unwrap();

    /// Amount prefixed by "INR".
    pub static ref INR_AMOUNT: Regex = Regex::new(
        r"(?i)\bINR\s*(\d+(?:,\d+)*(?:\.\d+)?)"
    ).unwrap();

    /// Bare number at the end of a line.
    pub static ref TRAILING_AMOUNT: Regex = Regex::new(
        r"(\d+(?:,\d+)*(?:\.\d+)?)\s*$"
    ).unwrap();

    /// Number following a colon ("Total: 250.00").
    pub static ref COLON_AMOUNT: Regex = Regex::new(
        r":\s*(\d+(?:,\d+)*(?:\.\d+)?)"
    ).unwrap();

    /// Five or more consecutive digits: receipt/reference/phone numbers.
    pub static ref LONG_DIGIT_RUN: Regex = Regex::new(
        r"\d{5,}"
    ).unwrap();

    /// Strict money shape: 2-5 integer digits, exactly two decimals.
    pub static ref STRICT_MONEY: Regex = Regex::new(
        r"\b(\d{2,5}\.\d{2})\b"
    ).unwrap();

    /// "Rs"/"INR" word markers (the ₹ symbol is checked separately).
    pub static ref CURRENCY_WORD: Regex = Regex::new(
        r"(?i)\b(?:Rs|INR)\b"
    ).unwrap();

    /// Slash/dash-delimited numeric date token.
    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"\b\d{1,4}[/-]\d{1,2}[/-]\d{2,4}\b"
    ).unwrap();
}

/// Whether a line carries an explicit currency marker.
pub fn has_currency_marker(line: &str) -> bool {
    line.contains('₹') || CURRENCY_WORD.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_matches_grouped_amounts() {
        let found: Vec<&str> = NUMBER.find_iter("Qty 2 @ 1,234.56").map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["2", "1,234.56"]);
    }

    #[test]
    fn test_strict_money_rejects_long_integer_part() {
        assert!(STRICT_MONEY.is_match("1234.50"));
        assert!(!STRICT_MONEY.is_match("123456.78"));
        assert!(!STRICT_MONEY.is_match("450"));
    }

    #[test]
    fn test_currency_markers() {
        assert!(has_currency_marker("Rs. 450"));
        assert!(has_currency_marker("total INR 99"));
        assert!(has_currency_marker("₹379.00"));
        assert!(!has_currency_marker("ref 4491002"));
    }

    #[test]
    fn test_date_token_shapes() {
        assert!(DATE_TOKEN.is_match("12/01/2024"));
        assert!(DATE_TOKEN.is_match("2024-01-12"));
        assert!(DATE_TOKEN.is_match("1-2-24"));
        assert!(!DATE_TOKEN.is_match("12.01.2024"));
    }
}
