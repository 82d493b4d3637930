//! Receipt field extraction from OCR text.

pub mod extractor;
pub mod rules;

pub use extractor::ReceiptExtractor;
pub use rules::Category;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured fields recovered from a receipt.
///
/// Any field the rules could not determine with confidence is left empty for
/// the user to fill in. `category` is always `None` here: the keyword-based
/// guess travels separately as a suggestion and only lands on a transaction
/// after the user confirms it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedReceipt {
    /// Merchant name, or a placeholder when none was found.
    pub vendor: String,
    /// Detected total.
    pub amount: Option<Decimal>,
    /// Purchase date.
    pub date: Option<NaiveDate>,
    /// Always empty; see [`rules::guess_category`].
    pub category: Option<Category>,
}
