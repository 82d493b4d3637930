//! Rule-based field extraction for receipt OCR text.

pub mod amounts;
pub mod category;
pub mod dates;
pub mod patterns;

pub use amounts::extract_amount;
pub use category::{guess_category, Category};
pub use dates::extract_date;

use rust_decimal::Decimal;

/// One tier of the amount-detection cascade: inspects the receipt lines and
/// either commits to a candidate or passes.
///
/// Each tier is independent and individually testable; none of them share
/// state with the others.
pub type AmountStrategy = fn(&[&str]) -> Option<Decimal>;

/// Run strategies in priority order; the first non-empty result wins.
pub fn first_match(lines: &[&str], strategies: &[AmountStrategy]) -> Option<Decimal> {
    strategies.iter().find_map(|strategy| strategy(lines))
}
