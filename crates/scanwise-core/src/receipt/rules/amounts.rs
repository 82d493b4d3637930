//! Amount detection cascade for receipt text.
//!
//! Four prioritized tiers, each an independent [`AmountStrategy`]: labeled
//! grand-total lines, bare `TOTAL` lines, currency-tagged figures near the
//! bottom of the receipt, and a strict money-shaped token as a last resort.
//! The first tier to produce a range-valid candidate wins; if all four pass,
//! the receipt is reported without an amount and the caller prompts for
//! manual entry.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use super::patterns::{
    has_currency_marker, COLON_AMOUNT, EXCLUDED_TOKENS, INR_AMOUNT, LONG_DIGIT_RUN, NUMBER,
    RS_AMOUNT, STRICT_MONEY, SYMBOL_AMOUNT, TOTAL_LABELS, TRAILING_AMOUNT,
};
use super::{first_match, AmountStrategy};

/// How many lines from the bottom the currency-tagged tier examines.
const TAIL_LINES_TAGGED: usize = 10;

/// How many lines from the bottom the last-resort tier examines.
const TAIL_LINES_LAST_RESORT: usize = 5;

/// Cascade in priority order.
const STRATEGIES: &[AmountStrategy] = &[
    labeled_total,
    bare_total_line,
    tagged_near_end,
    strict_money_near_end,
];

/// Find the best-guess total for the given receipt lines.
pub fn extract_amount(lines: &[&str]) -> Option<Decimal> {
    let amount = first_match(lines, STRATEGIES);
    debug!("Amount cascade result: {:?}", amount);
    amount
}

/// Plausible monetary range for the main tiers.
fn in_range(amount: Decimal) -> bool {
    amount >= Decimal::ONE && amount <= Decimal::from(100_000)
}

/// The last-resort tier keeps a higher floor: a bare `12.50`-shaped token
/// with no label or currency marker is too easily an item price, so small
/// values are not trusted here.
fn in_last_resort_range(amount: Decimal) -> bool {
    amount >= Decimal::TEN && amount <= Decimal::from(100_000)
}

/// Parse a numeric substring, tolerating thousands separators.
fn parse_number(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.replace(',', "")).ok()
}

/// Last `n` lines of the receipt, in reading order.
fn tail<'a>(lines: &'a [&'a str], n: usize) -> &'a [&'a str] {
    &lines[lines.len().saturating_sub(n)..]
}

/// Priority 1: a line labeled with a grand-total phrase.
///
/// The rightmost number on such a line is conventionally the amount (numbers
/// to its left are item counts or tax components). Lines that also mention
/// receipt/phone/date artifacts are skipped outright.
pub fn labeled_total(lines: &[&str]) -> Option<Decimal> {
    for line in lines {
        let upper = line.to_uppercase();
        if !TOTAL_LABELS.iter().any(|label| upper.contains(label)) {
            continue;
        }
        if EXCLUDED_TOKENS.iter().any(|token| upper.contains(token)) {
            continue;
        }

        if let Some(last) = NUMBER.find_iter(line).last() {
            if let Some(amount) = parse_number(last.as_str()) {
                if in_range(amount) {
                    debug!("Labeled total on line: {:?}", line);
                    return Some(amount);
                }
            }
        }
    }
    None
}

/// Priority 2: a line starting with `TOTAL` that is not a subtotal or item
/// count. Several numeric shapes are tried in order of confidence.
pub fn bare_total_line(lines: &[&str]) -> Option<Decimal> {
    for line in lines {
        let upper = line.to_uppercase();
        if !upper.starts_with("TOTAL") || upper.contains("SUB") || upper.contains("ITEM") {
            continue;
        }

        let attempts = [
            &*SYMBOL_AMOUNT,
            &*RS_AMOUNT,
            &*INR_AMOUNT,
            &*TRAILING_AMOUNT,
            &*COLON_AMOUNT,
        ];
        for pattern in attempts {
            if let Some(caps) = pattern.captures(line) {
                if let Some(amount) = parse_number(&caps[1]) {
                    if in_range(amount) {
                        debug!("Bare TOTAL line: {:?}", line);
                        return Some(amount);
                    }
                }
            }
        }
    }
    None
}

/// Priority 3: currency-tagged amounts in the last lines of the receipt.
///
/// Totals sit near the bottom, and the total is typically the largest
/// currency-tagged figure on the page, so the maximum valid candidate wins.
/// Long digit runs without a currency marker are reference numbers and are
/// never considered.
pub fn tagged_near_end(lines: &[&str]) -> Option<Decimal> {
    let mut best: Option<Decimal> = None;

    for line in tail(lines, TAIL_LINES_TAGGED) {
        if !has_currency_marker(line) {
            if LONG_DIGIT_RUN.is_match(line) {
                debug!("Skipping reference-number line: {:?}", line);
            }
            continue;
        }

        for pattern in [&*SYMBOL_AMOUNT, &*RS_AMOUNT, &*INR_AMOUNT] {
            for caps in pattern.captures_iter(line) {
                if let Some(amount) = parse_number(&caps[1]) {
                    if in_range(amount) && best.is_none_or(|b| amount > b) {
                        best = Some(amount);
                    }
                }
            }
        }
    }

    best
}

/// Priority 4: any strictly money-shaped token (2-5 integer digits, exactly
/// two decimals) in the last few lines. First hit inside the narrower range
/// wins.
pub fn strict_money_near_end(lines: &[&str]) -> Option<Decimal> {
    for line in tail(lines, TAIL_LINES_LAST_RESORT) {
        for caps in STRICT_MONEY.captures_iter(line) {
            if let Some(amount) = parse_number(&caps[1]) {
                if in_last_resort_range(amount) {
                    debug!("Last-resort money token on line: {:?}", line);
                    return Some(amount);
                }
            }
        }
    }
    None
}
