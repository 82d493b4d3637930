//! Purchase date extraction.

use chrono::NaiveDate;
use tracing::debug;

use super::patterns::DATE_TOKEN;

/// Formats tried in order against each date-shaped token. Day-first formats
/// lead because they dominate the receipts this tool targets; ISO shapes are
/// unambiguous and slot in wherever.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%y",
    "%d-%m-%y",
];

/// Find the first parseable date token in the receipt text.
///
/// Returns `None` when no token parses under any known format. Callers must
/// not substitute the current date; a wrong-but-plausible date is worse for
/// the user than an empty field they are prompted to fill.
pub fn extract_date(lines: &[&str]) -> Option<NaiveDate> {
    for line in lines {
        for token in DATE_TOKEN.find_iter(line) {
            for format in DATE_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(token.as_str(), format) {
                    // `%Y` accepts two-digit years as literal year 24 etc.;
                    // the window rejects those so `%y` gets its turn.
                    if plausible_year(&date) {
                        debug!("Parsed date {:?} from token {:?}", date, token.as_str());
                        return Some(date);
                    }
                }
            }
        }
    }
    None
}

fn plausible_year(date: &NaiveDate) -> bool {
    use chrono::Datelike;
    (2000..=2099).contains(&date.year())
}
