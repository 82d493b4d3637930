//! Keyword-based category suggestion.
//!
//! Purely advisory: the suggestion is surfaced to the user for confirmation
//! and is never written into the extracted receipt itself.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Spending categories recognized by the keyword buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    Shopping,
    Dining,
    Transportation,
    Entertainment,
    Utilities,
    Health,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Groceries => "Groceries",
            Category::Shopping => "Shopping",
            Category::Dining => "Dining",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Utilities => "Utilities",
            Category::Health => "Health",
        };
        f.write_str(name)
    }
}

/// Keyword buckets in match priority order. A keyword can appear in more
/// than one bucket; the earlier bucket wins ("bazaar" suggests groceries
/// before general shopping).
const BUCKETS: &[(Category, &[&str])] = &[
    (
        Category::Groceries,
        &[
            "grocery", "supermarket", "mart", "bazaar", "fresh", "vegetable", "fruit", "kirana",
            "provision",
        ],
    ),
    (
        Category::Shopping,
        &["store", "retail", "fashion", "apparel", "footwear", "electronics", "bazaar", "mall"],
    ),
    (
        Category::Dining,
        &[
            "restaurant", "cafe", "coffee", "pizza", "burger", "hotel", "kitchen", "food", "bakery",
            "dhaba", "biryani",
        ],
    ),
    (
        Category::Transportation,
        &["fuel", "petrol", "diesel", "gas station", "uber", "ola", "taxi", "metro", "parking"],
    ),
    (
        Category::Entertainment,
        &["cinema", "movie", "theatre", "game", "pvr", "inox"],
    ),
    (
        Category::Utilities,
        &["electricity", "water bill", "broadband", "internet", "recharge", "mobile bill"],
    ),
    (
        Category::Health,
        &["pharmacy", "chemist", "medical", "hospital", "clinic", "medicine"],
    ),
];

/// Suggest a category from the full receipt text. Matching is against the
/// lowercased text; first bucket with a hit wins, and receipts with no
/// keyword at all default to general shopping.
pub fn guess_category(text: &str) -> Category {
    let lower = text.to_lowercase();

    for (category, keywords) in BUCKETS {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            debug!("Category suggestion: {}", category);
            return *category;
        }
    }

    debug!("No category keyword matched; defaulting to Shopping");
    Category::Shopping
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_grocery_keywords() {
        assert_eq!(guess_category("SuperMart Fresh Vegetables"), Category::Groceries);
        assert_eq!(guess_category("BIG BAZAAR"), Category::Groceries);
    }

    #[test]
    fn test_dining_keywords() {
        assert_eq!(guess_category("Blue Tokai Coffee Roasters"), Category::Dining);
    }

    #[test]
    fn test_transport_keywords() {
        assert_eq!(guess_category("HP Petrol Pump"), Category::Transportation);
    }

    #[test]
    fn test_health_keywords() {
        assert_eq!(guess_category("Apollo Pharmacy"), Category::Health);
    }

    #[test]
    fn test_bucket_order_breaks_ties() {
        // "mart" (groceries) and "store" (shopping) both present.
        assert_eq!(guess_category("QuickMart Store"), Category::Groceries);

        // Shopping is checked ahead of dining and the other later buckets:
        // "mall" beats "food", "store" beats "recharge".
        assert_eq!(guess_category("City Mall Food Court"), Category::Shopping);
        assert_eq!(guess_category("Device Store Recharge Counter"), Category::Shopping);
    }

    #[test]
    fn test_fallback_is_shopping() {
        assert_eq!(guess_category("XYZ Enterprises"), Category::Shopping);
        assert_eq!(guess_category(""), Category::Shopping);
    }
}
