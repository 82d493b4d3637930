//! Transaction records materialized from scanned receipts.
//!
//! Extraction only proposes values; a transaction is created from what the
//! user confirmed. The storage backend sits behind [`TransactionStore`] so
//! the scanning pipeline never depends on a particular database.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::receipt::ExtractedReceipt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnType {
    Income,
    Expense,
}

/// Where a transaction's field values came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Entered by hand.
    Manual,
    /// Prefilled from a receipt scan, then user-confirmed.
    OcrScan,
}

/// A transaction as submitted for creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub txn_type: TxnType,
    /// User-confirmed category; never prefilled by the scanner.
    pub category: Option<String>,
    pub description: String,
    pub payment_mode: Option<String>,
    pub txn_date: NaiveDate,
    pub provenance: Provenance,
}

impl NewTransaction {
    /// Prefill a transaction from an extracted receipt.
    ///
    /// `amount` and `txn_date` are required at this boundary: when the
    /// extractor left them empty, the user must supply them before a
    /// transaction can exist. Category always starts empty here.
    pub fn from_receipt(receipt: &ExtractedReceipt, amount: Decimal, txn_date: NaiveDate) -> Self {
        Self {
            amount,
            txn_type: TxnType::Expense,
            category: None,
            description: receipt.vendor.clone(),
            payment_mode: None,
            txn_date,
            provenance: Provenance::OcrScan,
        }
    }
}

/// A stored transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    pub user_id: u64,
    pub amount: Decimal,
    pub txn_type: TxnType,
    pub category: Option<String>,
    pub description: String,
    pub payment_mode: Option<String>,
    pub txn_date: NaiveDate,
    /// Denormalized for month/year reporting queries.
    pub month: u32,
    pub year: i32,
    pub provenance: Provenance,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Materialize a new record for a user.
    pub fn create(id: u64, user_id: u64, new: NewTransaction) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            amount: new.amount,
            txn_type: new.txn_type,
            category: new.category,
            description: new.description,
            payment_mode: new.payment_mode,
            month: new.txn_date.month(),
            year: new.txn_date.year(),
            txn_date: new.txn_date,
            provenance: new.provenance,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Persistence seam for transactions.
pub trait TransactionStore {
    fn insert(&mut self, user_id: u64, new: NewTransaction) -> Result<Transaction>;

    fn list_for_month(&self, user_id: u64, year: i32, month: u32) -> Result<Vec<Transaction>>;
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    /// Minimal in-memory store for exercising the seam.
    #[derive(Default)]
    struct MemoryStore {
        rows: Vec<Transaction>,
        next_id: u64,
    }

    impl TransactionStore for MemoryStore {
        fn insert(&mut self, user_id: u64, new: NewTransaction) -> Result<Transaction> {
            self.next_id += 1;
            let txn = Transaction::create(self.next_id, user_id, new);
            self.rows.push(txn.clone());
            Ok(txn)
        }

        fn list_for_month(
            &self,
            user_id: u64,
            year: i32,
            month: u32,
        ) -> Result<Vec<Transaction>> {
            Ok(self
                .rows
                .iter()
                .filter(|t| t.user_id == user_id && t.year == year && t.month == month)
                .cloned()
                .collect())
        }
    }

    fn sample_receipt() -> ExtractedReceipt {
        ExtractedReceipt {
            vendor: "SuperMart".to_string(),
            amount: Some(Decimal::from_str("379.00").unwrap()),
            date: NaiveDate::from_ymd_opt(2024, 3, 15),
            category: None,
        }
    }

    #[test]
    fn test_from_receipt_defaults() {
        let receipt = sample_receipt();
        let new = NewTransaction::from_receipt(
            &receipt,
            Decimal::from_str("379.00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        );

        assert_eq!(new.txn_type, TxnType::Expense);
        assert_eq!(new.provenance, Provenance::OcrScan);
        assert_eq!(new.category, None);
        assert_eq!(new.description, "SuperMart");
    }

    #[test]
    fn test_create_denormalizes_month_and_year() {
        let receipt = sample_receipt();
        let new = NewTransaction::from_receipt(
            &receipt,
            Decimal::from_str("379.00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        );

        let txn = Transaction::create(1, 7, new);
        assert_eq!(txn.month, 3);
        assert_eq!(txn.year, 2024);
    }

    #[test]
    fn test_store_round_trip() {
        let mut store = MemoryStore::default();
        let receipt = sample_receipt();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let new =
            NewTransaction::from_receipt(&receipt, Decimal::from_str("379.00").unwrap(), date);

        store.insert(7, new).unwrap();

        let march = store.list_for_month(7, 2024, 3).unwrap();
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].description, "SuperMart");

        assert!(store.list_for_month(7, 2024, 4).unwrap().is_empty());
        assert!(store.list_for_month(8, 2024, 3).unwrap().is_empty());
    }
}
