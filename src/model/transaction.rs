use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether a ledger row increases or decreases stock.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Stock-increasing, e.g. a delivery of raw material.
    #[default]
    Entry,
    /// Stock-decreasing, e.g. scrap or a bulk handout outside the per-student checklist.
    Exit,
}

serde_plain::derive_display_from_serialize!(TransactionKind);
serde_plain::derive_fromstr_from_deserialize!(TransactionKind);

/// A single stock ledger row. Rows are never edited in place; the ledger only grows by insert and
/// shrinks by delete. A row references a part by ID with no referential-integrity enforcement:
/// deleting the part leaves its ledger rows behind.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Free-form reference, typically an invoice ("NF") number.
    pub description: String,
    pub part_id: String,
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kind_round_trips_as_plain_string() {
        assert_eq!(TransactionKind::Entry.to_string(), "ENTRY");
        assert_eq!(TransactionKind::Exit.to_string(), "EXIT");
        assert_eq!(TransactionKind::from_str("EXIT").unwrap(), TransactionKind::Exit);
        assert!(TransactionKind::from_str("BOGUS").is_err());
    }

    #[test]
    fn test_transaction_json_shape() {
        let txn = Transaction {
            id: "abc".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            kind: TransactionKind::Entry,
            description: "NF 1234".to_string(),
            part_id: "T1".to_string(),
            quantity: 50,
        };
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "ENTRY");
        assert_eq!(json["date"], "2025-03-14");
        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, txn);
    }
}
