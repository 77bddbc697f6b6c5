//! The stock summary deriver.
//!
//! A summary row is a pure function of the current parts, ledger and withdrawals. Nothing here
//! is cached or persisted; callers recompute from the store on every invocation.

use crate::model::{cmp_task_ids, StockroomData, TransactionKind};
use serde::{Deserialize, Serialize};

/// Which target the purchase recommendation is measured against. The original deployments
/// disagreed on this, so it is configuration rather than a hardcoded rule.
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
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum PurchasePolicy {
    /// Measure against each part's fixed `target_quantity`.
    #[default]
    FixedTarget,
    /// Measure against the number of students who have not yet received the part.
    RemainingStudents,
}

serde_plain::derive_display_from_serialize!(PurchasePolicy);
serde_plain::derive_fromstr_from_deserialize!(PurchasePolicy);

/// Stock situation for a part relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Situation {
    #[default]
    #[serde(rename = "OK")]
    Ok,
    /// Below target, purchasing needed. Labeled "COMPRAR" on the stockroom's printed reports.
    #[serde(rename = "COMPRAR")]
    Buy,
}

serde_plain::derive_display_from_serialize!(Situation);
serde_plain::derive_fromstr_from_deserialize!(Situation);

/// One derived row of the stock summary.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StockSummary {
    pub part_id: String,
    pub code: String,
    pub name: String,
    /// Sum of ENTRY quantities for this part.
    pub entries: i64,
    /// Sum of EXIT quantities for this part.
    pub exits: i64,
    /// Count of withdrawals referencing this part (one unit each).
    pub student_exits: i64,
    /// `entries - exits - student_exits`.
    pub balance: i64,
    pub situation: Situation,
    /// Shortfall to reach the target; zero exactly when `situation` is OK.
    pub to_buy: i64,
}

/// Derives the per-part stock summary, sorted by natural task-id order.
///
/// The result depends only on the contents of `data` (not on collection ordering) and on the
/// purchase policy. Quantities are taken at face value: a negative ledger quantity propagates
/// into the balance, just as it did upstream of this tool.
pub fn summarize(data: &StockroomData, policy: PurchasePolicy) -> Vec<StockSummary> {
    let total_students = data.students.len() as i64;

    let mut parts = data.parts.clone();
    parts.sort_by(|a, b| cmp_task_ids(&a.id, &b.id));

    parts
        .into_iter()
        .map(|part| {
            let entries = sum_by_kind(data, &part.id, TransactionKind::Entry);
            let exits = sum_by_kind(data, &part.id, TransactionKind::Exit);
            let student_exits = data
                .withdrawals
                .iter()
                .filter(|w| w.part_id == part.id)
                .count() as i64;
            let balance = entries - exits - student_exits;

            let target = match policy {
                PurchasePolicy::FixedTarget => part.target_quantity,
                PurchasePolicy::RemainingStudents => total_students - student_exits,
            };

            let situation = if balance >= target {
                Situation::Ok
            } else {
                Situation::Buy
            };

            StockSummary {
                part_id: part.id,
                code: part.code,
                name: part.name,
                entries,
                exits,
                student_exits,
                balance,
                situation,
                to_buy: (target - balance).max(0),
            }
        })
        .collect()
}

/// The current balance for a single part, or `None` if the part does not exist. Used by the
/// withdrawal toggle to refuse handing out parts that are out of stock.
pub fn part_balance(data: &StockroomData, part_id: &str) -> Option<i64> {
    data.parts.iter().find(|p| p.id == part_id)?;
    let entries = sum_by_kind(data, part_id, TransactionKind::Entry);
    let exits = sum_by_kind(data, part_id, TransactionKind::Exit);
    let student_exits = data
        .withdrawals
        .iter()
        .filter(|w| w.part_id == part_id)
        .count() as i64;
    Some(entries - exits - student_exits)
}

fn sum_by_kind(data: &StockroomData, part_id: &str, kind: TransactionKind) -> i64 {
    data.transactions
        .iter()
        .filter(|t| t.part_id == part_id && t.kind == kind)
        .map(|t| t.quantity)
        .sum()
}
