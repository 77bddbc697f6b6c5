use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A course task/part type, identified by a short human code like `T1` or `T5A`. Each part has a
/// purchasing target used by the fixed-target purchase policy.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Part {
    /// Short human code, e.g. "T1". Natural sort key for all part listings.
    pub id: String,
    /// The warehouse/catalog code for the physical material, e.g. "1003198".
    pub code: String,
    /// Display name, e.g. "Tarefa 1".
    pub name: String,
    /// The stock level to maintain under the fixed-target purchase policy.
    pub target_quantity: i64,
}

/// Compares two task IDs naturally: by the numeric portion first, then lexicographically.
/// "T2" sorts before "T10", and "T5A" before "T5B".
pub fn cmp_task_ids(a: &str, b: &str) -> Ordering {
    let num_a = extract_num(a);
    let num_b = extract_num(b);
    match num_a.cmp(&num_b) {
        Ordering::Equal => a.cmp(b),
        other => other,
    }
}

/// Concatenates the digits of `s` and parses them as a number. IDs without digits sort as 0.
fn extract_num(s: &str) -> u64 {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
