use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record that a specific student has received a specific part. Uniquely keyed by
/// `(student_id, part_id)` — there is no multi-withdrawal counting, only membership. Toggling
/// the same pair twice restores the original state.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Withdrawal {
    pub student_id: String,
    pub part_id: String,
    /// When the part was handed over.
    pub date: DateTime<Utc>,
}

impl Withdrawal {
    /// True when this record is for the given `(student, part)` pair.
    pub fn matches(&self, student_id: &str, part_id: &str) -> bool {
        self.student_id == student_id && self.part_id == part_id
    }
}
