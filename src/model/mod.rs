//! Types that represent the core data model, such as `Part`, `Student`, `Transaction` and
//! `Withdrawal`.
mod part;
mod seed;
mod student;
mod transaction;
mod withdrawal;

pub use part::{cmp_task_ids, Part};
pub use seed::{seed_parts, seed_students};
use serde::{Deserialize, Serialize};
pub use student::Student;
pub use transaction::{Transaction, TransactionKind};
pub use withdrawal::Withdrawal;

/// All four collections tracked by the stockroom, bundled as one document. This is the unit that
/// the persistence layer reads and writes, and the input to the stock summary deriver.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StockroomData {
    /// The course task/part types being stocked.
    pub parts: Vec<Part>,
    /// The enrolled students.
    pub students: Vec<Student>,
    /// The stock ledger (entries and exits).
    pub transactions: Vec<Transaction>,
    /// Which students have received which parts.
    pub withdrawals: Vec<Withdrawal>,
}

impl StockroomData {
    /// The default contents of a freshly-created store: the seed parts and students, with an
    /// empty ledger and no withdrawals.
    pub fn seeded() -> Self {
        Self {
            parts: seed_parts(),
            students: seed_students(),
            transactions: Vec::new(),
            withdrawals: Vec::new(),
        }
    }
}
