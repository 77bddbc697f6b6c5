//! The persistence layer.
//!
//! All storage goes through the [`Store`] trait: four whole-collection get/save pairs plus an
//! atomic multi-collection [`Store::transact`]. A `save` always replaces the entire collection —
//! there is no diffing and no cross-process coordination, so concurrent writers are last-write-
//! wins. Backends are selected in `config.json` and are interchangeable behind this trait.

mod json;
mod memory;
mod migrations;
mod sqlite;

use crate::model::{Part, StockroomData, Student, Transaction, Withdrawal};
use async_trait::async_trait;
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
use thiserror::Error;

/// Storage-layer failures. Commands surface these to the user with context; no failure is
/// swallowed between the store and the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt data store: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid stored value: {0}")]
    Invalid(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A set of whole-collection replacements to apply in one atomic unit. Collections left as
/// `None` are untouched. This is how "delete a part and its withdrawals" avoids the window
/// where one write has landed and the other has not.
#[derive(Default, Debug, Clone)]
pub struct ChangeSet {
    parts: Option<Vec<Part>>,
    students: Option<Vec<Student>>,
    transactions: Option<Vec<Transaction>>,
    withdrawals: Option<Vec<Withdrawal>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A change set that replaces every collection with the contents of `data`.
    pub fn replace_all(data: StockroomData) -> Self {
        Self::new()
            .parts(data.parts)
            .students(data.students)
            .transactions(data.transactions)
            .withdrawals(data.withdrawals)
    }

    pub fn parts(mut self, parts: Vec<Part>) -> Self {
        self.parts = Some(parts);
        self
    }

    pub fn students(mut self, students: Vec<Student>) -> Self {
        self.students = Some(students);
        self
    }

    pub fn transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = Some(transactions);
        self
    }

    pub fn withdrawals(mut self, withdrawals: Vec<Withdrawal>) -> Self {
        self.withdrawals = Some(withdrawals);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_none()
            && self.students.is_none()
            && self.transactions.is_none()
            && self.withdrawals.is_none()
    }

    /// Applies this change set to an in-memory document.
    pub(crate) fn apply(self, data: &mut StockroomData) {
        if let Some(parts) = self.parts {
            data.parts = parts;
        }
        if let Some(students) = self.students {
            data.students = students;
        }
        if let Some(transactions) = self.transactions {
            data.transactions = transactions;
        }
        if let Some(withdrawals) = self.withdrawals {
            data.withdrawals = withdrawals;
        }
    }

    pub(crate) fn parts_ref(&self) -> Option<&[Part]> {
        self.parts.as_deref()
    }

    pub(crate) fn students_ref(&self) -> Option<&[Student]> {
        self.students.as_deref()
    }

    pub(crate) fn transactions_ref(&self) -> Option<&[Transaction]> {
        self.transactions.as_deref()
    }

    pub(crate) fn withdrawals_ref(&self) -> Option<&[Withdrawal]> {
        self.withdrawals.as_deref()
    }
}

/// The storage contract. Backends implement [`Store::load_all`] and [`Store::transact`]; the
/// per-collection get/save pairs are derived from those two so that every backend gets identical
/// whole-collection-replace semantics.
#[async_trait]
pub trait Store: Send + Sync {
    /// Reads every collection. A store that has never been written reads as the default
    /// seed data.
    async fn load_all(&self) -> StoreResult<StockroomData>;

    /// Applies all replacements in `changes` as one atomic unit.
    async fn transact(&self, changes: ChangeSet) -> StoreResult<()>;

    async fn get_parts(&self) -> StoreResult<Vec<Part>> {
        Ok(self.load_all().await?.parts)
    }

    async fn save_parts(&self, items: &[Part]) -> StoreResult<()> {
        self.transact(ChangeSet::new().parts(items.to_vec())).await
    }

    async fn get_students(&self) -> StoreResult<Vec<Student>> {
        Ok(self.load_all().await?.students)
    }

    async fn save_students(&self, items: &[Student]) -> StoreResult<()> {
        self.transact(ChangeSet::new().students(items.to_vec()))
            .await
    }

    async fn get_transactions(&self) -> StoreResult<Vec<Transaction>> {
        Ok(self.load_all().await?.transactions)
    }

    async fn save_transactions(&self, items: &[Transaction]) -> StoreResult<()> {
        self.transact(ChangeSet::new().transactions(items.to_vec()))
            .await
    }

    async fn get_withdrawals(&self) -> StoreResult<Vec<Withdrawal>> {
        Ok(self.load_all().await?.withdrawals)
    }

    async fn save_withdrawals(&self, items: &[Withdrawal]) -> StoreResult<()> {
        self.transact(ChangeSet::new().withdrawals(items.to_vec()))
            .await
    }
}
