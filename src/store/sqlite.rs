use crate::model::{StockroomData, TransactionKind};
use crate::store::{migrations, ChangeSet, Store, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// The schema version this build of the program expects.
const SCHEMA_VERSION: i32 = 1;

/// Ledger dates are stored as `YYYY-MM-DD` text; withdrawal timestamps as RFC 3339 text.
const DATE_FMT: &str = "%Y-%m-%d";

/// SQLite-backed store with one table per collection. Whole-collection replacement and
/// [`Store::transact`] each run inside a single database transaction, so a multi-collection
/// change (e.g. a part delete with its withdrawal cascade) commits or rolls back as a unit.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a new database file at `path`, initializes the schema, and returns the store.
    /// Fails if a file already exists there.
    pub async fn create(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Err(StoreError::Invalid(format!(
                "A database file already exists at {}",
                path.display()
            )));
        }
        let store = Self::connect(path, true).await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Opens an existing database file at `path`, running schema migrations if it is
    /// out-of-date. Fails if the file does not exist.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::Invalid(format!(
                "The database file is missing at {}",
                path.display()
            )));
        }
        let store = Self::connect(path, false).await?;
        store.migrate().await?;
        Ok(store)
    }

    async fn connect(path: &Path, create: bool) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(create);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Ensures the `schema_version` table exists and brings the schema up to
    /// [`SCHEMA_VERSION`].
    async fn migrate(&self) -> StoreResult<()> {
        sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
            .execute(&self.pool)
            .await?;

        let row: (Option<i32>,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
            .fetch_one(&self.pool)
            .await?;
        let current = match row.0 {
            Some(version) => version,
            None => {
                sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
                    .execute(&self.pool)
                    .await?;
                0
            }
        };

        debug!("Database schema at version {current}, target {SCHEMA_VERSION}");
        migrations::run(&self.pool, current, SCHEMA_VERSION).await
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn load_all(&self) -> StoreResult<StockroomData> {
        let mut data = StockroomData::default();

        let rows: Vec<(String, String, String, i64)> =
            sqlx::query_as("SELECT id, code, name, target_quantity FROM parts")
                .fetch_all(&self.pool)
                .await?;
        for (id, code, name, target_quantity) in rows {
            data.parts.push(crate::model::Part {
                id,
                code,
                name,
                target_quantity,
            });
        }

        let rows: Vec<(String, String, String)> =
            sqlx::query_as("SELECT id, name, class_group FROM students")
                .fetch_all(&self.pool)
                .await?;
        for (id, name, class_group) in rows {
            data.students.push(crate::model::Student {
                id,
                name,
                class_group,
            });
        }

        let rows: Vec<(String, String, String, String, String, i64)> = sqlx::query_as(
            "SELECT id, date, kind, description, part_id, quantity FROM transactions",
        )
        .fetch_all(&self.pool)
        .await?;
        for (id, date, kind, description, part_id, quantity) in rows {
            data.transactions.push(crate::model::Transaction {
                id,
                date: parse_date(&date)?,
                kind: TransactionKind::from_str(&kind).map_err(|e| {
                    StoreError::Invalid(format!("Bad transaction kind '{kind}': {e}"))
                })?,
                description,
                part_id,
                quantity,
            });
        }

        let rows: Vec<(String, String, String)> =
            sqlx::query_as("SELECT student_id, part_id, date FROM withdrawals")
                .fetch_all(&self.pool)
                .await?;
        for (student_id, part_id, date) in rows {
            data.withdrawals.push(crate::model::Withdrawal {
                student_id,
                part_id,
                date: parse_timestamp(&date)?,
            });
        }

        Ok(data)
    }

    async fn transact(&self, changes: ChangeSet) -> StoreResult<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;

        if let Some(parts) = changes.parts_ref() {
            sqlx::query("DELETE FROM parts").execute(&mut *tx).await?;
            for p in parts {
                sqlx::query("INSERT INTO parts (id, code, name, target_quantity) VALUES (?, ?, ?, ?)")
                    .bind(&p.id)
                    .bind(&p.code)
                    .bind(&p.name)
                    .bind(p.target_quantity)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        if let Some(students) = changes.students_ref() {
            sqlx::query("DELETE FROM students")
                .execute(&mut *tx)
                .await?;
            for s in students {
                sqlx::query("INSERT INTO students (id, name, class_group) VALUES (?, ?, ?)")
                    .bind(&s.id)
                    .bind(&s.name)
                    .bind(&s.class_group)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        if let Some(transactions) = changes.transactions_ref() {
            sqlx::query("DELETE FROM transactions")
                .execute(&mut *tx)
                .await?;
            for t in transactions {
                sqlx::query(
                    "INSERT INTO transactions (id, date, kind, description, part_id, quantity) \
                     VALUES (?, ?, ?, ?, ?, ?)",
                )
                .bind(&t.id)
                .bind(t.date.format(DATE_FMT).to_string())
                .bind(t.kind.to_string())
                .bind(&t.description)
                .bind(&t.part_id)
                .bind(t.quantity)
                .execute(&mut *tx)
                .await?;
            }
        }

        if let Some(withdrawals) = changes.withdrawals_ref() {
            sqlx::query("DELETE FROM withdrawals")
                .execute(&mut *tx)
                .await?;
            for w in withdrawals {
                sqlx::query("INSERT INTO withdrawals (student_id, part_id, date) VALUES (?, ?, ?)")
                    .bind(&w.student_id)
                    .bind(&w.part_id)
                    .bind(w.date.to_rfc3339())
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

fn parse_date(s: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map_err(|e| StoreError::Invalid(format!("Bad date '{s}': {e}")))
}

fn parse_timestamp(s: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| StoreError::Invalid(format!("Bad timestamp '{s}': {e}")))
}
