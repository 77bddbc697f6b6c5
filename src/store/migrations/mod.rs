//! Database schema migrations for the sqlite backend.
//!
//! Migration files live in this directory with the naming convention:
//! - `migration_NN_up.sql` - Upgrades schema from version `NN-1` to version `NN`
//! - `migration_NN_down.sql` - Downgrades schema from version `NN` to version `NN-1`

use crate::store::{StoreError, StoreResult};
use sqlx::{Executor, SqlitePool};
use tracing::debug;

/// A database migration with up and down SQL.
struct Migration {
    /// The version this migration brings the database to (when going up).
    version: i32,
    up_sql: &'static str,
    down_sql: &'static str,
}

/// All available migrations in order.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    up_sql: include_str!("migration_01_up.sql"),
    down_sql: include_str!("migration_01_down.sql"),
}];

/// Runs migrations to bring the database from `current_ver` to `target_ver`, upward or downward.
/// Each migration executes in a transaction that also updates the `schema_version` table.
/// Validates that every required migration exists before running any of them.
pub(crate) async fn run(pool: &SqlitePool, current_ver: i32, target_ver: i32) -> StoreResult<()> {
    if current_ver == target_ver {
        debug!("Database already at schema version {target_ver}, no migrations needed");
        return Ok(());
    }

    validate_migrations(current_ver, target_ver)?;

    if current_ver < target_ver {
        for version in (current_ver + 1)..=target_ver {
            let migration = find(version)?;
            debug!("Running migration {version:02} (up)");
            run_single_migration(pool, migration.up_sql, version).await?;
        }
    } else {
        for version in (target_ver + 1..=current_ver).rev() {
            let migration = find(version)?;
            debug!("Running migration {version:02} (down)");
            run_single_migration(pool, migration.down_sql, version - 1).await?;
        }
    }

    debug!("Migration complete, schema now at version {target_ver}");
    Ok(())
}

fn find(version: i32) -> StoreResult<&'static Migration> {
    MIGRATIONS
        .iter()
        .find(|m| m.version == version)
        .ok_or_else(|| StoreError::Invalid(format!("Migration {version} not found")))
}

/// Executes a single migration's SQL and updates `schema_version`, all within a transaction.
async fn run_single_migration(pool: &SqlitePool, sql: &str, new_version: i32) -> StoreResult<()> {
    let mut tx = pool.begin().await?;

    tx.execute(sql).await?;

    sqlx::query("DELETE FROM schema_version")
        .execute(&mut *tx)
        .await?;
    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(new_version)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Validates that migrations are available for every version between `current_version` and
/// `target_version`.
fn validate_migrations(current_version: i32, target_version: i32) -> StoreResult<()> {
    let (start, end) = if current_version < target_version {
        (current_version + 1, target_version)
    } else {
        (target_version + 1, current_version)
    };

    for version in start..=end {
        if !MIGRATIONS.iter().any(|m| m.version == version) {
            return Err(StoreError::Invalid(format!(
                "Migration {version} is missing but required to migrate from version \
                 {current_version} to {target_version}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;
    use tempfile::TempDir;

    /// Creates a test database with `schema_version` bootstrapped at version 0.
    async fn create_test_db() -> (TempDir, SqlitePool) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.sqlite");

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
            .unwrap()
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        sqlx::query("CREATE TABLE schema_version (version INTEGER NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
            .execute(&pool)
            .await
            .unwrap();

        (temp_dir, pool)
    }

    async fn get_schema_version(pool: &SqlitePool) -> i32 {
        let row: (i32,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
            .fetch_one(pool)
            .await
            .unwrap();
        row.0
    }

    async fn table_exists(pool: &SqlitePool, table_name: &str) -> bool {
        let row: (i32,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?")
                .bind(table_name)
                .fetch_one(pool)
                .await
                .unwrap();
        row.0 > 0
    }

    #[tokio::test]
    async fn test_migration_up_creates_tables() {
        let (_temp_dir, pool) = create_test_db().await;
        assert_eq!(get_schema_version(&pool).await, 0);

        run(&pool, 0, 1).await.unwrap();

        assert_eq!(get_schema_version(&pool).await, 1);
        assert!(table_exists(&pool, "parts").await);
        assert!(table_exists(&pool, "students").await);
        assert!(table_exists(&pool, "transactions").await);
        assert!(table_exists(&pool, "withdrawals").await);
    }

    #[tokio::test]
    async fn test_migration_down_drops_tables() {
        let (_temp_dir, pool) = create_test_db().await;
        run(&pool, 0, 1).await.unwrap();

        run(&pool, 1, 0).await.unwrap();

        assert_eq!(get_schema_version(&pool).await, 0);
        assert!(!table_exists(&pool, "parts").await);
        assert!(!table_exists(&pool, "withdrawals").await);
    }

    #[tokio::test]
    async fn test_migration_no_op_when_already_at_target() {
        let (_temp_dir, pool) = create_test_db().await;
        run(&pool, 0, 1).await.unwrap();

        run(&pool, 1, 1).await.unwrap();

        assert_eq!(get_schema_version(&pool).await, 1);
    }

    #[test]
    fn test_validate_migrations() {
        assert!(validate_migrations(0, 1).is_ok());
        assert!(validate_migrations(1, 0).is_ok());
        // Migration 2 doesn't exist
        assert!(validate_migrations(0, 2).is_err());
        assert!(validate_migrations(1, 3).is_err());
    }
}
