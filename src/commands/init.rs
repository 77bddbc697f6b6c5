use crate::args::InitArgs;
use crate::commands::Out;
use crate::model::StockroomData;
use crate::store::ChangeSet;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and its contents:
/// - An initial `config.json` with the chosen backend and purchase policy.
/// - The `.backups` subdirectory.
/// - The datastore, populated with the standard task list and roster unless `--empty` was given.
///
/// # Errors
/// - Returns an error if any file operations fail or if the datastore already exists.
pub async fn init(home: &Path, args: &InitArgs) -> Result<Out<()>> {
    let config = Config::create(home, args.backend(), args.policy())
        .await
        .context("Unable to create the data directory and configs")?;

    let data = if args.empty() {
        StockroomData::default()
    } else {
        StockroomData::seeded()
    };
    let store = config.store().await?;
    store
        .transact(ChangeSet::replace_all(data))
        .await
        .context("Unable to initialize the datastore")?;

    Ok(format!(
        "Successfully created the stockroom directory at '{}' with the {} backend",
        config.root().display(),
        config.backend()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Backend;
    use crate::model::{seed_parts, seed_students};
    use crate::summary::PurchasePolicy;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_seeds_datastore() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("stockroom");
        let args = InitArgs::new(Backend::Json, PurchasePolicy::FixedTarget, false);

        init(&home, &args).await.unwrap();

        let config = Config::load(&home).await.unwrap();
        let data = config.store().await.unwrap().load_all().await.unwrap();
        assert_eq!(data.parts, seed_parts());
        assert_eq!(data.students, seed_students());
        assert!(data.transactions.is_empty());
        assert!(data.withdrawals.is_empty());
    }

    #[tokio::test]
    async fn test_init_empty() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("stockroom");
        let args = InitArgs::new(Backend::Json, PurchasePolicy::FixedTarget, true);

        init(&home, &args).await.unwrap();

        let config = Config::load(&home).await.unwrap();
        let data = config.store().await.unwrap().load_all().await.unwrap();
        assert!(data.parts.is_empty());
        assert!(data.students.is_empty());
    }

    #[tokio::test]
    async fn test_init_refuses_second_run() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("stockroom");
        let args = InitArgs::new(Backend::Json, PurchasePolicy::FixedTarget, false);

        init(&home, &args).await.unwrap();
        // A second init must not wipe the datastore.
        assert!(init(&home, &args).await.is_err());
    }
}
