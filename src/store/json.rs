use crate::model::StockroomData;
use crate::store::{ChangeSet, Store, StoreResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// File-backed store keeping all four collections in one pretty-printed JSON document.
///
/// Writes go to a temporary sibling file which is then renamed over the document, so a crash
/// mid-write never leaves a half-written store behind. A missing document reads as the seeded
/// default, mirroring the seed-on-empty behavior of the original storage adapters.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_atomic(&self, data: &StockroomData) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(data)?;
        let tmp = self
            .path
            .with_extension(format!("tmp-{}", Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Wrote store document to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl Store for JsonStore {
    async fn load_all(&self) -> StoreResult<StockroomData> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "No store document at {}, reading as seeded defaults",
                    self.path.display()
                );
                Ok(StockroomData::seeded())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn transact(&self, changes: ChangeSet) -> StoreResult<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut data = self.load_all().await?;
        changes.apply(&mut data);
        self.write_atomic(&data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{seed_parts, Part, Withdrawal};
    use chrono::Utc;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonStore {
        JsonStore::new(dir.path().join("stockroom.json"))
    }

    #[tokio::test]
    async fn test_missing_document_reads_as_seeded() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let data = store.load_all().await.unwrap();
        assert_eq!(data.parts, seed_parts());
        assert!(data.transactions.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let parts = vec![Part {
            id: "T1".to_string(),
            code: "1003198".to_string(),
            name: "Tarefa 1".to_string(),
            target_quantity: 70,
        }];
        store.save_parts(&parts).await.unwrap();

        // A fresh handle to the same file sees the write.
        let reopened = store_in(&dir);
        assert_eq!(reopened.get_parts().await.unwrap(), parts);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_collection() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save_parts(&seed_parts()).await.unwrap();
        store.save_parts(&[]).await.unwrap();
        assert!(store.get_parts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transact_applies_all_collections_in_one_write() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let withdrawals = vec![Withdrawal {
            student_id: "1".to_string(),
            part_id: "T1".to_string(),
            date: Utc::now(),
        }];
        store
            .transact(
                ChangeSet::new()
                    .parts(vec![])
                    .withdrawals(withdrawals.clone()),
            )
            .await
            .unwrap();

        let data = store.load_all().await.unwrap();
        assert!(data.parts.is_empty());
        assert_eq!(data.withdrawals, withdrawals);
        // Collections not named in the change set keep their seeded values.
        assert_eq!(data.students.len(), 12);
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save_parts(&seed_parts()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["stockroom.json".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "not json").unwrap();

        let result = store.load_all().await;
        assert!(matches!(result, Err(crate::store::StoreError::Corrupt(_))));
    }
}
