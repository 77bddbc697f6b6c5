use crate::model::StockroomData;
use crate::store::{ChangeSet, Store, StoreResult};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// An ephemeral store holding the whole document in memory. Used as a test double for code that
/// is generic over [`Store`]; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<StockroomData>,
}

impl MemoryStore {
    pub fn new(data: StockroomData) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }

    /// A memory store pre-populated with the seed data, like a freshly-initialized backend.
    pub fn seeded() -> Self {
        Self::new(StockroomData::seeded())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load_all(&self) -> StoreResult<StockroomData> {
        Ok(self.data.lock().await.clone())
    }

    async fn transact(&self, changes: ChangeSet) -> StoreResult<()> {
        let mut data = self.data.lock().await;
        changes.apply(&mut data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{seed_parts, seed_students};

    #[tokio::test]
    async fn test_multi_collection_transact() {
        let store = MemoryStore::new(StockroomData::default());
        store
            .transact(
                ChangeSet::new()
                    .parts(seed_parts())
                    .students(seed_students()),
            )
            .await
            .unwrap();

        let data = store.load_all().await.unwrap();
        assert_eq!(data.parts.len(), 16);
        assert_eq!(data.students.len(), 12);
        assert!(data.transactions.is_empty());
    }
}
