//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::config::Backend;
use crate::model::StockroomData;
use crate::store::ChangeSet;
use crate::summary::PurchasePolicy;
use crate::Config;
use tempfile::TempDir;

/// Test environment that sets up a stockroom home directory with Config and a seeded datastore.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment backed by the JSON store, seeded with the standard task list
    /// and roster.
    pub async fn new() -> Self {
        Self::with_backend(Backend::Json).await
    }

    /// Creates a test environment with the given backend.
    pub async fn with_backend(backend: Backend) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("stockroom");

        let config = Config::create(&root, backend, PurchasePolicy::FixedTarget)
            .await
            .unwrap();
        let store = config.store().await.unwrap();
        store
            .transact(ChangeSet::replace_all(StockroomData::seeded()))
            .await
            .unwrap();

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a reference to the Config.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads the entire datastore.
    pub async fn data(&self) -> StockroomData {
        self.config
            .store()
            .await
            .unwrap()
            .load_all()
            .await
            .unwrap()
    }
}
